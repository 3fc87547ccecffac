//! North-up radiance grid in geographic coordinates.

use geo::{Coord, Rect};
use saferoute_core::{BrightnessRaster, Coordinate};
use serde::{Deserialize, Serialize};

use super::LightsError;

/// Placement and size of a north-up grid.
///
/// The origin is the north-west corner; rows run southwards and columns
/// eastwards. Cells are square with side `cell_size` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Longitude of the western edge.
    pub west: f64,
    /// Latitude of the northern edge.
    pub north: f64,
    /// Cell side in degrees.
    pub cell_size: f64,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridGeometry {
    /// Number of cells, or `None` if it overflows `usize`.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        let columns = usize::try_from(self.columns).ok()?;
        let rows = usize::try_from(self.rows).ok()?;
        columns.checked_mul(rows)
    }

    /// Geographic extent, with `x` as longitude and `y` as latitude.
    #[must_use]
    pub fn bounds(&self) -> Rect<f64> {
        let east = self.west + self.cell_size * f64::from(self.columns);
        let south = self.north - self.cell_size * f64::from(self.rows);
        Rect::new(
            Coord {
                x: self.west,
                y: south,
            },
            Coord {
                x: east,
                y: self.north,
            },
        )
    }

    /// Row-major index of the cell containing `point`.
    ///
    /// Points on the western or northern edge belong to the grid; points on
    /// the eastern or southern edge do not.
    #[must_use]
    pub fn cell_index(&self, point: Coordinate) -> Option<usize> {
        let column = cell_along((point.lon() - self.west) / self.cell_size, self.columns)?;
        let row = cell_along((self.north - point.lat()) / self.cell_size, self.rows)?;
        let columns = usize::try_from(self.columns).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }

    pub(crate) fn validate(&self) -> Result<(), LightsError> {
        let invalid = |message: &str| LightsError::InvalidGeometry {
            message: message.to_owned(),
        };
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid("cell size must be positive and finite"));
        }
        if !(self.west.is_finite() && self.north.is_finite()) {
            return Err(invalid("origin must be finite"));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(invalid("grid must have at least one row and one column"));
        }
        if self.cell_count().is_none() {
            return Err(invalid("cell count overflows"));
        }
        Ok(())
    }
}

fn cell_along(offset: f64, extent: u32) -> Option<usize> {
    if !offset.is_finite() || offset < 0.0 {
        return None;
    }
    let cell = offset.floor();
    if cell >= f64::from(extent) {
        return None;
    }
    // `cell` is a non-negative integer below `extent`, so the cast is exact.
    usize::try_from(cell as u64).ok()
}

/// Radiance values on a [`GridGeometry`], stored row-major.
///
/// # Examples
/// ```
/// use saferoute_core::{BrightnessRaster, Coordinate};
/// use saferoute_data::lights::{GridGeometry, LightsGrid};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let geometry = GridGeometry { west: 0.0, north: 2.0, cell_size: 1.0, columns: 2, rows: 2 };
/// let grid = LightsGrid::new(geometry, Some(-9999.0), vec![1.0, 2.0, -9999.0, 4.0])?;
///
/// assert_eq!(grid.brightness(Coordinate::new(1.5, 1.5)?), Some(2.0));
/// assert_eq!(grid.brightness(Coordinate::new(0.5, 0.5)?), None);
/// assert_eq!(grid.brightness(Coordinate::new(5.0, 5.0)?), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightsGrid {
    geometry: GridGeometry,
    no_data: Option<f32>,
    values: Vec<f32>,
}

impl LightsGrid {
    /// Build a grid, checking the geometry and the number of values.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::InvalidGeometry`] for unusable geometry and
    /// [`LightsError::CellCount`] when `values` does not fill the grid.
    pub fn new(
        geometry: GridGeometry,
        no_data: Option<f32>,
        values: Vec<f32>,
    ) -> Result<Self, LightsError> {
        let grid = Self {
            geometry,
            no_data,
            values,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub(crate) fn validate(&self) -> Result<(), LightsError> {
        self.geometry.validate()?;
        let expected = self.geometry.cell_count().unwrap_or(usize::MAX);
        if self.values.len() != expected {
            return Err(LightsError::CellCount {
                expected,
                found: self.values.len(),
            });
        }
        Ok(())
    }

    /// Grid placement.
    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Sentinel marking cells without data.
    #[must_use]
    pub const fn no_data(&self) -> Option<f32> {
        self.no_data
    }

    /// Raw cell values, row-major from the north-west corner.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Cell value at `point`, or `None` outside the grid or on no-data cells.
    #[must_use]
    pub fn value_at(&self, point: Coordinate) -> Option<f32> {
        let value = *self.values.get(self.geometry.cell_index(point)?)?;
        match self.no_data {
            Some(sentinel) if value == sentinel => None,
            _ => Some(value),
        }
    }
}

impl BrightnessRaster for LightsGrid {
    fn brightness(&self, point: Coordinate) -> Option<f64> {
        self.value_at(point).map(f64::from)
    }
}
