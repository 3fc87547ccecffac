//! Lazily loaded lights raster shared between concurrent analyses.

use std::sync::OnceLock;

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use saferoute_core::{BrightnessRaster, Coordinate};

use super::{LightsError, LightsGrid, read_lights_artefact};

#[derive(Debug)]
enum LoadState {
    Ready(LightsGrid),
    Failed(String),
}

/// A `lights.bin` artefact that is read on first use.
///
/// The artefact is opened at most once for the lifetime of the value. When
/// loading fails the failure is logged once and every later lookup reports
/// missing brightness, so lighting scores fall back to zero rather than
/// aborting analyses.
///
/// # Examples
/// ```
/// use saferoute_core::{BrightnessRaster, Coordinate};
/// use saferoute_data::lights::SharedLightsRaster;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let raster = SharedLightsRaster::new("/non-existent/lights.bin");
/// assert_eq!(raster.brightness(Coordinate::new(12.97, 77.59)?), None);
/// assert!(!raster.is_loaded());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SharedLightsRaster {
    path: Utf8PathBuf,
    state: OnceLock<LoadState>,
}

impl SharedLightsRaster {
    /// Refer to the artefact at `path` without reading it.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: OnceLock::new(),
        }
    }

    /// Wrap an already loaded grid.
    #[must_use]
    pub fn from_grid(path: impl Into<Utf8PathBuf>, grid: LightsGrid) -> Self {
        Self {
            path: path.into(),
            state: OnceLock::from(LoadState::Ready(grid)),
        }
    }

    /// Location of the artefact.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the grid has been loaded successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state.get(), Some(LoadState::Ready(_)))
    }

    /// Load the grid, reading the artefact on the first call.
    ///
    /// # Errors
    ///
    /// The first failing call returns the underlying [`LightsError`]; later
    /// calls return [`LightsError::Unavailable`] without touching the disk.
    pub fn load(&self) -> Result<&LightsGrid, LightsError> {
        let mut first_error = None;
        let state = self.state.get_or_init(|| self.read(&mut first_error));
        match (state, first_error) {
            (_, Some(err)) => Err(err),
            (LoadState::Ready(grid), None) => Ok(grid),
            (LoadState::Failed(message), None) => Err(LightsError::Unavailable {
                path: self.path.clone(),
                message: message.clone(),
            }),
        }
    }

    fn read(&self, first_error: &mut Option<LightsError>) -> LoadState {
        match read_lights_artefact(&self.path) {
            Ok(grid) => {
                let geometry = grid.geometry();
                info!(
                    "loaded {}x{} lights grid from {}",
                    geometry.columns, geometry.rows, self.path
                );
                LoadState::Ready(grid)
            }
            Err(err) => {
                warn!("lights grid unavailable, lighting scores will be zero: {err}");
                let message = err.to_string();
                *first_error = Some(err);
                LoadState::Failed(message)
            }
        }
    }

    fn grid(&self) -> Option<&LightsGrid> {
        let mut discarded = None;
        match self.state.get_or_init(|| self.read(&mut discarded)) {
            LoadState::Ready(grid) => Some(grid),
            LoadState::Failed(_) => None,
        }
    }
}

impl BrightnessRaster for SharedLightsRaster {
    fn brightness(&self, point: Coordinate) -> Option<f64> {
        self.grid()?.brightness(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::{GridGeometry, write_lights_artefact};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn point(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    #[fixture]
    fn grid() -> LightsGrid {
        let geometry = GridGeometry {
            west: 0.0,
            north: 1.0,
            cell_size: 1.0,
            columns: 1,
            rows: 1,
        };
        LightsGrid::new(geometry, None, vec![42.0]).expect("valid grid")
    }

    #[rstest]
    fn loads_artefact_on_first_lookup(grid: LightsGrid) {
        let dir = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("lights.bin"))
            .expect("temp dir should be UTF-8");
        write_lights_artefact(&path, &grid).expect("persist grid");

        let raster = SharedLightsRaster::new(path);
        assert!(!raster.is_loaded());
        assert_eq!(raster.brightness(point(0.5, 0.5)), Some(42.0));
        assert!(raster.is_loaded());
        assert_eq!(raster.load().expect("loaded grid"), &grid);
    }

    #[rstest]
    fn failed_load_is_remembered() {
        let raster = SharedLightsRaster::new("/non-existent/lights.bin");

        let first = raster.load().expect_err("missing artefact");
        assert!(matches!(first, LightsError::Io { .. }));

        let second = raster.load().expect_err("still missing");
        assert!(matches!(second, LightsError::Unavailable { .. }));
        assert_eq!(raster.brightness(point(0.5, 0.5)), None);
    }

    #[rstest]
    fn wraps_loaded_grid(grid: LightsGrid) {
        let raster = SharedLightsRaster::from_grid("memory", grid);
        assert!(raster.is_loaded());
        assert_eq!(raster.path().as_str(), "memory");
        assert_eq!(raster.brightness(point(2.0, 2.0)), None);
    }
}
