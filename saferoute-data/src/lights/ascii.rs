//! Import ESRI ASCII grids, the text raster format written by
//! `gdal_translate -of AAIGrid`.
//!
//! ```text
//! ncols         3
//! nrows         2
//! xllcorner     77.0
//! yllcorner     12.0
//! cellsize      0.5
//! NODATA_value  -9999
//! 1 2 3
//! 4 -9999 6
//! ```
//!
//! Header keywords are case-insensitive. The lower-left origin may be given
//! as a cell corner (`xllcorner`/`yllcorner`) or a cell centre
//! (`xllcenter`/`yllcenter`). Values are row-major from the northern row and
//! may wrap across lines freely.

use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use log::debug;

use super::{GridGeometry, LightsError, LightsGrid};

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Corner(f64),
    Centre(f64),
}

impl Anchor {
    fn lower_left(self, cell_size: f64) -> f64 {
        match self {
            Self::Corner(value) => value,
            Self::Centre(value) => value - cell_size / 2.0,
        }
    }
}

#[derive(Debug, Default)]
struct Header {
    columns: Option<u32>,
    rows: Option<u32>,
    x: Option<Anchor>,
    y: Option<Anchor>,
    cell_size: Option<f64>,
    no_data: Option<f32>,
}

impl Header {
    fn apply(&mut self, line: usize, key: &str, value: &str) -> Result<(), LightsError> {
        let invalid = |message: String| LightsError::InvalidHeader { line, message };
        let float = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| invalid(format!("{key} expects a number, found {value:?}")))
        };
        let count = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| invalid(format!("{key} expects a cell count, found {value:?}")))
        };
        match key.to_ascii_lowercase().as_str() {
            "ncols" => self.columns = Some(count(value)?),
            "nrows" => self.rows = Some(count(value)?),
            "xllcorner" => self.x = Some(Anchor::Corner(float(value)?)),
            "xllcenter" => self.x = Some(Anchor::Centre(float(value)?)),
            "yllcorner" => self.y = Some(Anchor::Corner(float(value)?)),
            "yllcenter" => self.y = Some(Anchor::Centre(float(value)?)),
            "cellsize" => self.cell_size = Some(float(value)?),
            "nodata_value" => {
                let sentinel = value
                    .parse::<f32>()
                    .map_err(|_| invalid(format!("{key} expects a number, found {value:?}")))?;
                self.no_data = Some(sentinel);
            }
            _ => return Err(invalid(format!("unsupported keyword {key:?}"))),
        }
        Ok(())
    }

    fn geometry(&self) -> Result<GridGeometry, LightsError> {
        let columns = self.columns.ok_or(LightsError::MissingHeader { key: "ncols" })?;
        let rows = self.rows.ok_or(LightsError::MissingHeader { key: "nrows" })?;
        let x = self.x.ok_or(LightsError::MissingHeader { key: "xllcorner" })?;
        let y = self.y.ok_or(LightsError::MissingHeader { key: "yllcorner" })?;
        let cell_size = self
            .cell_size
            .ok_or(LightsError::MissingHeader { key: "cellsize" })?;
        let south = y.lower_left(cell_size);
        Ok(GridGeometry {
            west: x.lower_left(cell_size),
            north: south + cell_size * f64::from(rows),
            cell_size,
            columns,
            rows,
        })
    }
}

fn starts_numeric(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit() || matches!(first, '-' | '+' | '.'))
}

/// Parse an ESRI ASCII grid from `reader`.
///
/// # Errors
///
/// Returns [`LightsError::Read`] on I/O failure, a header error for missing
/// or malformed keywords, [`LightsError::InvalidValue`] for non-numeric
/// cells and [`LightsError::CellCount`] when the values do not fill the grid.
pub fn parse_ascii_grid<R: BufRead>(reader: R) -> Result<LightsGrid, LightsError> {
    let mut header = Header::default();
    let mut values: Vec<f32> = Vec::new();
    let mut in_body = false;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| LightsError::Read { source })?;
        let mut tokens = line.split_whitespace().peekable();
        let Some(first) = tokens.peek().copied() else {
            continue;
        };
        if !in_body && !starts_numeric(first) {
            let (Some(key), Some(value), None) = (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(LightsError::InvalidHeader {
                    line: line_number,
                    message: "expected a keyword followed by one value".to_owned(),
                });
            };
            header.apply(line_number, key, value)?;
            continue;
        }
        in_body = true;
        for token in tokens {
            let value = token
                .parse::<f32>()
                .map_err(|_| LightsError::InvalidValue {
                    line: line_number,
                    token: token.to_owned(),
                })?;
            values.push(value);
        }
    }

    let geometry = header.geometry()?;
    let grid = LightsGrid::new(geometry, header.no_data, values)?;
    debug!(
        "parsed {}x{} lights grid at {} degrees per cell",
        geometry.columns, geometry.rows, geometry.cell_size
    );
    Ok(grid)
}

/// Read an ESRI ASCII grid from `path`.
///
/// # Errors
///
/// As [`parse_ascii_grid`], with I/O failures reported against `path`.
pub fn load_ascii_grid(path: &Utf8Path) -> Result<LightsGrid, LightsError> {
    let file = saferoute_fs::open_file(path).map_err(|source| LightsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ascii_grid(BufReader::new(file)).map_err(|err| match err {
        LightsError::Read { source } => LightsError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
