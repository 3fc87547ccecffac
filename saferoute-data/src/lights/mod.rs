//! Nighttime-lights rasters.
//!
//! Radiance grids are imported from ESRI ASCII exports (for example a VIIRS
//! monthly composite clipped with `gdal_translate -of AAIGrid`) and stored as
//! a compact `lights.bin` artefact. [`SharedLightsRaster`] reads the artefact
//! lazily and serves [`saferoute_core::BrightnessRaster`] lookups.

mod artefact;
mod ascii;
mod error;
mod grid;
mod shared;

pub use artefact::{LIGHTS_MAGIC, LIGHTS_VERSION, read_lights_artefact, write_lights_artefact};
pub use ascii::{load_ascii_grid, parse_ascii_grid};
pub use error::{LightsError, LightsWriteError};
pub use grid::{GridGeometry, LightsGrid};
pub use shared::SharedLightsRaster;
