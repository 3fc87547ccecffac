//! Binary `lights.bin` artefact.
//!
//! The file starts with the 4-byte magic `SRLG` and a little-endian `u16`
//! format version, followed by a `bincode` encoding of [`LightsGrid`].

use std::io::{BufReader, BufWriter, Read, Write};

use bincode::{deserialize_from, serialize_into};
use camino::Utf8Path;
use serde::Serialize;

use super::{LightsError, LightsGrid, LightsWriteError};

/// File identifier for lights grid artefacts.
pub const LIGHTS_MAGIC: [u8; 4] = *b"SRLG";

/// Supported version of the lights grid artefact format.
pub const LIGHTS_VERSION: u16 = 1;

#[derive(Serialize)]
struct LightsFile<'a> {
    magic: [u8; 4],
    version: u16,
    grid: &'a LightsGrid,
}

/// Persist `grid` to `path`, creating parent directories and truncating any
/// existing file.
///
/// # Errors
///
/// Returns [`LightsWriteError`] when the file cannot be created, encoded or
/// flushed.
pub fn write_lights_artefact(path: &Utf8Path, grid: &LightsGrid) -> Result<(), LightsWriteError> {
    let io_error = |source| LightsWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = saferoute_fs::create_file(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let payload = LightsFile {
        magic: LIGHTS_MAGIC,
        version: LIGHTS_VERSION,
        grid,
    };
    serialize_into(&mut writer, &payload).map_err(|source| LightsWriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)?;
    let file = writer.into_inner().map_err(|err| io_error(err.into_error()))?;
    file.sync_all().map_err(io_error)
}

/// Load a grid from a `lights.bin` artefact.
///
/// # Errors
///
/// Returns [`LightsError::InvalidMagic`] or
/// [`LightsError::UnsupportedVersion`] for foreign or outdated files,
/// [`LightsError::Decode`] for a corrupt payload and
/// [`LightsError::InvalidGeometry`] or [`LightsError::CellCount`] when the
/// decoded grid is inconsistent.
pub fn read_lights_artefact(path: &Utf8Path) -> Result<LightsGrid, LightsError> {
    let io_error = |source| LightsError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(saferoute_fs::open_file(path).map_err(io_error)?);

    let mut magic = [0_u8; 4];
    reader.read_exact(&mut magic).map_err(io_error)?;
    if magic != LIGHTS_MAGIC {
        return Err(LightsError::InvalidMagic {
            expected: LIGHTS_MAGIC,
            found: magic,
        });
    }

    let mut version_bytes = [0_u8; 2];
    reader.read_exact(&mut version_bytes).map_err(io_error)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != LIGHTS_VERSION {
        return Err(LightsError::UnsupportedVersion {
            found: version,
            supported: LIGHTS_VERSION,
        });
    }

    let grid: LightsGrid = deserialize_from(&mut reader).map_err(|source| LightsError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    grid.validate()?;
    Ok(grid)
}
