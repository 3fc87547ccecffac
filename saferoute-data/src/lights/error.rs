//! Errors raised while importing, loading or writing lights grids.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Error emitted when building or loading a [`super::LightsGrid`].
#[derive(Debug, Error)]
pub enum LightsError {
    /// The grid file could not be read from disk.
    #[error("failed to read lights grid from {path}: {source}")]
    Io {
        /// Location of the grid file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading from an in-memory or streamed source failed.
    #[error("failed to read lights grid data: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The serialised grid could not be decoded.
    #[error("failed to decode lights grid from {path}: {source}")]
    Decode {
        /// Location of the artefact.
        path: Utf8PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not start with the artefact identifier.
    #[error("invalid lights grid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The artefact uses an unsupported format version.
    #[error("unsupported lights grid version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version supported by this binary.
        supported: u16,
    },
    /// A required ASCII grid header is absent.
    #[error("ASCII grid is missing the {key} header")]
    MissingHeader {
        /// Header keyword.
        key: &'static str,
    },
    /// An ASCII grid header line could not be understood.
    #[error("invalid ASCII grid header on line {line}: {message}")]
    InvalidHeader {
        /// One-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// A cell value is not a number.
    #[error("invalid cell value {token:?} on line {line}")]
    InvalidValue {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// The number of cell values does not match the header.
    #[error("expected {expected} cell values, found {found}")]
    CellCount {
        /// `ncols * nrows`.
        expected: usize,
        /// Values present.
        found: usize,
    },
    /// The grid geometry is unusable.
    #[error("invalid lights grid geometry: {message}")]
    InvalidGeometry {
        /// What was wrong.
        message: String,
    },
    /// An earlier load attempt failed and the raster stays unavailable.
    #[error("lights grid at {path} is unavailable: {message}")]
    Unavailable {
        /// Location of the artefact.
        path: Utf8PathBuf,
        /// Message from the failed attempt.
        message: String,
    },
}

/// Error emitted when persisting a lights grid artefact.
#[derive(Debug, Error)]
pub enum LightsWriteError {
    /// Writing bytes to disk failed.
    #[error("failed to write lights grid to {path}: {source}")]
    Io {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The grid could not be encoded.
    #[error("failed to encode lights grid for {path}: {source}")]
    Encode {
        /// Destination path.
        path: Utf8PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
}
