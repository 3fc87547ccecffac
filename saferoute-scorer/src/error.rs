//! Error types raised while training, persisting or loading a safety model.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing `model.bin`.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Opening or reading the model artefact failed.
    #[error("failed to read model file at {path}")]
    ReadFile {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Creating or writing the model artefact failed.
    #[error("failed to write model file at {path}")]
    WriteFile {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the model to `bincode` failed.
    #[error("failed to serialise model into {path}")]
    Serialise {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Decoding the model payload failed.
    #[error("failed to deserialise model from {path}")]
    Deserialise {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not start with the model identifier.
    #[error("invalid model magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The artefact uses an unsupported format version.
    #[error("unsupported model version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version supported by this binary.
        supported: u16,
    },
    /// A fitted parameter is NaN or infinite.
    #[error("model parameter {parameter} is not finite")]
    NonFiniteParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
}

/// Errors raised while generating data or fitting a model.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Fitting requires at least one row.
    #[error("cannot fit {stage} on an empty dataset")]
    EmptyDataset {
        /// Stage that received no rows.
        stage: &'static str,
    },
    /// Rows and targets differ in length.
    #[error("expected {rows} targets, found {targets}")]
    LengthMismatch {
        /// Number of feature rows.
        rows: usize,
        /// Number of targets.
        targets: usize,
    },
    /// A configuration value is out of range.
    #[error("invalid training parameter {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A sampling distribution could not be constructed.
    #[error("invalid {name} distribution: {message}")]
    Distribution {
        /// Distribution name.
        name: &'static str,
        /// Error detail from `rand_distr`.
        message: String,
    },
    /// The normal equations have no unique solution.
    #[error("regression system is singular")]
    SingularSystem,
    /// Fitting produced parameters that cannot be served.
    #[error(transparent)]
    Model(#[from] ModelError),
}
