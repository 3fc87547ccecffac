//! Error types emitted by the Saferoute CLI.
//!
//! Keep this error type reasonably small, as every subcommand returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use saferoute_core::AnalysisConfigError;
use saferoute_data::lights::{LightsError, LightsWriteError};
use saferoute_data::places::ProviderBuildError;
use saferoute_scorer::{ModelError, TrainingError};
use thiserror::Error;

/// Errors emitted by the Saferoute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening a request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// `--lighting-preset` named an unknown policy.
    #[error("unknown lighting preset {value:?} (expected \"canonical\" or \"percentile-variant\")")]
    UnknownLightingPreset {
        /// Value supplied after merging.
        value: String,
    },
    /// The merged analysis settings failed validation.
    #[error("invalid analysis configuration: {0}")]
    InvalidAnalysisConfig(#[from] AnalysisConfigError),
    /// The lights artefact could not be loaded at startup.
    #[error("failed to load lights artefact: {0}")]
    LoadLights(#[source] LightsError),
    /// Constructing the places provider failed.
    #[error("failed to build places provider for {base_url:?}: {source}")]
    BuildPlacesProvider {
        /// Configured base URL.
        base_url: String,
        /// Builder failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The safety model artefact could not be loaded.
    #[error("failed to load safety model: {0}")]
    LoadModel(#[source] ModelError),
    /// Generating data for or fitting the safety model failed.
    #[error("failed to train safety model: {0}")]
    Train(#[from] TrainingError),
    /// Persisting the safety model failed.
    #[error("failed to write safety model: {0}")]
    WriteModel(#[source] ModelError),
    /// The ASCII grid could not be imported.
    #[error("failed to import lights grid: {0}")]
    ImportLights(#[source] LightsError),
    /// Persisting the lights artefact failed.
    #[error(transparent)]
    WriteLights(#[from] LightsWriteError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
