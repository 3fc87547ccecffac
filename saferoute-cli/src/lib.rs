//! Command-line interface for Saferoute.
//!
//! The `saferoute` binary scores routes and prepares the artefacts scoring
//! depends on:
//!
//! - `analyze` samples a route, queries places and the lights raster, and
//!   prints the rule-based analysis.
//! - `rank` scores candidate score vectors with a trained model.
//! - `train` fits the safety model on synthetic data and writes `model.bin`.
//! - `import-lights` converts an ESRI ASCII grid into `lights.bin`.
//!
//! Every subcommand reads its options from CLI flags, a configuration file
//! and `SAFEROUTE_CMDS_<COMMAND>_*` environment variables.
#![forbid(unsafe_code)]

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;

mod analyze;
mod error;
mod import_lights;
mod rank;
mod train;

pub use error::CliError;

use analyze::{AnalyzeArgs, run_analyze};
use import_lights::{ImportLightsArgs, run_import_lights};
use rank::{RankArgs, run_rank};
use train::{TrainArgs, run_train};

pub(crate) const ARG_ARTEFACTS_DIR: &str = "artefacts-dir";
pub(crate) const ARG_ANALYZE_REQUEST: &str = "request";
pub(crate) const ARG_ANALYZE_LIGHTS: &str = "lights";
pub(crate) const ARG_ANALYZE_PLACES_API_KEY: &str = "places-api-key";
pub(crate) const ARG_ANALYZE_PLACES_BASE_URL: &str = "places-base-url";
pub(crate) const ARG_ANALYZE_STRIDE: &str = "stride";
pub(crate) const ARG_ANALYZE_RADIUS_M: &str = "radius-m";
pub(crate) const ARG_ANALYZE_LIGHTING_PRESET: &str = "lighting-preset";
pub(crate) const ARG_ANALYZE_LIGHTING_PERCENTILE: &str = "lighting-percentile";
pub(crate) const ARG_ANALYZE_LIGHTING_REFERENCE: &str = "lighting-reference";
pub(crate) const ARG_RANK_REQUEST: &str = "request";
pub(crate) const ARG_MODEL: &str = "model";
pub(crate) const ARG_TRAIN_OUTPUT: &str = "output";
pub(crate) const ARG_TRAIN_SAMPLES: &str = "samples";
pub(crate) const ARG_TRAIN_SEED: &str = "seed";
pub(crate) const ARG_TRAIN_VALIDATION_FRACTION: &str = "validation-fraction";
pub(crate) const ARG_TRAIN_ALPHA: &str = "alpha";
pub(crate) const ARG_IMPORT_SOURCE: &str = "source";
pub(crate) const ARG_IMPORT_OUTPUT: &str = "output";
pub(crate) const ENV_ANALYZE_REQUEST: &str = "SAFEROUTE_CMDS_ANALYZE_REQUEST_PATH";
pub(crate) const ENV_ANALYZE_PLACES_API_KEY: &str = "SAFEROUTE_CMDS_ANALYZE_PLACES_API_KEY";
pub(crate) const ENV_RANK_REQUEST: &str = "SAFEROUTE_CMDS_RANK_REQUEST_PATH";
pub(crate) const ENV_IMPORT_SOURCE: &str = "SAFEROUTE_CMDS_IMPORT_LIGHTS_SOURCE";

/// Default artefact file names inside `--artefacts-dir`.
pub(crate) const LIGHTS_FILE: &str = "lights.bin";
pub(crate) const MODEL_FILE: &str = "model.bin";

/// Accepted values of `--lighting-preset`.
pub(crate) const LIGHTING_PRESET_CANONICAL: &str = "canonical";
pub(crate) const LIGHTING_PRESET_PERCENTILE: &str = "percentile-variant";

/// Run the Saferoute CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration merging or the
/// selected subcommand fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Rank(args) => run_rank(args),
        Command::Train(args) => run_train(args),
        Command::ImportLights(args) => run_import_lights(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "saferoute",
    about = "Score walking routes by nearby places and nighttime lighting",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one route and print its features and rule-based score.
    Analyze(AnalyzeArgs),
    /// Rank candidate routes with a trained safety model.
    Rank(RankArgs),
    /// Train the safety model on synthetic data.
    Train(TrainArgs),
    /// Convert an ESRI ASCII grid into a lights artefact.
    ImportLights(ImportLightsArgs),
}

/// Resolve an artefact path from an explicit override or the artefacts
/// directory.
pub(crate) fn artefact_path(
    explicit: Option<Utf8PathBuf>,
    artefacts_dir: Option<&Utf8Path>,
    file_name: &str,
) -> Utf8PathBuf {
    explicit.unwrap_or_else(|| artefacts_dir.unwrap_or_else(|| Utf8Path::new(".")).join(file_name))
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match saferoute_fs::is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a JSON-encoded request from disk.
pub(crate) fn load_request<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CliError> {
    let file = saferoute_fs::open_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
