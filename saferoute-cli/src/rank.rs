//! Rank command implementation for the Saferoute CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{RankRequest, RankResponse};
use saferoute_scorer::read_model;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ARTEFACTS_DIR, ARG_MODEL, ARG_RANK_REQUEST, CliError, ENV_RANK_REQUEST, MODEL_FILE,
    artefact_path, load_request, require_existing, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Rank candidate routes given as a JSON-encoded RankRequest. \
                 Each candidate's score vector is passed through the trained \
                 safety model (model.bin) and the candidates are printed in \
                 descending order of safety score.",
    about = "Rank candidate routes with the trained model"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct RankArgs {
    /// Path to a JSON file containing a RankRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the path to the safety model (`model.bin`).
    #[arg(long = ARG_MODEL, value_name = "path")]
    #[serde(default)]
    pub(crate) model: Option<Utf8PathBuf>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to `model.bin`.
    pub(crate) model: Utf8PathBuf,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_RANK_REQUEST)?;
        require_existing(&self.model, ARG_MODEL)?;
        Ok(())
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_RANK_REQUEST,
            env: ENV_RANK_REQUEST,
        })?;
        let model = artefact_path(args.model, args.artefacts_dir.as_deref(), MODEL_FILE);
        Ok(Self {
            request_path,
            model,
        })
    }
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let response = execute_rank(args)?;
    write_json(writer, &response)
}

fn execute_rank(args: RankArgs) -> Result<RankResponse, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request: RankRequest = load_request(&config.request_path)?;
    let scorer = read_model(&config.model)
        .map_err(CliError::LoadModel)?
        .into_scorer();
    info!(
        "ranking {} candidate routes with {}",
        request.routes.len(),
        config.model
    );
    Ok(request.rank(&scorer))
}
