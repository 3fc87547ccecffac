//! Train command implementation for the Saferoute CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::RuleBasedScorer;
use saferoute_scorer::{SyntheticConfig, TrainingConfig, generate, train, write_model};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ARTEFACTS_DIR, ARG_TRAIN_ALPHA, ARG_TRAIN_OUTPUT, ARG_TRAIN_SAMPLES, ARG_TRAIN_SEED,
    ARG_TRAIN_VALIDATION_FRACTION, CliError, MODEL_FILE, artefact_path, write_json,
};

/// CLI arguments for the `train` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "train",
    long_about = "Generate a seeded synthetic dataset labelled by the \
                 rule-based scorer, fit the scaler and ridge regressor, \
                 report held-out error and write the model artefact \
                 (model.bin).",
    about = "Train the safety model"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct TrainArgs {
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the output path (`model.bin`).
    #[arg(long = ARG_TRAIN_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Number of synthetic samples to draw.
    #[arg(long = ARG_TRAIN_SAMPLES, value_name = "count")]
    #[serde(default)]
    pub(crate) samples: Option<usize>,
    /// Seed for sample generation and the train/validation shuffle.
    #[arg(long = ARG_TRAIN_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Share of samples held out for validation.
    #[arg(long = ARG_TRAIN_VALIDATION_FRACTION, value_name = "fraction")]
    #[serde(default)]
    pub(crate) validation_fraction: Option<f64>,
    /// Ridge penalty.
    #[arg(long = ARG_TRAIN_ALPHA, value_name = "alpha")]
    #[serde(default)]
    pub(crate) alpha: Option<f64>,
}

impl TrainArgs {
    pub(crate) fn into_config(self) -> Result<TrainConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(TrainConfig::from(merged))
    }
}

/// Resolved `train` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrainConfig {
    /// Destination of the model artefact.
    pub(crate) output: Utf8PathBuf,
    /// Dataset size and seed.
    pub(crate) synthetic: SyntheticConfig,
    /// Split and regularisation settings.
    pub(crate) training: TrainingConfig,
}

impl From<TrainArgs> for TrainConfig {
    fn from(args: TrainArgs) -> Self {
        let output = artefact_path(args.output, args.artefacts_dir.as_deref(), MODEL_FILE);
        let synthetic_defaults = SyntheticConfig::default();
        let training_defaults = TrainingConfig::default();
        let seed = args.seed.unwrap_or(synthetic_defaults.seed);
        Self {
            output,
            synthetic: SyntheticConfig {
                samples: args.samples.unwrap_or(synthetic_defaults.samples),
                seed,
            },
            training: TrainingConfig {
                validation_fraction: args
                    .validation_fraction
                    .unwrap_or(training_defaults.validation_fraction),
                seed,
                alpha: args.alpha.unwrap_or(training_defaults.alpha),
            },
        }
    }
}

/// Summary printed after a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TrainSummary {
    /// Where the model was written.
    pub(crate) model_path: Utf8PathBuf,
    /// Samples drawn.
    pub(crate) samples: usize,
    /// Rows used for fitting.
    pub(crate) training_rows: usize,
    /// Rows held out for evaluation.
    pub(crate) validation_rows: usize,
    /// Mean absolute error on the evaluation rows.
    pub(crate) mean_absolute_error: f64,
    /// Lowest prediction on the evaluation rows.
    pub(crate) min_prediction: f64,
    /// Highest prediction on the evaluation rows.
    pub(crate) max_prediction: f64,
}

pub(super) fn run_train(args: TrainArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_train_with(args, &mut stdout)
}

pub(super) fn run_train_with(args: TrainArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_train(&config)?;
    write_json(writer, &summary)
}

fn execute_train(config: &TrainConfig) -> Result<TrainSummary, CliError> {
    info!(
        "generating {} synthetic samples (seed {})",
        config.synthetic.samples, config.synthetic.seed
    );
    let dataset = generate(&config.synthetic, &RuleBasedScorer::default())?;
    let (model, report) = train(&dataset, &config.training)?;
    write_model(&config.output, &model).map_err(CliError::WriteModel)?;
    info!(
        "wrote safety model to {} (validation MAE {:.4})",
        config.output, report.mean_absolute_error
    );
    Ok(TrainSummary {
        model_path: config.output.clone(),
        samples: dataset.len(),
        training_rows: report.training_rows,
        validation_rows: report.validation_rows,
        mean_absolute_error: report.mean_absolute_error,
        min_prediction: report.min_prediction,
        max_prediction: report.max_prediction,
    })
}
