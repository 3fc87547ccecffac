//! Focused unit tests covering the train CLI command.

use super::helpers::workspace;
use super::*;
use crate::train::{TrainArgs, TrainConfig, TrainSummary, run_train_with};
use rstest::rstest;
use saferoute_scorer::{SyntheticConfig, TrainingConfig, TrainingError, read_model};

#[rstest]
fn train_config_uses_canonical_defaults() {
    let config = TrainConfig::from(TrainArgs::default());

    assert_eq!(config.output, Utf8PathBuf::from("./model.bin"));
    assert_eq!(config.synthetic, SyntheticConfig::default());
    assert_eq!(config.training, TrainingConfig::default());
}

#[rstest]
fn train_config_shares_the_seed_and_applies_overrides() {
    let args = TrainArgs {
        artefacts_dir: Some(Utf8PathBuf::from("artefacts")),
        samples: Some(250),
        seed: Some(7),
        validation_fraction: Some(0.25),
        alpha: Some(0.5),
        ..TrainArgs::default()
    };

    let config = TrainConfig::from(args);

    assert_eq!(config.output, Utf8PathBuf::from("artefacts/model.bin"));
    assert_eq!(config.synthetic, SyntheticConfig { samples: 250, seed: 7 });
    assert_eq!(
        config.training,
        TrainingConfig {
            validation_fraction: 0.25,
            seed: 7,
            alpha: 0.5,
        }
    );
}

#[rstest]
fn train_writes_model_and_prints_summary() {
    let (_tmp, root) = workspace();
    let output = root.join("models/model.bin");
    let args = TrainArgs {
        output: Some(output.clone()),
        samples: Some(300),
        ..TrainArgs::default()
    };

    let mut stdout: Vec<u8> = Vec::new();
    run_train_with(args, &mut stdout).expect("training should succeed");

    let summary: TrainSummary = serde_json::from_slice(&stdout).expect("summary JSON");
    assert_eq!(summary.model_path, output);
    assert_eq!(summary.samples, 300);
    assert_eq!(summary.validation_rows, 60);
    assert_eq!(summary.training_rows, 240);
    assert!(summary.mean_absolute_error < 0.1);
    assert!(summary.min_prediction >= 0.0 && summary.max_prediction <= 1.0);
    read_model(&output).expect("written model should load");
}

#[rstest]
fn train_rejects_empty_datasets() {
    let (_tmp, root) = workspace();
    let output = root.join("model.bin");
    let args = TrainArgs {
        output: Some(output.clone()),
        samples: Some(0),
        ..TrainArgs::default()
    };

    let mut stdout: Vec<u8> = Vec::new();
    let err = run_train_with(args, &mut stdout).expect_err("no samples should fail");

    match err {
        CliError::Train(TrainingError::EmptyDataset { .. }) => {}
        other => panic!("expected Train(EmptyDataset), found {other:?}"),
    }
    assert!(!output.exists());
}

#[rstest]
fn train_rejects_invalid_validation_fractions() {
    let (_tmp, root) = workspace();
    let args = TrainArgs {
        output: Some(root.join("model.bin")),
        samples: Some(50),
        validation_fraction: Some(1.5),
        ..TrainArgs::default()
    };

    let mut stdout: Vec<u8> = Vec::new();
    let err = run_train_with(args, &mut stdout).expect_err("fraction should fail");

    match err {
        CliError::Train(TrainingError::InvalidParameter { name, .. }) => {
            assert_eq!(name, "validation_fraction");
        }
        other => panic!("expected Train(InvalidParameter), found {other:?}"),
    }
}
