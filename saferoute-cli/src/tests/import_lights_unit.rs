//! Focused unit tests covering the import-lights CLI command.

use super::helpers::{CITY_GRID, workspace, write_utf8};
use super::*;
use crate::import_lights::{
    ImportLightsArgs, ImportLightsConfig, ImportSummary, run_import_lights_with,
};
use rstest::rstest;
use saferoute_core::Coordinate;
use saferoute_data::lights::{LightsError, read_lights_artefact};

#[rstest]
fn converting_import_without_source_errors() {
    let err = ImportLightsConfig::try_from(ImportLightsArgs::default())
        .expect_err("missing source should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_IMPORT_SOURCE);
            assert_eq!(env, ENV_IMPORT_SOURCE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn import_config_writes_into_the_artefacts_dir() {
    let args = ImportLightsArgs {
        source: Some(Utf8PathBuf::from("viirs.asc")),
        artefacts_dir: Some(Utf8PathBuf::from("artefacts")),
        output: None,
    };

    let config = ImportLightsConfig::try_from(args).expect("config should build");

    assert_eq!(config.source, Utf8PathBuf::from("viirs.asc"));
    assert_eq!(config.output, Utf8PathBuf::from("artefacts/lights.bin"));
}

#[rstest]
fn import_converts_the_grid_and_prints_a_summary() {
    let (_tmp, root) = workspace();
    let source = root.join("viirs.asc");
    write_utf8(&source, CITY_GRID.as_bytes());
    let args = ImportLightsArgs {
        source: Some(source),
        artefacts_dir: Some(root.clone()),
        output: None,
    };

    let mut stdout: Vec<u8> = Vec::new();
    run_import_lights_with(args, &mut stdout).expect("import should succeed");

    let summary: ImportSummary = serde_json::from_slice(&stdout).expect("summary JSON");
    assert_eq!(summary.lights_path, root.join("lights.bin"));
    assert_eq!((summary.columns, summary.rows), (3, 2));
    assert_eq!(summary.cell_size, 0.5);
    assert_eq!((summary.west, summary.north), (77.0, 13.0));

    let grid = read_lights_artefact(&summary.lights_path).expect("artefact should load");
    let centre = Coordinate::new(12.9716, 77.5946).expect("valid coordinate");
    assert_eq!(grid.value_at(centre), Some(30.0));
}

#[rstest]
fn import_reports_missing_sources() {
    let (_tmp, root) = workspace();
    let args = ImportLightsArgs {
        source: Some(root.join("absent.asc")),
        artefacts_dir: Some(root.clone()),
        output: None,
    };

    let mut stdout: Vec<u8> = Vec::new();
    let err = run_import_lights_with(args, &mut stdout).expect_err("missing source should fail");

    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_IMPORT_SOURCE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn import_rejects_grids_without_a_cell_size() {
    let (_tmp, root) = workspace();
    let source = root.join("broken.asc");
    write_utf8(&source, b"ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\n3\n");
    let output = root.join("lights.bin");
    let args = ImportLightsArgs {
        source: Some(source),
        artefacts_dir: None,
        output: Some(output.clone()),
    };

    let mut stdout: Vec<u8> = Vec::new();
    let err = run_import_lights_with(args, &mut stdout).expect_err("broken grid should fail");

    match err {
        CliError::ImportLights(LightsError::MissingHeader { key }) => assert_eq!(key, "cellsize"),
        other => panic!("expected ImportLights, found {other:?}"),
    }
    assert!(!output.exists());
}
