//! Behaviour-driven steps covering artefact preparation and ranking.

use super::helpers::{CITY_GRID, workspace, write_utf8};
use super::*;
use crate::import_lights::run_import_lights_with;
use crate::rank::run_rank_with;
use crate::train::run_train_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use saferoute_core::{Coordinate, RankResponse};
use saferoute_data::lights::read_lights_artefact;
use serde_json::json;
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct ArtefactWorld {
    _tmp: TempDir,
    artefacts_dir: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ArtefactWorld {
    fn new() -> Self {
        let (tmp, artefacts_dir) = workspace();
        Self {
            _tmp: tmp,
            artefacts_dir,
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn grid_path(&self) -> Utf8PathBuf {
        self.artefacts_dir.join("viirs.asc")
    }

    fn request_path(&self) -> Utf8PathBuf {
        self.artefacts_dir.join("rank.json")
    }

    fn argv(&self, command: &str, extra: &[String]) -> Vec<String> {
        let mut argv = vec!["saferoute".to_owned(), command.to_owned()];
        argv.extend(extra.iter().cloned());
        argv.extend([
            format!("--{ARG_ARTEFACTS_DIR}"),
            self.artefacts_dir.as_str().to_owned(),
        ]);
        argv
    }

    fn run(&self, argv: Vec<String>) {
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let mut buffer = self.stdout.borrow_mut();
        buffer.clear();
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::ImportLights(args) => run_import_lights_with(args, &mut *buffer),
            Command::Train(args) => run_train_with(args, &mut *buffer),
            Command::Rank(args) => run_rank_with(args, &mut *buffer),
            Command::Analyze(_) => panic!("analyze is covered by its own scenarios"),
        });
        self.result.replace(Some(outcome));
    }

    fn assert_succeeded(&self) {
        let borrowed = self.result.borrow();
        let outcome = borrowed.as_ref().expect("result recorded");
        if let Err(err) = outcome {
            panic!("expected success, found {err:?}");
        }
    }
}

#[fixture]
fn world() -> ArtefactWorld {
    ArtefactWorld::new()
}

#[given("an ESRI ASCII lights grid exists on disk")]
fn ascii_grid_exists(#[from(world)] world: &ArtefactWorld) {
    write_utf8(&world.grid_path(), CITY_GRID.as_bytes());
}

#[given("a safety model trained on {samples} synthetic samples")]
fn model_trained(#[from(world)] world: &ArtefactWorld, samples: usize) {
    let extra = [format!("--{ARG_TRAIN_SAMPLES}"), samples.to_string()];
    world.run(world.argv("train", &extra));
    world.assert_succeeded();
}

#[given("a rank request with three candidate routes exists on disk")]
fn rank_request_exists(#[from(world)] world: &ArtefactWorld) {
    let request = json!({
        "routes": [
            {"name": "market lane", "pos_score": 0.2, "neg_score": 0.6, "light_score": 0.35},
            {"name": "main road", "pos_score": 0.7, "neg_score": 0.1, "light_score": 0.7},
            {"name": "park path", "pos_score": 0.4, "neg_score": 0.3, "light_score": 0.5},
        ]
    });
    let payload = serde_json::to_vec(&request).expect("serialise request");
    write_utf8(&world.request_path(), &payload);
}

#[when("I run the import-lights command")]
fn run_import(#[from(world)] world: &ArtefactWorld) {
    let extra = [world.grid_path().into_string()];
    world.run(world.argv("import-lights", &extra));
}

#[when("I run the rank command")]
fn run_rank(#[from(world)] world: &ArtefactWorld) {
    let extra = [world.request_path().into_string()];
    world.run(world.argv("rank", &extra));
}

#[then("the imported lights artefact reports the city centre brightness")]
fn imported_lights_readable(#[from(world)] world: &ArtefactWorld) {
    world.assert_succeeded();
    let grid = read_lights_artefact(&world.artefacts_dir.join(LIGHTS_FILE))
        .expect("lights artefact should load");
    let centre = Coordinate::new(12.9716, 77.5946).expect("valid coordinate");
    assert_eq!(grid.value_at(centre), Some(30.0));
}

#[then("the candidates are printed safest first")]
fn candidates_safest_first(#[from(world)] world: &ArtefactWorld) {
    world.assert_succeeded();
    let raw: serde_json::Value =
        serde_json::from_slice(&world.stdout.borrow()).expect("rank output JSON");
    assert!(raw.is_array(), "rank output should be a bare array");
    let response: RankResponse =
        serde_json::from_slice(&world.stdout.borrow()).expect("rank response JSON");
    let names: Vec<&str> = response
        .routes
        .iter()
        .filter_map(|scored| scored.route.extra.get("name"))
        .filter_map(|name| name.as_str())
        .collect();
    assert_eq!(names, ["main road", "park path", "market lane"]);
}

#[then("the command fails because the model artefact is missing")]
fn command_fails_missing_model(#[from(world)] world: &ArtefactWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(*field, ARG_MODEL);
            assert_eq!(*path, world.artefacts_dir.join(MODEL_FILE));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

macro_rules! register_artefact_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/artefact_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ArtefactWorld) {
            let _ = world;
        }
    };
}

register_artefact_scenario!(import_lights_grid, "importing a lights grid");
register_artefact_scenario!(train_then_rank, "training a model and ranking routes");
register_artefact_scenario!(rank_without_model, "ranking without a trained model");
