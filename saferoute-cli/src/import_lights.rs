//! Import-lights command implementation for the Saferoute CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_data::lights::{load_ascii_grid, write_lights_artefact};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ARTEFACTS_DIR, ARG_IMPORT_OUTPUT, ARG_IMPORT_SOURCE, CliError, ENV_IMPORT_SOURCE,
    LIGHTS_FILE, artefact_path, require_existing, write_json,
};

/// CLI arguments for the `import-lights` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import-lights",
    long_about = "Convert a nighttime lights raster exported as an ESRI \
                 ASCII grid into the binary lights artefact (lights.bin) \
                 read by the analyze command.",
    about = "Import a nighttime lights grid"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct ImportLightsArgs {
    /// Path to the ESRI ASCII grid.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) source: Option<Utf8PathBuf>,
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the output path (`lights.bin`).
    #[arg(long = ARG_IMPORT_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ImportLightsArgs {
    pub(crate) fn into_config(self) -> Result<ImportLightsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportLightsConfig::try_from(merged)
    }
}

/// Resolved `import-lights` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportLightsConfig {
    /// ASCII grid to read.
    pub(crate) source: Utf8PathBuf,
    /// Artefact to write.
    pub(crate) output: Utf8PathBuf,
}

impl TryFrom<ImportLightsArgs> for ImportLightsConfig {
    type Error = CliError;

    fn try_from(args: ImportLightsArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_IMPORT_SOURCE,
            env: ENV_IMPORT_SOURCE,
        })?;
        let output = artefact_path(args.output, args.artefacts_dir.as_deref(), LIGHTS_FILE);
        Ok(Self { source, output })
    }
}

/// Summary printed after a successful import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ImportSummary {
    /// Where the artefact was written.
    pub(crate) lights_path: Utf8PathBuf,
    /// Grid columns.
    pub(crate) columns: u32,
    /// Grid rows.
    pub(crate) rows: u32,
    /// Cell edge in degrees.
    pub(crate) cell_size: f64,
    /// Western edge in degrees of longitude.
    pub(crate) west: f64,
    /// Northern edge in degrees of latitude.
    pub(crate) north: f64,
}

pub(super) fn run_import_lights(args: ImportLightsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_lights_with(args, &mut stdout)
}

pub(super) fn run_import_lights_with(
    args: ImportLightsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.source, ARG_IMPORT_SOURCE)?;
    let summary = execute_import(&config)?;
    write_json(writer, &summary)
}

fn execute_import(config: &ImportLightsConfig) -> Result<ImportSummary, CliError> {
    let grid = load_ascii_grid(&config.source).map_err(CliError::ImportLights)?;
    write_lights_artefact(&config.output, &grid)?;
    let geometry = grid.geometry();
    info!(
        "imported {}x{} lights grid from {} into {}",
        geometry.columns, geometry.rows, config.source, config.output
    );
    Ok(ImportSummary {
        lights_path: config.output.clone(),
        columns: geometry.columns,
        rows: geometry.rows,
        cell_size: geometry.cell_size,
        west: geometry.west,
        north: geometry.north,
    })
}
