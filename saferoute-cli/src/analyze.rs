//! Analyse command implementation for the Saferoute CLI.

use std::fmt;
use std::io::Write;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{
    AnalysisConfig, AnalyzeRequest, AnalyzeResponse, BrightnessRaster, LightingPolicy,
    PlacesProvider, RouteAnalyzer, Statistic,
};
use saferoute_data::lights::SharedLightsRaster;
use saferoute_data::places::{DEFAULT_BASE_URL, HttpPlacesProvider, HttpPlacesProviderConfig};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ANALYZE_LIGHTING_PERCENTILE, ARG_ANALYZE_LIGHTING_PRESET, ARG_ANALYZE_LIGHTING_REFERENCE,
    ARG_ANALYZE_LIGHTS, ARG_ANALYZE_PLACES_API_KEY, ARG_ANALYZE_PLACES_BASE_URL,
    ARG_ANALYZE_RADIUS_M, ARG_ANALYZE_REQUEST, ARG_ANALYZE_STRIDE, ARG_ARTEFACTS_DIR, CliError,
    ENV_ANALYZE_PLACES_API_KEY, ENV_ANALYZE_REQUEST, LIGHTING_PRESET_CANONICAL,
    LIGHTING_PRESET_PERCENTILE, LIGHTS_FILE, artefact_path, load_request, require_existing,
    write_json,
};

/// CLI arguments for the `analyze` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "analyze",
    long_about = "Analyse a route given as a JSON-encoded AnalyzeRequest. \
                 Sampled points are looked up against the places service \
                 and the nighttime lights artefact (lights.bin), and the \
                 features are combined into a rule-based safety score.",
    about = "Analyse one route"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct AnalyzeArgs {
    /// Path to a JSON file containing an AnalyzeRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Directory containing the default artefact filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the path to the lights artefact (`lights.bin`).
    #[arg(long = ARG_ANALYZE_LIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) lights: Option<Utf8PathBuf>,
    /// API key for the places service.
    #[arg(long = ARG_ANALYZE_PLACES_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) places_api_key: Option<String>,
    /// Base URL of the places service.
    #[arg(long = ARG_ANALYZE_PLACES_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_base_url: Option<String>,
    /// Keep every n-th route point.
    #[arg(long = ARG_ANALYZE_STRIDE, value_name = "n")]
    #[serde(default)]
    pub(crate) stride: Option<NonZeroUsize>,
    /// Places search radius in metres.
    #[arg(long = ARG_ANALYZE_RADIUS_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_m: Option<f64>,
    /// Lighting policy to start from: `canonical` or `percentile-variant`.
    #[arg(long = ARG_ANALYZE_LIGHTING_PRESET, value_name = "preset")]
    #[serde(default)]
    pub(crate) lighting_preset: Option<String>,
    /// Summarise readings by this percentile instead of the preset statistic.
    #[arg(long = ARG_ANALYZE_LIGHTING_PERCENTILE, value_name = "percent")]
    #[serde(default)]
    pub(crate) lighting_percentile: Option<f64>,
    /// Radiance mapped to a lighting score of 1.
    #[arg(long = ARG_ANALYZE_LIGHTING_REFERENCE, value_name = "radiance")]
    #[serde(default)]
    pub(crate) lighting_reference: Option<f64>,
}

impl AnalyzeArgs {
    pub(crate) fn into_config(self) -> Result<AnalyzeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyzeConfig::try_from(merged)
    }
}

/// Resolved `analyze` command configuration.
#[derive(Clone, PartialEq)]
pub(crate) struct AnalyzeConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to `lights.bin`.
    pub(crate) lights: Utf8PathBuf,
    /// Places service credential.
    pub(crate) places_api_key: String,
    /// Places service base URL.
    pub(crate) places_base_url: String,
    /// Sampling and scoring settings.
    pub(crate) analysis: AnalysisConfig,
}

impl fmt::Debug for AnalyzeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzeConfig")
            .field("request_path", &self.request_path)
            .field("lights", &self.lights)
            .field("places_api_key", &"<redacted>")
            .field("places_base_url", &self.places_base_url)
            .field("analysis", &self.analysis)
            .finish()
    }
}

impl AnalyzeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_ANALYZE_REQUEST)?;
        require_existing(&self.lights, ARG_ANALYZE_LIGHTS)?;
        Ok(())
    }
}

impl TryFrom<AnalyzeArgs> for AnalyzeConfig {
    type Error = CliError;

    fn try_from(args: AnalyzeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_ANALYZE_REQUEST,
            env: ENV_ANALYZE_REQUEST,
        })?;
        let places_api_key = args
            .places_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ANALYZE_PLACES_API_KEY,
                env: ENV_ANALYZE_PLACES_API_KEY,
            })?;
        let lights = artefact_path(args.lights, args.artefacts_dir.as_deref(), LIGHTS_FILE);
        let places_base_url = args
            .places_base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let lighting = lighting_policy(
            args.lighting_preset.as_deref(),
            args.lighting_percentile,
            args.lighting_reference,
        )?;
        let defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            stride: args.stride.unwrap_or(defaults.stride),
            radius_m: args.radius_m.unwrap_or(defaults.radius_m),
            lighting,
            ..defaults
        };
        analysis.validate()?;

        Ok(Self {
            request_path,
            lights,
            places_api_key,
            places_base_url,
            analysis,
        })
    }
}

/// Resolve the lighting policy from a preset and optional overrides.
fn lighting_policy(
    preset: Option<&str>,
    percentile: Option<f64>,
    reference: Option<f64>,
) -> Result<LightingPolicy, CliError> {
    let base = match preset.map(str::trim) {
        None | Some(LIGHTING_PRESET_CANONICAL) => LightingPolicy::default(),
        Some(LIGHTING_PRESET_PERCENTILE) => LightingPolicy::percentile_variant(),
        Some(other) => {
            return Err(CliError::UnknownLightingPreset {
                value: other.to_owned(),
            });
        }
    };
    Ok(LightingPolicy {
        statistic: percentile.map_or(base.statistic, |value| Statistic::Percentile {
            percentile: value,
        }),
        reference: reference.unwrap_or(base.reference),
        ..base
    })
}

/// Analyser wired to boxed collaborators.
pub(crate) type BoxedAnalyzer = RouteAnalyzer<Box<dyn PlacesProvider>, Box<dyn BrightnessRaster>>;

/// Builds the route analyser for the current invocation.
pub(super) trait AnalyzerBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<BoxedAnalyzer, CliError>;
}

pub(super) struct DefaultAnalyzerBuilder;

impl AnalyzerBuilder for DefaultAnalyzerBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<BoxedAnalyzer, CliError> {
        let raster = load_raster(config)?;
        let provider_config = HttpPlacesProviderConfig::new(config.places_api_key.clone())
            .with_base_url(config.places_base_url.clone());
        let http = HttpPlacesProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildPlacesProvider {
                base_url: config.places_base_url.clone(),
                source,
            }
        })?;
        let provider: Box<dyn PlacesProvider> = Box::new(http);

        Ok(RouteAnalyzer::new(provider, raster, config.analysis.clone())?)
    }
}

/// Load the lights artefact up front so a broken file fails the command.
pub(super) fn load_raster(config: &AnalyzeConfig) -> Result<Box<dyn BrightnessRaster>, CliError> {
    let raster = SharedLightsRaster::new(config.lights.clone());
    raster.load().map_err(CliError::LoadLights)?;
    Ok(Box::new(raster))
}

pub(super) fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultAnalyzerBuilder;
    run_analyze_with(args, &builder, &mut stdout)
}

pub(super) fn run_analyze_with(
    args: AnalyzeArgs,
    builder: &dyn AnalyzerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_analyze(args, builder)?;
    write_json(writer, &response)
}

fn execute_analyze(
    args: AnalyzeArgs,
    builder: &dyn AnalyzerBuilder,
) -> Result<AnalyzeResponse, CliError> {
    let config = resolve_analyze_config(args)?;
    let request: AnalyzeRequest = load_request(&config.request_path)?;
    let analyzer = builder.build(&config)?;
    info!(
        "analysing route of {} points from {}",
        request.coords.len(),
        config.request_path
    );
    let response = request.analyze(&analyzer);
    info!(
        "route scored {:.3} ({} positive, {} negative places)",
        response.safety_score, response.positive_poi_count, response.negative_poi_count
    );
    Ok(response)
}

fn resolve_analyze_config(args: AnalyzeArgs) -> Result<AnalyzeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalyzeConfig, CliError> {
    let merged = AnalyzeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AnalyzeConfig::try_from(merged)
}
