//! Fitted safety model and its `model.bin` artefact.
//!
//! The artefact starts with the 4-byte magic `SRMD` and a little-endian
//! `u16` format version, followed by the `bincode` payload. The header is
//! written as part of one `bincode` record, the same framing as
//! `lights.bin`.
#![forbid(unsafe_code)]

use std::io::{BufReader, BufWriter, Read, Write};

use bincode::{deserialize_from, serialize_into};
use camino::Utf8Path;
use log::debug;
use saferoute_core::ModelScorer;
use serde::{Deserialize, Serialize};

use crate::{ModelError, RidgeRegressor, StandardScaler};

/// File identifier for safety model artefacts.
pub const MODEL_MAGIC: [u8; 4] = *b"SRMD";

/// Supported version of the model artefact format.
pub const MODEL_VERSION: u16 = 1;

/// Scorer type served from a [`TrainedModel`].
pub type SafetyScorer = ModelScorer<StandardScaler, RidgeRegressor>;

#[derive(Serialize)]
struct ModelFile<'a> {
    magic: [u8; 4],
    version: u16,
    model: &'a TrainedModel,
}

/// Scaler and regressor fitted together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    scaler: StandardScaler,
    regressor: RidgeRegressor,
}

impl TrainedModel {
    /// Pair a scaler with the regressor fitted on its output.
    #[must_use]
    pub const fn new(scaler: StandardScaler, regressor: RidgeRegressor) -> Self {
        Self { scaler, regressor }
    }

    /// Fitted scaler.
    #[must_use]
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Fitted regressor.
    #[must_use]
    pub const fn regressor(&self) -> &RidgeRegressor {
        &self.regressor
    }

    /// Check that every parameter is finite.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteParameter`] naming the bad parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.scaler.validate()?;
        self.regressor.validate()
    }

    /// Serve the model through the core [`ModelScorer`].
    #[must_use]
    pub const fn into_scorer(self) -> SafetyScorer {
        ModelScorer::new(self.scaler, self.regressor)
    }
}

/// Persist `model` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns [`ModelError::WriteFile`] when the file cannot be created,
/// flushed or synced and [`ModelError::Serialise`] when encoding fails.
pub fn write_model(path: &Utf8Path, model: &TrainedModel) -> Result<(), ModelError> {
    let write_error = |source| ModelError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let file = saferoute_fs::create_file(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let payload = ModelFile {
        magic: MODEL_MAGIC,
        version: MODEL_VERSION,
        model,
    };
    serialize_into(&mut writer, &payload).map_err(|source| ModelError::Serialise {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(write_error)?;
    let synced = writer.into_inner().map_err(|err| write_error(err.into_error()))?;
    synced.sync_all().map_err(write_error)?;
    debug!("wrote safety model to {path}");
    Ok(())
}

/// Load and validate a model from `path`.
///
/// # Errors
/// Returns [`ModelError::InvalidMagic`] or [`ModelError::UnsupportedVersion`]
/// for foreign or outdated files, [`ModelError::Deserialise`] for a corrupt
/// payload and [`ModelError::NonFiniteParameter`] when a decoded parameter
/// is not finite.
pub fn read_model(path: &Utf8Path) -> Result<TrainedModel, ModelError> {
    let read_error = |source| ModelError::ReadFile {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(saferoute_fs::open_file(path).map_err(read_error)?);

    let mut magic = [0_u8; 4];
    reader.read_exact(&mut magic).map_err(read_error)?;
    if magic != MODEL_MAGIC {
        return Err(ModelError::InvalidMagic {
            expected: MODEL_MAGIC,
            found: magic,
        });
    }

    let mut version_bytes = [0_u8; 2];
    reader.read_exact(&mut version_bytes).map_err(read_error)?;
    #[expect(
        clippy::little_endian_bytes,
        reason = "the artefact header is little-endian on every platform"
    )]
    let version = u16::from_le_bytes(version_bytes);
    if version != MODEL_VERSION {
        return Err(ModelError::UnsupportedVersion {
            found: version,
            supported: MODEL_VERSION,
        });
    }

    let model: TrainedModel =
        deserialize_from(&mut reader).map_err(|source| ModelError::Deserialise {
            path: path.to_path_buf(),
            source,
        })?;
    model.validate()?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use saferoute_core::ScoreVector;
    use tempfile::TempDir;

    #[fixture]
    fn model() -> TrainedModel {
        let scaler = StandardScaler::new([0.5, 0.2, 0.6], [0.1, 0.1, 0.1]).expect("scaler");
        let regressor = RidgeRegressor::new([0.06, -0.025, 0.05], 0.55).expect("regressor");
        TrainedModel::new(scaler, regressor)
    }

    fn artefact_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("models/model.bin")).expect("utf8 path")
    }

    #[rstest]
    fn round_trips_through_artefact(model: TrainedModel) {
        let dir = TempDir::new().expect("tempdir");
        let path = artefact_path(&dir);

        write_model(&path, &model).expect("persist model");
        let loaded = read_model(&path).expect("load model");

        assert_eq!(loaded, model);
        let bytes = std::fs::read(&path).expect("read artefact");
        assert_eq!(bytes.get(..4), Some(&b"SRMD"[..]));
    }

    #[rstest]
    fn payload_follows_the_header_in_fixed_width_encoding(model: TrainedModel) {
        let dir = TempDir::new().expect("tempdir");
        let path = artefact_path(&dir);

        write_model(&path, &model).expect("persist model");
        let bytes = std::fs::read(&path).expect("read artefact");

        assert_eq!(bytes.get(4..6), Some(&[1_u8, 0][..]));
        let payload = bytes.get(6..).expect("payload after header");
        let decoded: TrainedModel = bincode::deserialize(payload).expect("fixed-width payload");
        assert_eq!(decoded, model);
        // Header, then ten f64 parameters without length prefixes.
        assert_eq!(bytes.len(), 6 + 10 * 8);
    }

    #[rstest]
    fn rejects_foreign_files() {
        let dir = TempDir::new().expect("tempdir");
        let path = artefact_path(&dir);
        saferoute_fs::ensure_parent_dir(&path).expect("parent");
        std::fs::write(&path, b"SRLG\x01\x00payload").expect("write file");

        let err = read_model(&path).expect_err("magic should fail");
        assert!(matches!(err, ModelError::InvalidMagic { found, .. } if found == *b"SRLG"));
    }

    #[rstest]
    fn rejects_newer_versions() {
        let dir = TempDir::new().expect("tempdir");
        let path = artefact_path(&dir);
        saferoute_fs::ensure_parent_dir(&path).expect("parent");
        std::fs::write(&path, b"SRMD\x02\x00").expect("write file");

        let err = read_model(&path).expect_err("version should fail");
        assert!(matches!(
            err,
            ModelError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
    }

    #[rstest]
    fn rejects_non_finite_payloads(model: TrainedModel) {
        #[derive(Serialize)]
        struct RawRegressor {
            coefficients: [f64; 3],
            intercept: f64,
        }
        #[derive(Serialize)]
        struct RawModel<'a> {
            scaler: &'a StandardScaler,
            regressor: RawRegressor,
        }

        let dir = TempDir::new().expect("tempdir");
        let path = artefact_path(&dir);
        saferoute_fs::ensure_parent_dir(&path).expect("parent");
        let mut bytes = b"SRMD\x01\x00".to_vec();
        let raw = RawModel {
            scaler: model.scaler(),
            regressor: RawRegressor {
                coefficients: [0.0, f64::NAN, 0.0],
                intercept: 0.5,
            },
        };
        serialize_into(&mut bytes, &raw).expect("encode payload");
        std::fs::write(&path, bytes).expect("write file");

        let err = read_model(&path).expect_err("NaN should fail");
        assert!(matches!(err, ModelError::NonFiniteParameter { .. }));
    }

    #[rstest]
    fn missing_files_are_read_errors() {
        let err = read_model(Utf8Path::new("/non-existent/model.bin")).expect_err("missing");
        assert!(matches!(err, ModelError::ReadFile { .. }));
    }

    #[rstest]
    fn serves_clamped_scores(model: TrainedModel) {
        let scorer = model.into_scorer();
        let bright = ScoreVector::new(1.0, 0.0, 1.0);
        let dark = ScoreVector::new(0.0, 1.0, 0.0);

        let ranked = scorer.rank(&[dark, bright]);

        assert_eq!(ranked.first().map(|route| route.index), Some(1));
        assert!(ranked.iter().all(|route| (0.0..=1.0).contains(&route.safety_score)));
    }
}
