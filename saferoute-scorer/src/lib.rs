//! Offline training and loading of the Saferoute safety model.
//!
//! The crate covers the model half of route scoring:
//! - **Synthetic data** draws seeded route samples and labels them with the
//!   rule-based scorer from `saferoute-core`.
//! - **Training** standardises the score vectors with a [`StandardScaler`],
//!   fits a [`RidgeRegressor`] and reports held-out error.
//! - **Artefacts** persist the fitted pair as `model.bin` and load it back,
//!   rejecting foreign files, newer format versions and non-finite
//!   parameters.
//!
//! A loaded [`TrainedModel`] is served through
//! [`ModelScorer`](saferoute_core::ModelScorer) via
//! [`TrainedModel::into_scorer`].
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use saferoute_core::RuleBasedScorer;
//! use saferoute_scorer::{SyntheticConfig, TrainingConfig, generate, train, write_model};
//!
//! let dataset = generate(&SyntheticConfig::default(), &RuleBasedScorer::default())
//!     .expect("generate dataset");
//! let (model, report) = train(&dataset, &TrainingConfig::default()).expect("train model");
//! write_model(Utf8Path::new("artifacts/model.bin"), &model).expect("persist model");
//! println!("validation MAE {:.4}", report.mean_absolute_error);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dataset;
mod error;
mod linear;
mod model;
mod scaler;
mod training;

pub use dataset::{Dataset, SyntheticConfig, generate};
pub use error::{ModelError, TrainingError};
pub use linear::RidgeRegressor;
pub use model::{
    MODEL_MAGIC, MODEL_VERSION, SafetyScorer, TrainedModel, read_model, write_model,
};
pub use scaler::StandardScaler;
pub use training::{TrainingConfig, TrainingReport, train};
