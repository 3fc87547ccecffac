//! Shared test harness modules for the Saferoute CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod artefact_steps;
mod helpers;
mod import_lights_unit;
mod train_unit;
