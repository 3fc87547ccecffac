//! Data adapters for Saferoute.
//!
//! [`places`] queries a nearby-places HTTP API for the categories a route is
//! scored against. [`lights`] imports nighttime radiance grids and serves
//! brightness lookups from a persisted artefact.

#![forbid(unsafe_code)]

pub mod lights;
pub mod places;
