//! Feature extractors run over sampled route points.
//!
//! Both extractors are independent: [`poi::PoiExtractor`] tallies nearby
//! places per polarity and [`lighting::LightingExtractor`] reduces raster
//! readings to a normalised score. Neither propagates collaborator failures;
//! a failed lookup only removes that lookup from the result.

pub mod lighting;
pub mod poi;
