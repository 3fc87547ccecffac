use crate::{Coordinate, Polarity};

/// A point of interest located along a route.
///
/// Records are produced by the POI extractor, deduplicated by `id` within a
/// single analysis and never persisted.
///
/// # Examples
/// ```
/// use saferoute_core::{Coordinate, PoiRecord, Polarity};
///
/// # fn main() -> Result<(), saferoute_core::CoordinateError> {
/// let record = PoiRecord {
///     id: "ChIJ-police".into(),
///     location: Coordinate::new(12.97, 77.59)?,
///     category: "police".into(),
///     polarity: Polarity::Positive,
/// };
/// assert_eq!(record.polarity, Polarity::Positive);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    /// Opaque identifier, unique per real-world place.
    pub id: String,
    /// Location reported by the places service.
    pub location: Coordinate,
    /// Category the place was found under.
    pub category: String,
    /// Polarity of that category.
    pub polarity: Polarity,
}
