//! Place categories and the polarity they contribute to a safety score.
//!
//! The default table assumes categories that are open around the clock:
//! emergency services and staffed venues count towards safety, late-night
//! drinking venues count against it.
//!
//! # Examples
//! ```
//! use saferoute_core::{CategoryTable, Polarity};
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.polarity_of("police"), Some(Polarity::Positive));
//! assert_eq!(table.polarity_of("bar"), Some(Polarity::Negative));
//! assert_eq!(table.polarity_of("museum"), None);
//! ```

use std::collections::HashSet;

/// Direction in which a category moves the safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Polarity {
    /// Presence suggests a safer route.
    Positive,
    /// Presence suggests a riskier route.
    Negative,
}

impl Polarity {
    /// Return the polarity as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A places-service category label paired with its polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoiCategory {
    name: String,
    polarity: Polarity,
}

impl PoiCategory {
    /// Construct a category.
    #[must_use]
    pub fn new(name: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            name: name.into(),
            polarity,
        }
    }

    /// Category label as understood by the places service.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polarity contributed by places in this category.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }
}

const DEFAULT_POSITIVE: [&str; 6] = [
    "police",
    "hospital",
    "fire_station",
    "atm",
    "gas_station",
    "lodging",
];
const DEFAULT_NEGATIVE: [&str; 3] = ["bar", "night_club", "liquor_store"];

/// Static configuration listing which categories to query.
///
/// Positive categories are queried before negative ones. Each name appears
/// once; when a name is listed under both polarities the first listing wins.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "CategoryLists", into = "CategoryLists")
)]
pub struct CategoryTable {
    categories: Vec<PoiCategory>,
}

impl CategoryTable {
    /// Build a table from positive and negative category names.
    #[must_use]
    pub fn from_lists<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let mut seen = HashSet::new();
        let categories = positive
            .into_iter()
            .map(|name| PoiCategory::new(name, Polarity::Positive))
            .chain(
                negative
                    .into_iter()
                    .map(|name| PoiCategory::new(name, Polarity::Negative)),
            )
            .filter(|category| seen.insert(category.name.clone()))
            .collect();
        Self { categories }
    }

    /// Iterate over categories in query order.
    pub fn iter(&self) -> impl Iterator<Item = &PoiCategory> {
        self.categories.iter()
    }

    /// Number of configured categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the table has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up the polarity for a category name.
    #[must_use]
    pub fn polarity_of(&self, name: &str) -> Option<Polarity> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(PoiCategory::polarity)
    }

    #[cfg(feature = "serde")]
    fn names_with(&self, polarity: Polarity) -> Vec<String> {
        self.categories
            .iter()
            .filter(|category| category.polarity == polarity)
            .map(|category| category.name.clone())
            .collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_lists(DEFAULT_POSITIVE, DEFAULT_NEGATIVE)
    }
}

/// Serialised form of a [`CategoryTable`].
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryLists {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
}

#[cfg(feature = "serde")]
impl From<CategoryLists> for CategoryTable {
    fn from(lists: CategoryLists) -> Self {
        Self::from_lists(lists.positive, lists.negative)
    }
}

#[cfg(feature = "serde")]
impl From<CategoryTable> for CategoryLists {
    fn from(table: CategoryTable) -> Self {
        Self {
            positive: table.names_with(Polarity::Positive),
            negative: table.names_with(Polarity::Negative),
        }
    }
}
