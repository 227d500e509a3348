//! Feature-to-column mapping records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a feature was matched to a dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum MatchKind {
    /// Normalized names are identical.
    Exact,
    /// Matched through an entry of the synonym table.
    Synonym { synonym: String },
    /// Token-sort similarity at or above the acceptance threshold (0-100).
    Fuzzy { score: f64 },
    /// Computed from other columns of the dataset.
    Derived { inputs: Vec<String> },
}

impl MatchKind {
    pub fn tier(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Synonym { .. } => "synonym",
            Self::Fuzzy { .. } => "fuzzy",
            Self::Derived { .. } => "derived",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Synonym { synonym } => write!(f, "synonym ({synonym})"),
            Self::Fuzzy { score } => write!(f, "fuzzy ({score:.1})"),
            Self::Derived { inputs } => write!(f, "derived ({})", inputs.join(", ")),
        }
    }
}

/// One mapped feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatch {
    /// Required model feature name.
    pub feature: String,
    /// Dataset column (or synthesized column) providing its values.
    pub column: String,
    pub kind: MatchKind,
}

/// Mapping from feature name to dataset column, in match order.
///
/// A feature is mapped at most once; later inserts for the same feature are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMapping {
    entries: Vec<FeatureMatch>,
}

impl FeatureMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a match. Returns `false` if the feature was already mapped.
    pub fn insert(&mut self, entry: FeatureMatch) -> bool {
        if self.contains(&entry.feature) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.entries.iter().any(|e| e.feature == feature)
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureMatch> {
        self.entries.iter().find(|e| e.feature == feature)
    }

    pub fn column_for(&self, feature: &str) -> Option<&str> {
        self.get(feature).map(|e| e.column.as_str())
    }

    /// Mapped feature names in match order.
    pub fn features(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.feature.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMatch> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Alternate column spellings per feature, in priority order.
///
/// Keys are feature names as written in the synonym source; the mapper
/// normalizes both keys and values before comparing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    pub fn get(&self, feature: &str) -> &[String] {
        self.entries.get(feature).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
