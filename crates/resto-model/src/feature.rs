//! Feature metadata: category grouping and benefit/cost polarity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of preference for a feature column.
///
/// `Benefit` columns prefer higher values, `Cost` columns prefer lower values.
/// Any other tag is preserved as `Unrecognized` so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Polarity {
    #[default]
    Benefit,
    Cost,
    Unrecognized(String),
}

impl Polarity {
    /// Parses a polarity tag case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "benefit" => Self::Benefit,
            "cost" => Self::Cost,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Benefit => "Benefit",
            Self::Cost => "Cost",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Polarity {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Polarity> for String {
    fn from(value: Polarity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one model feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub name: String,
    pub category: String,
    pub polarity: Polarity,
    #[serde(default)]
    pub description: String,
}

/// Lookup table of feature metadata, preserving load order.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<FeatureMetadata>,
    index: BTreeMap<String, usize>,
}

impl FeatureRegistry {
    /// Builds a registry. Later entries with the same name replace earlier ones.
    pub fn new(features: Vec<FeatureMetadata>) -> Self {
        let mut registry = Self::default();
        for feature in features {
            registry.insert(feature);
        }
        registry
    }

    pub fn insert(&mut self, feature: FeatureMetadata) {
        match self.index.get(&feature.name) {
            Some(&idx) => self.features[idx] = feature,
            None => {
                self.index.insert(feature.name.clone(), self.features.len());
                self.features.push(feature);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureMetadata> {
        self.index.get(name).map(|&idx| &self.features[idx])
    }

    /// Polarity for a feature, `Benefit` when the feature is unknown.
    pub fn polarity_of(&self, name: &str) -> Polarity {
        self.get(name)
            .map(|meta| meta.polarity.clone())
            .unwrap_or_default()
    }

    pub fn category_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|meta| meta.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMetadata> {
        self.features.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|meta| meta.name.clone()).collect()
    }

    /// Groups features by category, in first-seen category order.
    pub fn by_category(&self) -> Vec<(String, Vec<&FeatureMetadata>)> {
        let mut groups: Vec<(String, Vec<&FeatureMetadata>)> = Vec::new();
        for feature in &self.features {
            match groups.iter_mut().find(|(cat, _)| cat == &feature.category) {
                Some((_, members)) => members.push(feature),
                None => groups.push((feature.category.clone(), vec![feature])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
