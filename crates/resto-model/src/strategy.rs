use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A predefined business strategy and its raw feature weights.
///
/// Weights are not required to sum to one; they are renormalized over the
/// features available for a given dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub implementation: Vec<String>,
    pub features: BTreeMap<String, f64>,
}

impl Strategy {
    /// Display label such as `"E1: Digital Queue Management"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.id, self.title)
    }
}

/// Ordered collection of strategies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyCatalog {
    strategies: Vec<Strategy>,
}

impl StrategyCatalog {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn get(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
