//! Feature importance sources.
//!
//! The ranking pipeline only needs a lookup from feature name to a
//! non-negative weight. [`ClassifierArtifact`] is the loaded classifier
//! handle; plain maps implement the same trait for tests and overrides.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Lookup of importance weight by feature name.
pub trait FeatureImportance {
    /// Returns the importance of `feature`, or `None` when it has no recorded weight.
    fn importance(&self, feature: &str) -> Option<f64>;
}

impl FeatureImportance for BTreeMap<String, f64> {
    fn importance(&self, feature: &str) -> Option<f64> {
        self.get(feature).copied()
    }
}

impl FeatureImportance for HashMap<String, f64> {
    fn importance(&self, feature: &str) -> Option<f64> {
        self.get(feature).copied()
    }
}

impl<T: FeatureImportance + ?Sized> FeatureImportance for &T {
    fn importance(&self, feature: &str) -> Option<f64> {
        (**self).importance(feature)
    }
}

/// Feature list and importance vector exported from the trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArtifact", into = "RawArtifact")]
pub struct ClassifierArtifact {
    features: Vec<String>,
    importances: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct RawArtifact {
    features: Vec<String>,
    importances: Vec<f64>,
}

impl TryFrom<RawArtifact> for ClassifierArtifact {
    type Error = ModelError;

    fn try_from(raw: RawArtifact) -> Result<Self> {
        Self::new(raw.features, raw.importances)
    }
}

impl From<ClassifierArtifact> for RawArtifact {
    fn from(artifact: ClassifierArtifact) -> Self {
        Self {
            features: artifact.features,
            importances: artifact.importances,
        }
    }
}

impl ClassifierArtifact {
    /// Pairs feature names with importances.
    ///
    /// # Errors
    ///
    /// Fails when the two vectors differ in length, a name is empty or
    /// duplicated, or an importance is negative or not finite.
    pub fn new(features: Vec<String>, importances: Vec<f64>) -> Result<Self> {
        if features.len() != importances.len() {
            return Err(ModelError::LengthMismatch {
                features: features.len(),
                importances: importances.len(),
            });
        }
        let mut seen = BTreeSet::new();
        for (name, &value) in features.iter().zip(&importances) {
            if name.trim().is_empty() {
                return Err(ModelError::EmptyFeatureName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateFeature(name.clone()));
            }
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidImportance {
                    feature: name.clone(),
                    value,
                });
            }
        }
        Ok(Self {
            features,
            importances,
        })
    }

    /// Feature names in the classifier's training order.
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Importances of `features`, rescaled to sum to one over that subset.
    ///
    /// Features unknown to the classifier are skipped. When the subset sums to
    /// zero the raw values are returned unchanged.
    pub fn normalized_over(&self, features: &[String]) -> BTreeMap<String, f64> {
        let mut selected = BTreeMap::new();
        for feature in features {
            if let Some(value) = self.importance(feature) {
                selected.insert(feature.clone(), value);
            }
        }
        let total: f64 = selected.values().sum();
        if total > 0.0 {
            for value in selected.values_mut() {
                *value /= total;
            }
        }
        selected
    }
}

impl FeatureImportance for ClassifierArtifact {
    fn importance(&self, feature: &str) -> Option<f64> {
        self.features
            .iter()
            .position(|f| f == feature)
            .map(|idx| self.importances[idx])
    }
}
