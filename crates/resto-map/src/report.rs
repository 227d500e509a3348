use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::DataFrame;

use resto_model::{FeatureMapping, FeatureMatch, FeatureRegistry};

/// Category used for mapped features without metadata.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Outcome of mapping a dataset onto the required features.
#[derive(Debug, Clone)]
pub struct MappingReport {
    /// True when at least `min_matches` distinct features were mapped.
    pub is_valid: bool,
    pub message: String,
    /// Mapped feature names, in match order.
    pub matched_features: Vec<String>,
    pub mapping: FeatureMapping,
    /// Required features with no column, in required order.
    pub missing: Vec<String>,
    /// Distinct required features, in input order.
    pub required: Vec<String>,
    pub min_matches: usize,
    /// Copy of the input dataset with derived columns added.
    pub frame: DataFrame,
}

impl MappingReport {
    pub(crate) fn new(
        required: Vec<String>,
        mapping: FeatureMapping,
        min_matches: usize,
        frame: DataFrame,
    ) -> Self {
        let matched_features = mapping.features();
        let missing = required
            .iter()
            .filter(|feature| !mapping.contains(feature))
            .cloned()
            .collect();
        let matched = matched_features.len();
        let is_valid = matched >= min_matches;
        let message = if is_valid {
            format!(
                "Dataset valid: {matched}/{} features mapped.",
                required.len()
            )
        } else {
            format!(
                "Dataset too generic: only {matched}/{} features matched, at least {min_matches} required.",
                required.len()
            )
        };
        Self {
            is_valid,
            message,
            matched_features,
            mapping,
            missing,
            required,
            min_matches,
            frame,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.matched_features.len()
    }

    /// Mapped features grouped by metadata category, in registry category
    /// order with unknown features last.
    pub fn by_category<'a>(
        &'a self,
        registry: &FeatureRegistry,
    ) -> Vec<(String, Vec<&'a FeatureMatch>)> {
        let mut groups: Vec<(String, Vec<&FeatureMatch>)> = registry
            .by_category()
            .into_iter()
            .map(|(category, _)| (category, Vec::new()))
            .collect();
        for entry in self.mapping.iter() {
            let category = registry.category_of(&entry.feature).unwrap_or(UNCATEGORIZED);
            match groups.iter_mut().find(|(name, _)| name.as_str() == category) {
                Some((_, members)) => members.push(entry),
                None => groups.push((category.to_string(), vec![entry])),
            }
        }
        groups.retain(|(_, members)| !members.is_empty());
        groups
    }

    /// Number of mapped features per match tier.
    pub fn count_by_tier(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.mapping.iter() {
            *counts.entry(entry.kind.tier()).or_insert(0) += 1;
        }
        counts
    }

    /// Columns backing the mapped features, renamed to the feature names.
    ///
    /// A column that backs several features appears once per feature.
    pub fn feature_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.mapping.len());
        for entry in self.mapping.iter() {
            let mut column = self.frame.column(&entry.column)?.clone();
            column.rename(entry.feature.as_str().into());
            columns.push(column);
        }
        Ok(DataFrame::new(columns)?)
    }
}
