//! Three-tier schema mapping: exact, synonym, fuzzy.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use resto_model::{FeatureMapping, FeatureMatch, MatchKind, SynonymTable};

use crate::columns::ColumnIndex;
use crate::derive::add_derived_features;
use crate::report::MappingReport;
use crate::utils::{normalize_name, token_sort_ratio};

/// Minimum number of mapped features for a dataset to be usable.
pub const DEFAULT_MIN_MATCHES: usize = 5;
/// Minimum token-sort score (0-100) for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapperOptions {
    pub min_matches: usize,
    pub fuzzy_threshold: f64,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            min_matches: DEFAULT_MIN_MATCHES,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl MapperOptions {
    pub fn accepts_fuzzy(&self, score: f64) -> bool {
        score >= self.fuzzy_threshold
    }
}

/// Maps required classifier features onto the columns of a dataset.
///
/// # Example
///
/// ```ignore
/// let mapper = SchemaMapper::new(&bundle.synonyms, MapperOptions::default());
/// let report = mapper.map(&df, bundle.classifier.feature_names())?;
/// if !report.is_valid {
///     eprintln!("{}", report.message);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SchemaMapper {
    synonyms: BTreeMap<String, Vec<String>>,
    options: MapperOptions,
}

impl SchemaMapper {
    /// Creates a mapper. Synonym keys are normalized; entries whose keys
    /// collide after normalization are concatenated in table order.
    pub fn new(synonyms: &SynonymTable, options: MapperOptions) -> Self {
        let mut normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (feature, alternates) in synonyms.iter() {
            normalized
                .entry(normalize_name(feature))
                .or_default()
                .extend(alternates.iter().cloned());
        }
        Self {
            synonyms: normalized,
            options,
        }
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Finds the column for one feature, trying each tier in order.
    pub fn match_feature(&self, feature: &str, columns: &ColumnIndex) -> Option<FeatureMatch> {
        let key = normalize_name(feature);
        let found = |column: &str, kind: MatchKind| FeatureMatch {
            feature: feature.to_string(),
            column: column.to_string(),
            kind,
        };

        if let Some(column) = columns.get(&key) {
            return Some(found(column, MatchKind::Exact));
        }

        if let Some(alternates) = self.synonyms.get(&key) {
            for synonym in alternates {
                if let Some(column) = columns.get(&normalize_name(synonym)) {
                    return Some(found(
                        column,
                        MatchKind::Synonym {
                            synonym: synonym.clone(),
                        },
                    ));
                }
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (normalized, original) in columns.iter() {
            let score = token_sort_ratio(&key, normalized);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((original, score));
            }
        }
        match best {
            Some((column, score)) if self.options.accepts_fuzzy(score) => {
                Some(found(column, MatchKind::Fuzzy { score }))
            }
            Some((column, score)) => {
                debug!(feature, column, score, "best fuzzy candidate below threshold");
                None
            }
            None => None,
        }
    }

    /// Maps `required` features onto `df`.
    ///
    /// The caller's frame is left untouched; derived columns are added to a
    /// copy returned in the report. An insufficient dataset is reported
    /// through [`MappingReport::is_valid`], not as an error.
    pub fn map(&self, df: &DataFrame, required: &[String]) -> Result<MappingReport> {
        let required = dedup_preserving_order(required);
        let mut frame = df.clone();
        let columns = ColumnIndex::new(frame.get_column_names().iter().map(|n| n.as_str()));

        let mut mapping = FeatureMapping::new();
        for feature in &required {
            match self.match_feature(feature, &columns) {
                Some(entry) => {
                    debug!(
                        feature = %entry.feature,
                        column = %entry.column,
                        tier = entry.kind.tier(),
                        "feature matched"
                    );
                    mapping.insert(entry);
                }
                None => debug!(feature = %feature, "no column for feature"),
            }
        }

        let derived =
            add_derived_features(&mut frame).context("failed to compute derived features")?;
        for column in derived {
            if !required.contains(&column.name) || mapping.contains(&column.name) {
                continue;
            }
            mapping.insert(FeatureMatch {
                feature: column.name.clone(),
                column: column.name,
                kind: MatchKind::Derived {
                    inputs: column.inputs,
                },
            });
        }

        let report = MappingReport::new(required, mapping, self.options.min_matches, frame);
        info!(
            matched = report.matched_count(),
            required = report.required.len(),
            min_matches = report.min_matches,
            valid = report.is_valid,
            "schema mapping finished"
        );
        Ok(report)
    }
}

fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}
