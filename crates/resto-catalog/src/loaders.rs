//! Parsers for the catalog data files.
//!
//! Parsers work on in-memory content so the bundle can fingerprint exactly
//! the bytes it parsed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use resto_model::{
    ClassifierArtifact, FeatureMetadata, FeatureRegistry, Polarity, Strategy, StrategyCatalog,
    SynonymTable,
};

use crate::error::{CatalogError, Result};

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CatalogError::io(path, source))
}

/// Parses `name,category,polarity,description` rows.
///
/// Header names are matched case-insensitively; `description` is optional.
pub fn parse_feature_registry(path: &Path, bytes: &[u8]) -> Result<FeatureRegistry> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|err| CatalogError::csv(path, &err))?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let name_idx = column("name")?;
    let category_idx = column("category")?;
    let polarity_idx = column("polarity")?;
    let description_idx = column("description").ok();

    let mut features = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| CatalogError::csv(path, &err))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let name = field(name_idx);
        if name.is_empty() {
            return Err(CatalogError::EmptyFeatureName {
                path: path.to_path_buf(),
                line: row + 2,
            });
        }
        let raw_polarity = field(polarity_idx);
        let polarity = Polarity::parse(&raw_polarity);
        if !polarity.is_recognized() {
            return Err(CatalogError::InvalidPolarity {
                path: path.to_path_buf(),
                feature: name,
                value: raw_polarity,
            });
        }
        features.push(FeatureMetadata {
            name,
            category: field(category_idx),
            polarity,
            description: description_idx.map(field).unwrap_or_default(),
        });
    }
    debug!(path = %path.display(), features = features.len(), "loaded feature metadata");
    Ok(FeatureRegistry::new(features))
}

#[derive(Debug, Deserialize)]
struct SynonymsFile {
    #[serde(default)]
    synonyms: BTreeMap<String, Vec<String>>,
}

pub fn parse_synonyms(path: &Path, bytes: &[u8]) -> Result<SynonymTable> {
    let text = String::from_utf8_lossy(bytes);
    let file: SynonymsFile = toml::from_str(&text).map_err(|source| CatalogError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), entries = file.synonyms.len(), "loaded synonyms");
    Ok(SynonymTable::new(file.synonyms))
}

/// Parses the strategy array and checks ids, titles and weights.
pub fn parse_strategy_catalog(path: &Path, bytes: &[u8]) -> Result<StrategyCatalog> {
    let strategies: Vec<Strategy> =
        serde_json::from_slice(bytes).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let mut seen = BTreeSet::new();
    for strategy in &strategies {
        if strategy.id.trim().is_empty() || strategy.title.trim().is_empty() {
            return Err(CatalogError::IncompleteStrategy {
                path: path.to_path_buf(),
                id: strategy.id.clone(),
            });
        }
        if !seen.insert(strategy.id.as_str()) {
            return Err(CatalogError::DuplicateStrategy {
                path: path.to_path_buf(),
                id: strategy.id.clone(),
            });
        }
        for (feature, &value) in &strategy.features {
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidWeight {
                    path: path.to_path_buf(),
                    id: strategy.id.clone(),
                    feature: feature.clone(),
                    value,
                });
            }
        }
    }
    debug!(path = %path.display(), strategies = strategies.len(), "loaded strategy catalog");
    Ok(StrategyCatalog::new(strategies))
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    features: Vec<String>,
    importances: Vec<f64>,
}

pub fn parse_classifier_artifact(path: &Path, bytes: &[u8]) -> Result<ClassifierArtifact> {
    let file: ArtifactFile = serde_json::from_slice(bytes).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact = ClassifierArtifact::new(file.features, file.importances).map_err(|source| {
        CatalogError::Model {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), features = artifact.len(), "loaded classifier artifact");
    Ok(artifact)
}
