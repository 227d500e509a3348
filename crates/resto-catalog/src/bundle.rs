//! Everything the pipeline needs from disk, loaded once.

use std::path::{Path, PathBuf};

use tracing::info;

use resto_model::{ClassifierArtifact, FeatureRegistry, StrategyCatalog, SynonymTable};

use crate::error::Result;
use crate::hash::sha256_hex_parts;
use crate::loaders::{
    parse_classifier_artifact, parse_feature_registry, parse_strategy_catalog, parse_synonyms,
    read_bytes,
};
use crate::paths::{CLASSIFIER_FILE, FEATURES_FILE, STRATEGIES_FILE, SYNONYMS_FILE};

#[derive(Debug, Clone)]
pub struct CatalogBundle {
    pub root: PathBuf,
    pub classifier_path: PathBuf,
    pub features: FeatureRegistry,
    pub synonyms: SynonymTable,
    pub strategies: StrategyCatalog,
    pub classifier: ClassifierArtifact,
    /// SHA-256 over the four source files, in load order.
    pub fingerprint: String,
}

impl CatalogBundle {
    /// Loads the catalog under `root`, with the classifier artifact taken from
    /// `classifier` or `root/classifier.json`.
    pub fn load(root: &Path, classifier: Option<&Path>) -> Result<Self> {
        let classifier_path = classifier
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CLASSIFIER_FILE));

        let features_path = root.join(FEATURES_FILE);
        let synonyms_path = root.join(SYNONYMS_FILE);
        let strategies_path = root.join(STRATEGIES_FILE);

        let features_bytes = read_bytes(&features_path)?;
        let synonyms_bytes = read_bytes(&synonyms_path)?;
        let strategies_bytes = read_bytes(&strategies_path)?;
        let classifier_bytes = read_bytes(&classifier_path)?;

        let features = parse_feature_registry(&features_path, &features_bytes)?;
        let synonyms = parse_synonyms(&synonyms_path, &synonyms_bytes)?;
        let strategies = parse_strategy_catalog(&strategies_path, &strategies_bytes)?;
        let classifier = parse_classifier_artifact(&classifier_path, &classifier_bytes)?;

        let fingerprint = sha256_hex_parts([
            features_bytes.as_slice(),
            synonyms_bytes.as_slice(),
            strategies_bytes.as_slice(),
            classifier_bytes.as_slice(),
        ]);

        info!(
            root = %root.display(),
            features = features.len(),
            strategies = strategies.len(),
            required = classifier.len(),
            fingerprint = %fingerprint,
            "catalog loaded"
        );

        Ok(Self {
            root: root.to_path_buf(),
            classifier_path,
            features,
            synonyms,
            strategies,
            classifier,
            fingerprint,
        })
    }
}
