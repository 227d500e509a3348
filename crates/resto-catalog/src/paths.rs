//! Catalog directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the catalog directory.
pub const CATALOG_ENV_VAR: &str = "RESTO_CATALOG_DIR";

pub const FEATURES_FILE: &str = "features.csv";
pub const SYNONYMS_FILE: &str = "synonyms.toml";
pub const STRATEGIES_FILE: &str = "strategies.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Get the catalog root directory.
///
/// Resolution order:
/// 1. `RESTO_CATALOG_DIR` environment variable
/// 2. `catalog/` directory relative to workspace root
pub fn catalog_root() -> PathBuf {
    if let Ok(root) = std::env::var(CATALOG_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../catalog")
}
