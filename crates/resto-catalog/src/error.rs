use std::path::PathBuf;

use resto_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("unrecognized polarity {value:?} for feature {feature} in {path}")]
    InvalidPolarity {
        path: PathBuf,
        feature: String,
        value: String,
    },

    #[error("empty feature name on line {line} of {path}")]
    EmptyFeatureName { path: PathBuf, line: usize },

    #[error("duplicate strategy id {id} in {path}")]
    DuplicateStrategy { path: PathBuf, id: String },

    #[error("strategy {id} in {path} has an empty id or title")]
    IncompleteStrategy { path: PathBuf, id: String },

    #[error("invalid weight {value} for feature {feature} of strategy {id} in {path}")]
    InvalidWeight {
        path: PathBuf,
        id: String,
        feature: String,
        value: f64,
    },

    #[error("invalid classifier artifact {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
