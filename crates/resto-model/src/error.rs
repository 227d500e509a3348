use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("classifier artifact has {features} feature names but {importances} importances")]
    LengthMismatch { features: usize, importances: usize },
    #[error("importance for feature {feature} must be finite and non-negative, got {value}")]
    InvalidImportance { feature: String, value: f64 },
    #[error("duplicate feature name: {0}")]
    DuplicateFeature(String),
    #[error("feature name must not be empty")]
    EmptyFeatureName,
}

pub type Result<T> = std::result::Result<T, ModelError>;
