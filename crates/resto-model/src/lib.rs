#![deny(unsafe_code)]

pub mod error;
pub mod feature;
pub mod importance;
pub mod mapping;
pub mod ranking;
pub mod strategy;

pub use error::{ModelError, Result};
pub use feature::{FeatureMetadata, FeatureRegistry, Polarity};
pub use importance::{ClassifierArtifact, FeatureImportance};
pub use mapping::{FeatureMapping, FeatureMatch, MatchKind, SynonymTable};
pub use ranking::RankedStrategy;
pub use strategy::{Strategy, StrategyCatalog};
