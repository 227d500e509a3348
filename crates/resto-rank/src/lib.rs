#![deny(unsafe_code)]

pub mod error;
pub mod matrix;
pub mod topsis;

pub use error::{RankError, Result};
pub use matrix::{DecisionMatrix, FeatureContribution, StrategyRanking, ValidStrategy, build};
pub use topsis::{RankedRow, TopsisDistances, TopsisOutcome, rank, validate_inputs};
