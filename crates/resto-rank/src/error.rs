/// Malformed input to the ranking engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    #[error("decision matrix has no rows or no columns")]
    EmptyMatrix,

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-finite value {value} at row {row}, column {column}")]
    NonFiniteValue {
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("{found} weights given for {expected} columns")]
    WeightCount { expected: usize, found: usize },

    #[error("{found} polarities given for {expected} columns")]
    PolarityCount { expected: usize, found: usize },

    #[error("weight {value} for column {column} is negative or not finite")]
    InvalidWeight { column: usize, value: f64 },

    #[error("weights sum to zero")]
    ZeroWeightSum,
}

pub type Result<T> = std::result::Result<T, RankError>;
