use serde::{Deserialize, Serialize};

/// A strategy with its closeness to the ideal solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategy {
    pub strategy_id: String,
    /// Relative closeness to the ideal (0-1).
    pub closeness: f64,
    /// Dense rank, 1 = best.
    pub rank: u32,
}
