//! Library components of the strategy recommender CLI.

pub mod export;
pub mod logging;
pub mod pipeline;
pub mod types;
