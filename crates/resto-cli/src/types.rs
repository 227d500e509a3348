use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use resto_map::MappingReport;
use resto_rank::{DecisionMatrix, FeatureContribution, StrategyRanking};

/// A top-ranked strategy with the details shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub rank: u32,
    pub strategy_id: String,
    pub title: String,
    pub group: Option<String>,
    pub closeness: f64,
    pub description: String,
    pub implementation: Vec<String>,
    pub breakdown: Vec<FeatureContribution>,
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    /// Too few features could be mapped.
    Insufficient,
    /// No catalog strategy uses any mapped feature.
    NoApplicableStrategy,
    Ranked {
        matrix: DecisionMatrix,
        ranking: StrategyRanking,
        recommendations: Vec<Recommendation>,
    },
}

#[derive(Debug)]
pub struct AnalysisResult {
    pub mapping: MappingReport,
    /// Classifier importances renormalized over the mapped features.
    pub importances: BTreeMap<String, f64>,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn status(&self) -> &'static str {
        match self.outcome {
            AnalysisOutcome::Insufficient => "insufficient",
            AnalysisOutcome::NoApplicableStrategy => "no_applicable_strategy",
            AnalysisOutcome::Ranked { .. } => "ranked",
        }
    }

    /// 0 when strategies were ranked, 2 when the dataset could not be used.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            AnalysisOutcome::Ranked { .. } => 0,
            AnalysisOutcome::Insufficient | AnalysisOutcome::NoApplicableStrategy => 2,
        }
    }

    /// The `limit` most important mapped features, largest first.
    pub fn top_importances(&self, limit: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .importances
            .iter()
            .map(|(feature, &value)| (feature.as_str(), value))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        entries.truncate(limit);
        entries
    }
}
