//! Decision matrix: strategies as rows, matched features as columns.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use resto_model::{FeatureImportance, FeatureRegistry, Polarity, RankedStrategy, StrategyCatalog};

use crate::error::Result;
use crate::topsis::{TopsisOutcome, rank};

/// Cells are scaled by this factor so small products stay readable.
pub const CELL_SCALE: f64 = 100.0;

/// A catalog strategy restricted to the matched features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidStrategy {
    pub id: String,
    pub title: String,
    /// Weights over matched features, summing to 1.
    pub weights: BTreeMap<String, f64>,
}

/// One feature's share of a strategy's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub strategy_weight: f64,
    pub importance: f64,
    /// `strategy_weight * importance`.
    pub combined: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    /// Row labels.
    pub strategies: Vec<ValidStrategy>,
    /// Column labels.
    pub features: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    /// Criterion weight per column.
    pub weights: Vec<f64>,
    pub polarities: Vec<Polarity>,
}

/// TOPSIS outcome with rows resolved to strategy ids.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRanking {
    pub outcome: TopsisOutcome,
    /// Best first.
    pub ranked: Vec<RankedStrategy>,
}

/// Builds the decision matrix for the matched features.
///
/// Each strategy keeps only its matched features, with weights renormalized
/// to sum to 1; strategies left with nothing (or only zero weights) are
/// dropped. Returns `None` when no strategy remains.
pub fn build<I>(
    matched: &[String],
    importance: &I,
    catalog: &StrategyCatalog,
    registry: &FeatureRegistry,
) -> Option<DecisionMatrix>
where
    I: FeatureImportance + ?Sized,
{
    let mut strategies = Vec::new();
    for strategy in catalog.iter() {
        let restricted: BTreeMap<String, f64> = strategy
            .features
            .iter()
            .filter(|(feature, _)| matched.contains(*feature))
            .map(|(feature, &weight)| (feature.clone(), weight))
            .collect();
        let total: f64 = restricted.values().sum();
        if restricted.is_empty() || total <= 0.0 {
            debug!(strategy = %strategy.id, "no usable matched features, strategy skipped");
            continue;
        }
        strategies.push(ValidStrategy {
            id: strategy.id.clone(),
            title: strategy.title.clone(),
            weights: restricted
                .into_iter()
                .map(|(feature, weight)| (feature, weight / total))
                .collect(),
        });
    }

    if strategies.is_empty() {
        info!(matched = matched.len(), "no strategies applicable");
        return None;
    }

    let rows = strategies
        .iter()
        .map(|strategy| {
            matched
                .iter()
                .map(|feature| {
                    let weight = strategy.weights.get(feature).copied().unwrap_or(0.0);
                    weight * importance.importance(feature).unwrap_or(0.0) * CELL_SCALE
                })
                .collect()
        })
        .collect();

    let uniform = 1.0 / matched.len() as f64;
    let weights = matched
        .iter()
        .map(|feature| {
            importance.importance(feature).unwrap_or_else(|| {
                debug!(feature = %feature, "no importance recorded, using uniform weight");
                uniform
            })
        })
        .collect();

    let polarities = matched
        .iter()
        .map(|feature| {
            if registry.get(feature).is_none() {
                debug!(feature = %feature, "no metadata, treating as benefit");
            }
            registry.polarity_of(feature)
        })
        .collect();

    info!(
        strategies = strategies.len(),
        features = matched.len(),
        "decision matrix built"
    );

    Some(DecisionMatrix {
        strategies,
        features: matched.to_vec(),
        rows,
        weights,
        polarities,
    })
}

impl DecisionMatrix {
    pub fn strategy_ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn strategy(&self, id: &str) -> Option<&ValidStrategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    /// Runs TOPSIS over the matrix.
    pub fn rank(&self) -> Result<StrategyRanking> {
        let outcome = rank(&self.rows, &self.weights, &self.polarities)?;
        let ranked = outcome
            .ranking
            .iter()
            .map(|row| RankedStrategy {
                strategy_id: self.strategies[row.row].id.clone(),
                closeness: row.closeness,
                rank: row.rank,
            })
            .collect();
        Ok(StrategyRanking { outcome, ranked })
    }

    /// Per-feature contributions to a strategy, largest strategy weight first.
    pub fn breakdown<I>(&self, id: &str, importance: &I) -> Option<Vec<FeatureContribution>>
    where
        I: FeatureImportance + ?Sized,
    {
        let strategy = self.strategy(id)?;
        let mut parts: Vec<FeatureContribution> = strategy
            .weights
            .iter()
            .map(|(feature, &strategy_weight)| {
                let importance = importance.importance(feature).unwrap_or(0.0);
                FeatureContribution {
                    feature: feature.clone(),
                    strategy_weight,
                    importance,
                    combined: strategy_weight * importance,
                }
            })
            .collect();
        parts.sort_by(|a, b| {
            b.strategy_weight
                .partial_cmp(&a.strategy_weight)
                .unwrap_or(Ordering::Equal)
        });
        Some(parts)
    }
}

#[cfg(test)]
mod tests {
    use resto_model::{FeatureMetadata, Strategy};

    use super::*;

    fn strategy(id: &str, features: &[(&str, f64)]) -> Strategy {
        Strategy {
            id: id.to_string(),
            title: format!("Strategy {id}"),
            group: None,
            description: String::new(),
            implementation: Vec::new(),
            features: features
                .iter()
                .map(|(name, weight)| ((*name).to_string(), *weight))
                .collect(),
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn restricted_weights_sum_to_one() {
        let catalog = StrategyCatalog::new(vec![strategy(
            "E1",
            &[("WaitTime", 0.3), ("ServiceRating", 0.1), ("Age", 0.6)],
        )]);
        let importance: BTreeMap<String, f64> = BTreeMap::new();
        let matrix = build(
            &names(&["WaitTime", "ServiceRating"]),
            &importance,
            &catalog,
            &FeatureRegistry::default(),
        )
        .unwrap();
        let weights = &matrix.strategies[0].weights;
        let total: f64 = weights.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((weights["WaitTime"] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_strategy_is_dropped() {
        let catalog = StrategyCatalog::new(vec![
            strategy("A1", &[("Age", 0.0), ("OnlineUser", 1.0)]),
            strategy("B1", &[("Age", 0.5)]),
        ]);
        let importance: BTreeMap<String, f64> = BTreeMap::new();
        let matrix = build(
            &names(&["Age"]),
            &importance,
            &catalog,
            &FeatureRegistry::default(),
        )
        .unwrap();
        assert_eq!(matrix.strategy_ids(), vec!["B1"]);
    }

    #[test]
    fn polarity_comes_from_registry() {
        let registry = FeatureRegistry::new(vec![FeatureMetadata {
            name: "WaitTime".to_string(),
            category: "Service Quality".to_string(),
            polarity: Polarity::Cost,
            description: String::new(),
        }]);
        let catalog = StrategyCatalog::new(vec![strategy("E1", &[("WaitTime", 1.0)])]);
        let importance: BTreeMap<String, f64> = BTreeMap::new();
        let matrix = build(&names(&["WaitTime", "Age"]), &importance, &catalog, &registry).unwrap();
        assert_eq!(matrix.polarities, vec![Polarity::Cost, Polarity::Benefit]);
    }
}
