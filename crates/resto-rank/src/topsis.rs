//! TOPSIS: ranking alternatives by relative closeness to an ideal point.
//!
//! Rows are alternatives, columns are criteria. Each column is
//! vector-normalized and scaled by its weight; the ideal takes the best value
//! per column according to its polarity, the anti-ideal the worst.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use resto_model::Polarity;

use crate::error::{RankError, Result};

/// Denominator used for a column whose values are all zero.
pub const ZERO_NORM_EPSILON: f64 = 1e-12;
/// Weights summing to 1 within this tolerance are used as given.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-5;

/// Distance of one alternative to the ideal and anti-ideal points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopsisDistances {
    pub to_ideal: f64,
    pub to_anti_ideal: f64,
}

/// One alternative in ranked order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    /// Row index in the input matrix.
    pub row: usize,
    pub closeness: f64,
    /// Dense rank, 1 = best.
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopsisOutcome {
    /// Weights actually applied, summing to 1.
    pub weights: Vec<f64>,
    pub ideal: Vec<f64>,
    pub anti_ideal: Vec<f64>,
    /// Per input row.
    pub distances: Vec<TopsisDistances>,
    /// Per input row, in [0, 1].
    pub closeness: Vec<f64>,
    /// Sorted by closeness descending; ties keep input order.
    pub ranking: Vec<RankedRow>,
}

/// Checks the shape and weights of a ranking problem.
pub fn validate_inputs(matrix: &[Vec<f64>], weights: &[f64], polarities: &[Polarity]) -> Result<()> {
    let columns = matrix.first().map_or(0, Vec::len);
    if matrix.is_empty() || columns == 0 {
        return Err(RankError::EmptyMatrix);
    }
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != columns {
            return Err(RankError::RaggedRow {
                row,
                expected: columns,
                found: values.len(),
            });
        }
        if let Some((column, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RankError::NonFiniteValue { row, column, value });
        }
    }
    if weights.len() != columns {
        return Err(RankError::WeightCount {
            expected: columns,
            found: weights.len(),
        });
    }
    if polarities.len() != columns {
        return Err(RankError::PolarityCount {
            expected: columns,
            found: polarities.len(),
        });
    }
    if let Some((column, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(RankError::InvalidWeight { column, value });
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(RankError::ZeroWeightSum);
    }
    Ok(())
}

/// Ranks the rows of `matrix`.
///
/// Columns with an unrecognized polarity contribute 0 to both the ideal and
/// the anti-ideal point.
pub fn rank(matrix: &[Vec<f64>], weights: &[f64], polarities: &[Polarity]) -> Result<TopsisOutcome> {
    validate_inputs(matrix, weights, polarities)?;
    let columns = weights.len();

    let weights = rescale_weights(weights);

    let mut norms = vec![0.0; columns];
    for row in matrix {
        for (norm, value) in norms.iter_mut().zip(row) {
            *norm += value * value;
        }
    }
    for norm in &mut norms {
        *norm = norm.sqrt();
        if *norm == 0.0 {
            *norm = ZERO_NORM_EPSILON;
        }
    }

    let weighted: Vec<Vec<f64>> = matrix
        .iter()
        .map(|row| {
            row.iter()
                .zip(&norms)
                .zip(&weights)
                .map(|((value, norm), weight)| value / norm * weight)
                .collect()
        })
        .collect();

    let mut ideal = vec![0.0; columns];
    let mut anti_ideal = vec![0.0; columns];
    for (column, polarity) in polarities.iter().enumerate() {
        let (min, max) = column_bounds(&weighted, column);
        match polarity {
            Polarity::Benefit => {
                ideal[column] = max;
                anti_ideal[column] = min;
            }
            Polarity::Cost => {
                ideal[column] = min;
                anti_ideal[column] = max;
            }
            Polarity::Unrecognized(tag) => {
                debug!(column, polarity = %tag, "unrecognized polarity, ideal values left at zero");
            }
        }
    }

    let distances: Vec<TopsisDistances> = weighted
        .iter()
        .map(|row| TopsisDistances {
            to_ideal: euclidean(row, &ideal),
            to_anti_ideal: euclidean(row, &anti_ideal),
        })
        .collect();

    let closeness: Vec<f64> = distances
        .iter()
        .map(|d| {
            let total = d.to_ideal + d.to_anti_ideal;
            if total > 0.0 {
                d.to_anti_ideal / total
            } else {
                0.0
            }
        })
        .collect();

    let ranking = dense_ranking(&closeness);

    Ok(TopsisOutcome {
        weights,
        ideal,
        anti_ideal,
        distances,
        closeness,
        ranking,
    })
}

fn rescale_weights(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        return weights.to_vec();
    }
    debug!(total, "rescaling weights to sum to one");
    weights.iter().map(|w| w / total).collect()
}

fn column_bounds(matrix: &[Vec<f64>], column: usize) -> (f64, f64) {
    matrix.iter().map(|row| row[column]).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), value| (min.min(value), max.max(value)),
    )
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Sorts rows by closeness descending and assigns dense ranks.
pub(crate) fn dense_ranking(closeness: &[f64]) -> Vec<RankedRow> {
    let mut order: Vec<usize> = (0..closeness.len()).collect();
    order.sort_by(|&a, &b| {
        closeness[b]
            .partial_cmp(&closeness[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranking = Vec::with_capacity(order.len());
    let mut rank = 0u32;
    let mut previous: Option<f64> = None;
    for row in order {
        let value = closeness[row];
        if previous != Some(value) {
            rank += 1;
            previous = Some(value);
        }
        ranking.push(RankedRow {
            row,
            closeness: value,
            rank,
        });
    }
    ranking
}
