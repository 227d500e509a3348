//! Analysis pipeline: map the dataset, build the decision matrix, rank.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use resto_catalog::CatalogBundle;
use resto_map::{MapperOptions, MappingReport, SchemaMapper};
use resto_rank::{DecisionMatrix, StrategyRanking, build};

use crate::types::{AnalysisOutcome, AnalysisResult, Recommendation};

pub const DEFAULT_TOP: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub mapper: MapperOptions,
    /// Number of strategies detailed as recommendations.
    pub top: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mapper: MapperOptions::default(),
            top: DEFAULT_TOP,
        }
    }
}

/// Maps `df` onto the classifier's required features.
pub fn map_dataset(
    bundle: &CatalogBundle,
    df: &DataFrame,
    options: &MapperOptions,
) -> Result<MappingReport> {
    let span = info_span!("map");
    let _guard = span.enter();
    let start = Instant::now();
    let mapper = SchemaMapper::new(&bundle.synonyms, *options);
    let report = mapper
        .map(df, bundle.classifier.feature_names())
        .context("map dataset columns")?;
    info!(
        matched = report.matched_count(),
        required = report.required.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "mapping stage complete"
    );
    Ok(report)
}

/// Runs the full analysis. Unusable datasets are reported through
/// [`AnalysisOutcome`]; only malformed inputs are errors.
pub fn analyze(
    bundle: &CatalogBundle,
    df: &DataFrame,
    options: &AnalysisOptions,
) -> Result<AnalysisResult> {
    let mapping = map_dataset(bundle, df, &options.mapper)?;
    let importances = bundle.classifier.normalized_over(&mapping.matched_features);

    if !mapping.is_valid {
        warn!(message = %mapping.message, "dataset cannot be analyzed");
        return Ok(AnalysisResult {
            mapping,
            importances,
            outcome: AnalysisOutcome::Insufficient,
        });
    }

    let Some(matrix) = build_matrix(bundle, &mapping, &importances) else {
        warn!("no strategies applicable to the mapped features");
        return Ok(AnalysisResult {
            mapping,
            importances,
            outcome: AnalysisOutcome::NoApplicableStrategy,
        });
    };

    let ranking = rank_matrix(&matrix)?;
    let recommendations = recommendations(bundle, &matrix, &ranking, &importances, options.top);

    Ok(AnalysisResult {
        mapping,
        importances,
        outcome: AnalysisOutcome::Ranked {
            matrix,
            ranking,
            recommendations,
        },
    })
}

fn build_matrix(
    bundle: &CatalogBundle,
    mapping: &MappingReport,
    importances: &BTreeMap<String, f64>,
) -> Option<DecisionMatrix> {
    let span = info_span!("matrix");
    let _guard = span.enter();
    let start = Instant::now();
    let matrix = build(
        &mapping.matched_features,
        importances,
        &bundle.strategies,
        &bundle.features,
    );
    info!(
        strategies = matrix.as_ref().map_or(0, |m| m.strategies.len()),
        duration_ms = start.elapsed().as_millis() as u64,
        "matrix stage complete"
    );
    matrix
}

fn rank_matrix(matrix: &DecisionMatrix) -> Result<StrategyRanking> {
    let span = info_span!("rank");
    let _guard = span.enter();
    let start = Instant::now();
    let ranking = matrix.rank().context("invalid ranking input")?;
    info!(
        strategies = ranking.ranked.len(),
        best = ranking.ranked.first().map_or("-", |r| r.strategy_id.as_str()),
        duration_ms = start.elapsed().as_millis() as u64,
        "ranking stage complete"
    );
    Ok(ranking)
}

fn recommendations(
    bundle: &CatalogBundle,
    matrix: &DecisionMatrix,
    ranking: &StrategyRanking,
    importances: &BTreeMap<String, f64>,
    top: usize,
) -> Vec<Recommendation> {
    ranking
        .ranked
        .iter()
        .take(top)
        .filter_map(|ranked| {
            let strategy = bundle.strategies.get(&ranked.strategy_id)?;
            Some(Recommendation {
                rank: ranked.rank,
                strategy_id: ranked.strategy_id.clone(),
                title: strategy.title.clone(),
                group: strategy.group.clone(),
                closeness: ranked.closeness,
                description: strategy.description.clone(),
                implementation: strategy.implementation.clone(),
                breakdown: matrix
                    .breakdown(&ranked.strategy_id, importances)
                    .unwrap_or_default(),
            })
        })
        .collect()
}
