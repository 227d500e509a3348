//! File exports: CSV tables and a JSON report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use tracing::info;

use resto_catalog::CatalogBundle;
use resto_map::MappingReport;
use resto_model::{FeatureMatch, MatchKind, RankedStrategy};
use resto_rank::DecisionMatrix;

use crate::types::{AnalysisOutcome, AnalysisResult, Recommendation};

pub const TOPSIS_RESULTS_FILE: &str = "topsis_results.csv";
pub const DECISION_MATRIX_FILE: &str = "decision_matrix.csv";
pub const FEATURE_MAPPING_FILE: &str = "feature_mapping.csv";
pub const MAPPED_DATASET_FILE: &str = "mapped_dataset.csv";
pub const REPORT_FILE: &str = "report.json";

/// Number of importances listed in reports.
pub const IMPORTANCE_LIMIT: usize = 15;

#[derive(Debug, Clone, Serialize)]
pub struct MappingSummary {
    pub is_valid: bool,
    pub message: String,
    pub matched: usize,
    pub required: usize,
    pub min_matches: usize,
    pub entries: Vec<FeatureMatch>,
    pub missing: Vec<String>,
}

impl MappingSummary {
    pub fn from_report(report: &MappingReport) -> Self {
        Self {
            is_valid: report.is_valid,
            message: report.message.clone(),
            matched: report.matched_count(),
            required: report.required.len(),
            min_matches: report.min_matches,
            entries: report.mapping.iter().cloned().collect(),
            missing: report.missing.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportanceEntry {
    pub feature: String,
    pub importance: f64,
}

/// Machine-readable analysis report, written as `report.json` and printed
/// by `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub tool_version: String,
    pub dataset: String,
    pub catalog_fingerprint: String,
    pub status: String,
    pub mapping: MappingSummary,
    pub importances: Vec<ImportanceEntry>,
    pub ranking: Vec<RankedStrategy>,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    pub fn new(dataset: &Path, bundle: &CatalogBundle, result: &AnalysisResult) -> Self {
        let (ranking, recommendations) = match &result.outcome {
            AnalysisOutcome::Ranked {
                ranking,
                recommendations,
                ..
            } => (ranking.ranked.clone(), recommendations.clone()),
            _ => (Vec::new(), Vec::new()),
        };
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            dataset: dataset.display().to_string(),
            catalog_fingerprint: bundle.fingerprint.clone(),
            status: result.status().to_string(),
            mapping: MappingSummary::from_report(&result.mapping),
            importances: result
                .top_importances(IMPORTANCE_LIMIT)
                .into_iter()
                .map(|(feature, importance)| ImportanceEntry {
                    feature: feature.to_string(),
                    importance,
                })
                .collect(),
            ranking,
            recommendations,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize report")
    }
}

/// Paths written by an export.
#[derive(Debug, Default, Clone)]
pub struct ExportPaths {
    pub topsis_results: Option<PathBuf>,
    pub decision_matrix: Option<PathBuf>,
    pub feature_mapping: Option<PathBuf>,
    pub mapped_dataset: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ExportPaths {
    pub fn written(&self) -> Vec<&Path> {
        [
            &self.topsis_results,
            &self.decision_matrix,
            &self.feature_mapping,
            &self.mapped_dataset,
            &self.report,
        ]
        .into_iter()
        .filter_map(|path| path.as_deref())
        .collect()
    }
}

/// Writes all analysis exports into `output_dir`, creating it if needed.
///
/// Ranking tables are only written when strategies were ranked.
pub fn write_analysis_exports(
    output_dir: &Path,
    dataset: &Path,
    bundle: &CatalogBundle,
    result: &AnalysisResult,
) -> Result<ExportPaths> {
    ensure_dir(output_dir)?;
    let mut paths = ExportPaths {
        feature_mapping: Some(write_feature_mapping(
            &output_dir.join(FEATURE_MAPPING_FILE),
            &result.mapping,
            bundle,
        )?),
        ..ExportPaths::default()
    };
    if let AnalysisOutcome::Ranked {
        matrix, ranking, ..
    } = &result.outcome
    {
        paths.topsis_results = Some(write_topsis_results(
            &output_dir.join(TOPSIS_RESULTS_FILE),
            &ranking.ranked,
            bundle,
        )?);
        paths.decision_matrix = Some(write_decision_matrix(
            &output_dir.join(DECISION_MATRIX_FILE),
            matrix,
        )?);
    }
    let report_path = output_dir.join(REPORT_FILE);
    let json = AnalysisReport::new(dataset, bundle, result).to_json()?;
    fs::write(&report_path, json)
        .with_context(|| format!("write report: {}", report_path.display()))?;
    paths.report = Some(report_path);

    info!(dir = %output_dir.display(), files = paths.written().len(), "exports written");
    Ok(paths)
}

/// Writes the mapping table and the mapped feature columns.
pub fn write_mapping_exports(
    output_dir: &Path,
    bundle: &CatalogBundle,
    report: &MappingReport,
) -> Result<ExportPaths> {
    ensure_dir(output_dir)?;
    let feature_mapping =
        write_feature_mapping(&output_dir.join(FEATURE_MAPPING_FILE), report, bundle)?;

    let dataset_path = output_dir.join(MAPPED_DATASET_FILE);
    let mut frame = report.feature_frame()?;
    let mut file = fs::File::create(&dataset_path)
        .with_context(|| format!("create {}", dataset_path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", dataset_path.display()))?;

    let paths = ExportPaths {
        feature_mapping: Some(feature_mapping),
        mapped_dataset: Some(dataset_path),
        ..ExportPaths::default()
    };
    info!(dir = %output_dir.display(), files = paths.written().len(), "exports written");
    Ok(paths)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir: {}", dir.display()))
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))
}

fn write_topsis_results(
    path: &Path,
    ranked: &[RankedStrategy],
    bundle: &CatalogBundle,
) -> Result<PathBuf> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["Strategy", "Title", "Closeness_Score", "Rank"])?;
    for entry in ranked {
        let title = bundle
            .strategies
            .get(&entry.strategy_id)
            .map(|s| s.title.as_str())
            .unwrap_or("");
        writer.write_record([
            entry.strategy_id.as_str(),
            title,
            entry.closeness.to_string().as_str(),
            entry.rank.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_decision_matrix(path: &Path, matrix: &DecisionMatrix) -> Result<PathBuf> {
    let mut writer = csv_writer(path)?;
    let mut header = vec!["Strategy".to_string()];
    header.extend(matrix.features.iter().cloned());
    writer.write_record(&header)?;
    for (strategy, row) in matrix.strategies.iter().zip(&matrix.rows) {
        let mut record = vec![strategy.id.clone()];
        record.extend(row.iter().map(f64::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_feature_mapping(
    path: &Path,
    report: &MappingReport,
    bundle: &CatalogBundle,
) -> Result<PathBuf> {
    let mut writer = csv_writer(path)?;
    writer.write_record([
        "Feature", "Column", "Tier", "Detail", "Category", "Polarity",
    ])?;
    for entry in report.mapping.iter() {
        let category = bundle.features.category_of(&entry.feature).unwrap_or("");
        let polarity = bundle.features.polarity_of(&entry.feature);
        writer.write_record([
            entry.feature.as_str(),
            entry.column.as_str(),
            entry.kind.tier(),
            match_detail(&entry.kind).as_str(),
            category,
            polarity.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn match_detail(kind: &MatchKind) -> String {
    match kind {
        MatchKind::Exact => String::new(),
        MatchKind::Synonym { synonym } => synonym.clone(),
        MatchKind::Fuzzy { score } => format!("{score:.1}"),
        MatchKind::Derived { inputs } => inputs.join("+"),
    }
}
