use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use resto_catalog::{CatalogBundle, catalog_root};
use resto_cli::export::{
    AnalysisReport, ExportPaths, MappingSummary, write_analysis_exports, write_mapping_exports,
};
use resto_cli::pipeline::{AnalysisOptions, analyze, map_dataset};
use resto_cli::types::AnalysisResult;
use resto_ingest::read_dataset;
use resto_map::{MapperOptions, MappingReport};

use crate::cli::{AnalyzeArgs, CatalogArgs, MapArgs, MappingArgs, StrategiesArgs};
use crate::summary::{print_features, print_strategies};

/// Completed `analyze` run.
pub struct AnalyzeRun {
    pub bundle: CatalogBundle,
    pub result: AnalysisResult,
    pub report: AnalysisReport,
    pub exports: Option<ExportPaths>,
}

/// Completed `map` run.
pub struct MapRun {
    pub bundle: CatalogBundle,
    pub report: MappingReport,
    pub summary: MappingSummary,
    pub exports: Option<ExportPaths>,
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeRun> {
    let span = info_span!("analyze", dataset = %args.dataset.display());
    let _guard = span.enter();
    let bundle = load_bundle(&args.catalog)?;
    let df = load_dataset(&args.dataset)?;
    let options = AnalysisOptions {
        mapper: mapper_options(&args.mapping),
        top: args.top,
    };
    let result = analyze(&bundle, &df, &options)?;
    let report = AnalysisReport::new(&args.dataset, &bundle, &result);
    let exports = match &args.output_dir {
        Some(dir) => Some(write_analysis_exports(dir, &args.dataset, &bundle, &result)?),
        None => None,
    };
    info!(status = result.status(), "analysis finished");
    Ok(AnalyzeRun {
        bundle,
        result,
        report,
        exports,
    })
}

pub fn run_map(args: &MapArgs) -> Result<MapRun> {
    let span = info_span!("map", dataset = %args.dataset.display());
    let _guard = span.enter();
    let bundle = load_bundle(&args.catalog)?;
    let df = load_dataset(&args.dataset)?;
    let report = map_dataset(&bundle, &df, &mapper_options(&args.mapping))?;
    let summary = MappingSummary::from_report(&report);
    let exports = match &args.output_dir {
        Some(dir) => Some(write_mapping_exports(dir, &bundle, &report)?),
        None => None,
    };
    Ok(MapRun {
        bundle,
        report,
        summary,
        exports,
    })
}

pub fn run_features(args: &CatalogArgs) -> Result<()> {
    let bundle = load_bundle(args)?;
    print_features(&bundle.features);
    Ok(())
}

pub fn run_strategies(args: &StrategiesArgs) -> Result<()> {
    let bundle = load_bundle(&args.catalog)?;
    print_strategies(&bundle.strategies, args.group.as_deref());
    Ok(())
}

fn load_bundle(args: &CatalogArgs) -> Result<CatalogBundle> {
    let root = args.catalog_dir.clone().unwrap_or_else(catalog_root);
    CatalogBundle::load(&root, args.classifier.as_deref())
        .with_context(|| format!("load catalog from {}", root.display()))
}

fn load_dataset(path: &Path) -> Result<DataFrame> {
    read_dataset(path).with_context(|| format!("read dataset {}", path.display()))
}

fn mapper_options(args: &MappingArgs) -> MapperOptions {
    MapperOptions {
        min_matches: args.min_matches,
        fuzzy_threshold: args.fuzzy_threshold,
    }
}
