use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use resto_catalog::CatalogBundle;
use resto_cli::export::{ExportPaths, IMPORTANCE_LIMIT};
use resto_cli::types::{AnalysisOutcome, AnalysisResult, Recommendation};
use resto_map::MappingReport;
use resto_model::{FeatureRegistry, MatchKind, Polarity, StrategyCatalog};
use resto_rank::StrategyRanking;

pub fn print_analysis(result: &AnalysisResult, bundle: &CatalogBundle) {
    print_mapping(&result.mapping, bundle);
    match &result.outcome {
        AnalysisOutcome::Insufficient => {}
        AnalysisOutcome::NoApplicableStrategy => {
            println!();
            println!("No strategies in the catalog use any of the mapped features.");
        }
        AnalysisOutcome::Ranked {
            ranking,
            recommendations,
            ..
        } => {
            print_importances(result);
            print_ranking(ranking, bundle);
            print_recommendations(recommendations);
        }
    }
}

pub fn print_mapping(report: &MappingReport, bundle: &CatalogBundle) {
    println!("Catalog: {} ({})", bundle.root.display(), short_hash(&bundle.fingerprint));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Column"),
        header_cell("Match"),
        header_cell("Category"),
        header_cell("Polarity"),
    ]);
    apply_summary_table_style(&mut table);
    for (category, entries) in report.by_category(&bundle.features) {
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.feature).add_attribute(Attribute::Bold),
                Cell::new(&entry.column),
                tier_cell(&entry.kind),
                Cell::new(&category),
                polarity_cell(&bundle.features.polarity_of(&entry.feature)),
            ]);
        }
    }
    println!("{table}");

    let tiers = report.count_by_tier();
    let counts: Vec<String> = tiers
        .iter()
        .map(|(tier, count)| format!("{tier} {count}"))
        .collect();
    if !counts.is_empty() {
        println!("Matches by tier: {}", counts.join(", "));
    }
    if !report.missing.is_empty() {
        println!("Missing ({}): {}", report.missing.len(), report.missing.join(", "));
    }
    if report.is_valid {
        println!("{}", report.message);
    } else {
        eprintln!("{}", report.message);
    }
}

fn print_importances(result: &AnalysisResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Feature"), header_cell("Importance")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (feature, importance) in result.top_importances(IMPORTANCE_LIMIT) {
        table.add_row(vec![Cell::new(feature), Cell::new(format!("{importance:.4}"))]);
    }
    println!();
    println!("Feature importance (top {IMPORTANCE_LIMIT}, renormalized over mapped features):");
    println!("{table}");
}

fn print_ranking(ranking: &StrategyRanking, bundle: &CatalogBundle) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Strategy"),
        header_cell("Title"),
        header_cell("Group"),
        header_cell("Closeness"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for entry in &ranking.ranked {
        let strategy = bundle.strategies.get(&entry.strategy_id);
        let rank_cell = if entry.rank == 1 {
            Cell::new(entry.rank)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(entry.rank)
        };
        table.add_row(vec![
            rank_cell,
            Cell::new(&entry.strategy_id).add_attribute(Attribute::Bold),
            Cell::new(strategy.map_or("", |s| s.title.as_str())),
            optional_cell(strategy.and_then(|s| s.group.as_deref())),
            Cell::new(format!("{:.4}", entry.closeness)),
        ]);
    }
    println!();
    println!("Strategy ranking:");
    println!("{table}");
}

fn print_recommendations(recommendations: &[Recommendation]) {
    for recommendation in recommendations {
        println!();
        println!(
            "#{} {}: {} (closeness {:.4})",
            recommendation.rank,
            recommendation.strategy_id,
            recommendation.title,
            recommendation.closeness
        );
        if !recommendation.description.is_empty() {
            println!("  {}", recommendation.description);
        }
        for step in &recommendation.implementation {
            println!("  - {step}");
        }
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Feature"),
            header_cell("Strategy weight"),
            header_cell("Importance"),
            header_cell("Combined"),
        ]);
        apply_table_style(&mut table);
        for column in 1..4 {
            align_column(&mut table, column, CellAlignment::Right);
        }
        for part in &recommendation.breakdown {
            table.add_row(vec![
                Cell::new(&part.feature),
                Cell::new(format!("{:.3}", part.strategy_weight)),
                Cell::new(format!("{:.4}", part.importance)),
                Cell::new(format!("{:.4}", part.combined)),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_exports(paths: &ExportPaths) {
    for path in paths.written() {
        println!("Wrote {}", path.display());
    }
}

pub fn print_features(registry: &FeatureRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Feature"),
        header_cell("Polarity"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for (category, features) in registry.by_category() {
        for feature in features {
            table.add_row(vec![
                Cell::new(&category).add_attribute(Attribute::Bold),
                Cell::new(&feature.name),
                polarity_cell(&feature.polarity),
                Cell::new(&feature.description),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_strategies(catalog: &StrategyCatalog, group: Option<&str>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Strategy"),
        header_cell("Title"),
        header_cell("Group"),
        header_cell("Features"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    let selected = catalog.iter().filter(|strategy| {
        group.is_none_or(|wanted| {
            strategy
                .group
                .as_deref()
                .is_some_and(|g| g.eq_ignore_ascii_case(wanted))
        })
    });
    for strategy in selected {
        table.add_row(vec![
            Cell::new(&strategy.id).add_attribute(Attribute::Bold),
            Cell::new(&strategy.title),
            optional_cell(strategy.group.as_deref()),
            Cell::new(strategy.features.len()),
        ]);
    }
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn tier_cell(kind: &MatchKind) -> Cell {
    let color = match kind {
        MatchKind::Exact => Color::Green,
        MatchKind::Synonym { .. } => Color::Cyan,
        MatchKind::Fuzzy { .. } => Color::Yellow,
        MatchKind::Derived { .. } => Color::Magenta,
    };
    Cell::new(kind.to_string()).fg(color)
}

fn polarity_cell(polarity: &Polarity) -> Cell {
    match polarity {
        Polarity::Benefit => Cell::new("Benefit").fg(Color::Green),
        Polarity::Cost => Cell::new("Cost").fg(Color::Red),
        Polarity::Unrecognized(raw) => Cell::new(raw).fg(Color::Yellow),
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
