use std::collections::BTreeMap;

use polars::prelude::*;

use resto_ingest::numeric_column_f64;
use resto_map::{MapperOptions, SchemaMapper};
use resto_model::{FeatureMetadata, FeatureRegistry, MatchKind, Polarity, SynonymTable};

fn synonyms() -> SynonymTable {
    let mut table = BTreeMap::new();
    table.insert(
        "groupsize".to_string(),
        vec!["pax".to_string(), "partysize".to_string()],
    );
    table.insert(
        "averagespend".to_string(),
        vec!["avgspend".to_string(), "spending".to_string()],
    );
    SynonymTable::new(table)
}

fn required(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn customers() -> DataFrame {
    DataFrame::new(vec![
        Series::new("customer_age".into(), vec![25i64, 41]).into_column(),
        Series::new("Income".into(), vec![50000.0, 75000.0]).into_column(),
        Series::new("Wait Time".into(), vec![12.0, 30.0]).into_column(),
        Series::new("pax".into(), vec![2i64, 5]).into_column(),
        Series::new("TotalSpend".into(), vec![50000.0, 75000.0]).into_column(),
        Series::new("GroupSize".into(), vec![2i64, 5]).into_column(),
        Series::new("ServiceRating".into(), vec![4.0, 3.0]).into_column(),
        Series::new("FoodRating".into(), vec![5.0, 3.0]).into_column(),
    ])
    .expect("frame")
}

#[test]
fn minimal_valid_dataset() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let df = DataFrame::new(vec![
        Series::new("Age".into(), vec![30i64]).into_column(),
        Series::new("Income".into(), vec![1000.0]).into_column(),
        Series::new("WaitTime".into(), vec![10.0]).into_column(),
        Series::new("ServiceRating".into(), vec![4.0]).into_column(),
        Series::new("FoodRating".into(), vec![5.0]).into_column(),
    ])
    .expect("frame");
    let report = mapper
        .map(
            &df,
            &required(&["Age", "Income", "WaitTime", "ServiceRating", "FoodRating"]),
        )
        .expect("map");
    assert!(report.is_valid);
    assert_eq!(report.matched_count(), 5);
    assert!(report.missing.is_empty());
    assert!(report.message.contains("5/5"));
}

#[test]
fn insufficient_dataset_is_reported_not_raised() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let df = DataFrame::new(vec![
        Series::new("Age".into(), vec![30i64]).into_column(),
        Series::new("Colour".into(), vec!["red"]).into_column(),
    ])
    .expect("frame");
    let report = mapper
        .map(&df, &required(&["Age", "Income", "WaitTime", "LoyalCustomer", "Gender"]))
        .expect("map");
    assert!(!report.is_valid);
    assert_eq!(report.matched_count(), 1);
    assert!(report.message.contains("1/5"));
    assert!(report.message.contains("at least 5"));
    assert_eq!(report.missing.len(), 4);
}

#[test]
fn mapping_is_idempotent_and_leaves_input_untouched() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let df = customers();
    let features = required(&["Age", "Income", "WaitTime", "GroupSize", "SpendPerPerson"]);

    let first = mapper.map(&df, &features).expect("first");
    let second = mapper.map(&df, &features).expect("second");
    assert_eq!(first.mapping, second.mapping);
    assert_eq!(first.missing, second.missing);
    assert_eq!(df.width(), 8);
    assert!(first.frame.width() > df.width());
}

#[test]
fn exact_match_wins_over_synonym_column() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper
        .map(&customers(), &required(&["GroupSize"]))
        .expect("map");
    let entry = report.mapping.get("GroupSize").expect("mapped");
    assert_eq!(entry.column, "GroupSize");
    assert_eq!(entry.kind, MatchKind::Exact);
}

#[test]
fn spend_per_person_is_derived_from_raw_columns() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper
        .map(&customers(), &required(&["SpendPerPerson", "AvgRating"]))
        .expect("map");

    let entry = report.mapping.get("SpendPerPerson").expect("derived");
    assert_eq!(
        entry.kind,
        MatchKind::Derived {
            inputs: vec!["TotalSpend".to_string(), "GroupSize".to_string()]
        }
    );
    assert_eq!(
        numeric_column_f64(&report.frame, "SpendPerPerson").expect("column"),
        vec![Some(25000.0), Some(15000.0)]
    );
    assert_eq!(
        numeric_column_f64(&report.frame, "AvgRating").expect("column"),
        vec![Some(4.5), Some(3.0)]
    );
    assert!(report.missing.is_empty());
}

#[test]
fn spend_per_person_falls_back_to_average_spend() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let df = DataFrame::new(vec![
        Series::new("AverageSpend".into(), vec![50000.0, 75000.0]).into_column(),
        Series::new("GroupSize".into(), vec![2i64, 5]).into_column(),
    ])
    .expect("frame");
    let report = mapper
        .map(&df, &required(&["AverageSpend", "SpendPerPerson"]))
        .expect("map");

    assert_eq!(report.matched_features, required(&["AverageSpend", "SpendPerPerson"]));
    assert_eq!(
        report.mapping.get("SpendPerPerson").map(|entry| &entry.kind),
        Some(&MatchKind::Derived {
            inputs: vec!["AverageSpend".to_string(), "GroupSize".to_string()]
        })
    );
    assert_eq!(
        numeric_column_f64(&report.frame, "SpendPerPerson").expect("column"),
        vec![Some(25000.0), Some(15000.0)]
    );
    assert!(df.column("SpendPerPerson").is_err());
}

#[test]
fn derived_columns_not_required_stay_out_of_mapping() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper.map(&customers(), &required(&["Income"])).expect("map");
    assert_eq!(report.mapping.len(), 1);
    assert!(report.frame.column("SpendPerPerson").is_ok());
}

#[test]
fn duplicate_required_features_count_once() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper
        .map(&customers(), &required(&["Income", "Income"]))
        .expect("map");
    assert_eq!(report.required.len(), 1);
    assert_eq!(report.matched_count(), 1);
}

#[test]
fn groups_matches_by_category() {
    let registry = FeatureRegistry::new(vec![
        FeatureMetadata {
            name: "Income".to_string(),
            category: "Demographics".to_string(),
            polarity: Polarity::Benefit,
            description: String::new(),
        },
        FeatureMetadata {
            name: "WaitTime".to_string(),
            category: "Service Quality".to_string(),
            polarity: Polarity::Cost,
            description: String::new(),
        },
    ]);
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper
        .map(&customers(), &required(&["WaitTime", "Income", "GroupSize"]))
        .expect("map");

    let groups = report.by_category(&registry);
    let names: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Demographics", "Service Quality", "Uncategorized"]);
}

#[test]
fn feature_frame_uses_feature_names() {
    let mapper = SchemaMapper::new(&synonyms(), MapperOptions::default());
    let report = mapper
        .map(&customers(), &required(&["WaitTime", "Income"]))
        .expect("map");
    let frame = report.feature_frame().expect("feature frame");
    let names: Vec<&str> = frame.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["WaitTime", "Income"]);
}
