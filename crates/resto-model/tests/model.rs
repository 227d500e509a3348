use std::collections::BTreeMap;

use resto_model::{
    ClassifierArtifact, FeatureImportance, FeatureMapping, FeatureMatch, MatchKind, Polarity,
    Strategy, StrategyCatalog,
};

fn exact(feature: &str, column: &str) -> FeatureMatch {
    FeatureMatch {
        feature: feature.to_string(),
        column: column.to_string(),
        kind: MatchKind::Exact,
    }
}

#[test]
fn mapping_keeps_first_match_per_feature() {
    let mut mapping = FeatureMapping::new();
    assert!(mapping.insert(exact("WaitTime", "wait_time")));
    assert!(!mapping.insert(FeatureMatch {
        feature: "WaitTime".to_string(),
        column: "queue".to_string(),
        kind: MatchKind::Fuzzy { score: 80.0 },
    }));
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.column_for("WaitTime"), Some("wait_time"));
}

#[test]
fn mapping_serializes_with_tier_tag() {
    let mut mapping = FeatureMapping::new();
    mapping.insert(exact("Age", "age"));
    mapping.insert(FeatureMatch {
        feature: "SpendPerPerson".to_string(),
        column: "SpendPerPerson".to_string(),
        kind: MatchKind::Derived {
            inputs: vec!["AverageSpend".to_string(), "GroupSize".to_string()],
        },
    });
    let json = serde_json::to_value(&mapping).expect("serialize mapping");
    assert_eq!(json[0]["kind"]["tier"], "exact");
    assert_eq!(json[1]["kind"]["tier"], "derived");
    assert_eq!(json[1]["kind"]["inputs"][1], "GroupSize");
}

#[test]
fn polarity_round_trips_through_strings() {
    let parsed: Polarity = serde_json::from_str("\"cost\"").expect("parse polarity");
    assert_eq!(parsed, Polarity::Cost);
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Cost\"");
}

#[test]
fn artifact_deserialization_validates_lengths() {
    let ok: ClassifierArtifact =
        serde_json::from_str(r#"{"features":["Age","WaitTime"],"importances":[0.3,0.7]}"#)
            .expect("valid artifact");
    assert_eq!(ok.importance("WaitTime"), Some(0.7));
    assert_eq!(ok.importance("Income"), None);

    let bad = serde_json::from_str::<ClassifierArtifact>(
        r#"{"features":["Age","WaitTime"],"importances":[0.3]}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn plain_maps_act_as_importance_sources() {
    let mut weights = BTreeMap::new();
    weights.insert("Age".to_string(), 0.4);
    let source: &dyn FeatureImportance = &weights;
    assert_eq!(source.importance("Age"), Some(0.4));
    assert_eq!(source.importance("Income"), None);
}

#[test]
fn catalog_lookup_and_label() {
    let catalog = StrategyCatalog::new(vec![Strategy {
        id: "E1".to_string(),
        title: "Digital Queue Management".to_string(),
        group: Some("Service Experience".to_string()),
        description: String::new(),
        implementation: Vec::new(),
        features: BTreeMap::from([("WaitTime".to_string(), 0.3)]),
    }]);
    let strategy = catalog.get("E1").expect("strategy E1");
    assert_eq!(strategy.label(), "E1: Digital Queue Management");
    assert!(catalog.get("Z9").is_none());
}
