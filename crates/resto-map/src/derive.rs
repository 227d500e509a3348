//! Features computed from other dataset columns.
//!
//! Inputs are looked up by their exact dataset column names. A derived
//! column is only written when the dataset has no column of that name.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use resto_ingest::{has_column, numeric_column_f64, set_f64_column};

pub const SPEND_PER_PERSON: &str = "SpendPerPerson";
pub const SPEND_TO_INCOME_RATIO: &str = "SpendToIncomeRatio";
pub const AVG_RATING: &str = "AvgRating";
pub const TOTAL_RATING: &str = "TotalRating";
pub const RATING_STD: &str = "RatingStd";
pub const MAX_RATING: &str = "MaxRating";
pub const MIN_RATING: &str = "MinRating";
pub const RATING_RANGE: &str = "RatingRange";

const RATING_COLUMNS: [&str; 3] = ["ServiceRating", "FoodRating", "AmbianceRating"];

/// A column added to the working frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedColumn {
    pub name: String,
    pub inputs: Vec<String>,
}

/// Adds every derived feature whose inputs are present and returns them in
/// the order written.
pub fn add_derived_features(df: &mut DataFrame) -> Result<Vec<DerivedColumn>> {
    let mut written = Vec::new();

    let spend_source = ["TotalSpend", "AverageSpend"]
        .into_iter()
        .find(|name| has_column(df, name));
    if let Some(spend) = spend_source.filter(|_| has_column(df, "GroupSize")) {
        let values = divide_columns(df, spend, "GroupSize")?;
        write_column(df, SPEND_PER_PERSON, values, &[spend, "GroupSize"], &mut written)?;
    }

    if has_column(df, "AverageSpend") && has_column(df, "Income") {
        let values = divide_columns(df, "AverageSpend", "Income")?;
        write_column(
            df,
            SPEND_TO_INCOME_RATIO,
            values,
            &["AverageSpend", "Income"],
            &mut written,
        )?;
    }

    let ratings: Vec<&str> = RATING_COLUMNS
        .into_iter()
        .filter(|name| has_column(df, name))
        .collect();
    if ratings.len() >= 2 {
        let aggregates = rating_aggregates(df, &ratings)?;
        for (name, values) in aggregates {
            write_column(df, name, values, &ratings, &mut written)?;
        }
    }

    Ok(written)
}

fn write_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<f64>>,
    inputs: &[&str],
    written: &mut Vec<DerivedColumn>,
) -> Result<()> {
    if has_column(df, name) {
        debug!(column = name, "dataset already provides column, not derived");
        return Ok(());
    }
    set_f64_column(df, name, values)?;
    debug!(column = name, inputs = ?inputs, "derived column");
    written.push(DerivedColumn {
        name: name.to_string(),
        inputs: inputs.iter().map(|input| (*input).to_string()).collect(),
    });
    Ok(())
}

/// Row-wise `numerator / denominator` with a zero denominator treated as 1.
fn divide_columns(df: &DataFrame, numerator: &str, denominator: &str) -> Result<Vec<Option<f64>>> {
    let top = numeric_column_f64(df, numerator)?;
    let bottom = numeric_column_f64(df, denominator)?;
    Ok(top
        .into_iter()
        .zip(bottom)
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) => Some(n / if d == 0.0 { 1.0 } else { d }),
            _ => None,
        })
        .collect())
}

fn rating_aggregates(
    df: &DataFrame,
    columns: &[&str],
) -> Result<Vec<(&'static str, Vec<Option<f64>>)>> {
    let series = columns
        .iter()
        .map(|name| numeric_column_f64(df, name))
        .collect::<Result<Vec<_>>>()?;

    let height = df.height();
    let mut avg = Vec::with_capacity(height);
    let mut total = Vec::with_capacity(height);
    let mut std = Vec::with_capacity(height);
    let mut max = Vec::with_capacity(height);
    let mut min = Vec::with_capacity(height);
    let mut range = Vec::with_capacity(height);

    for row in 0..height {
        let present: Vec<f64> = series.iter().filter_map(|values| values[row]).collect();
        let stats = RowStats::from_values(&present);
        avg.push(stats.map(|s| s.mean));
        total.push(stats.map(|s| s.sum));
        std.push(stats.and_then(|s| s.sample_std));
        max.push(stats.map(|s| s.max));
        min.push(stats.map(|s| s.min));
        range.push(stats.map(|s| s.max - s.min));
    }

    Ok(vec![
        (AVG_RATING, avg),
        (TOTAL_RATING, total),
        (RATING_STD, std),
        (MAX_RATING, max),
        (MIN_RATING, min),
        (RATING_RANGE, range),
    ])
}

#[derive(Debug, Clone, Copy)]
struct RowStats {
    sum: f64,
    mean: f64,
    max: f64,
    min: f64,
    sample_std: Option<f64>,
}

impl RowStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let sample_std = (values.len() >= 2).then(|| {
            let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (n - 1.0)).sqrt()
        });
        Some(Self {
            sum,
            mean,
            max,
            min,
            sample_std,
        })
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn spend_per_person_prefers_total_spend() {
        let mut df = frame(vec![
            Series::new("TotalSpend".into(), vec![50000.0, 75000.0]).into_column(),
            Series::new("AverageSpend".into(), vec![1.0, 1.0]).into_column(),
            Series::new("GroupSize".into(), vec![2.0, 5.0]).into_column(),
        ]);
        let written = add_derived_features(&mut df).unwrap();
        assert_eq!(written[0].inputs, vec!["TotalSpend", "GroupSize"]);
        assert_eq!(
            numeric_column_f64(&df, SPEND_PER_PERSON).unwrap(),
            vec![Some(25000.0), Some(15000.0)]
        );
    }

    #[test]
    fn zero_denominators_are_treated_as_one() {
        let mut df = frame(vec![
            Series::new("AverageSpend".into(), vec![300.0, 400.0]).into_column(),
            Series::new("GroupSize".into(), vec![0.0, 2.0]).into_column(),
            Series::new("Income".into(), vec![0.0, 800.0]).into_column(),
        ]);
        add_derived_features(&mut df).unwrap();
        assert_eq!(
            numeric_column_f64(&df, SPEND_PER_PERSON).unwrap(),
            vec![Some(300.0), Some(200.0)]
        );
        assert_eq!(
            numeric_column_f64(&df, SPEND_TO_INCOME_RATIO).unwrap(),
            vec![Some(300.0), Some(0.5)]
        );
    }

    #[test]
    fn rating_aggregates_need_two_columns() {
        let mut df = frame(vec![
            Series::new("ServiceRating".into(), vec![4.0]).into_column(),
        ]);
        let written = add_derived_features(&mut df).unwrap();
        assert!(written.is_empty());
        assert!(!has_column(&df, AVG_RATING));
    }

    #[test]
    fn rating_aggregates_use_sample_std() {
        let mut df = frame(vec![
            Series::new("ServiceRating".into(), vec![Some(2.0), Some(5.0)]).into_column(),
            Series::new("FoodRating".into(), vec![Some(4.0), None]).into_column(),
            Series::new("AmbianceRating".into(), vec![Some(3.0), None]).into_column(),
        ]);
        add_derived_features(&mut df).unwrap();

        assert_eq!(
            numeric_column_f64(&df, AVG_RATING).unwrap(),
            vec![Some(3.0), Some(5.0)]
        );
        assert_eq!(
            numeric_column_f64(&df, TOTAL_RATING).unwrap(),
            vec![Some(9.0), Some(5.0)]
        );
        assert_eq!(
            numeric_column_f64(&df, RATING_STD).unwrap(),
            vec![Some(1.0), None]
        );
        assert_eq!(
            numeric_column_f64(&df, RATING_RANGE).unwrap(),
            vec![Some(2.0), Some(0.0)]
        );
    }

    #[test]
    fn existing_column_is_not_overwritten() {
        let mut df = frame(vec![
            Series::new("ServiceRating".into(), vec![4.0]).into_column(),
            Series::new("FoodRating".into(), vec![2.0]).into_column(),
            Series::new("TotalRating".into(), vec![10.0]).into_column(),
        ]);
        let written = add_derived_features(&mut df).unwrap();
        assert!(written.iter().all(|col| col.name != TOTAL_RATING));
        assert_eq!(
            numeric_column_f64(&df, TOTAL_RATING).unwrap(),
            vec![Some(10.0)]
        );
    }
}
