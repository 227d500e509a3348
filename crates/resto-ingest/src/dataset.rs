//! Customer dataset loading.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Options for reading a dataset CSV.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Rows scanned for schema inference; `None` scans the whole file.
    pub infer_schema_rows: Option<usize>,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            infer_schema_rows: Some(1000),
            max_rows: None,
        }
    }
}

pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    read_dataset_with_options(path, &IngestOptions::default())
}

/// Reads a header-row CSV into a DataFrame.
///
/// Header names are trimmed and stripped of a leading byte-order mark; the
/// mapper sees them otherwise as written. A header whose cleaned form would
/// duplicate another column keeps its original spelling.
pub fn read_dataset_with_options(path: &Path, options: &IngestOptions) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_rows)
        .with_n_rows(options.max_rows)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read CSV: {}", path.display()))?;

    let names = cleaned_headers(&df, path);
    let changed = df
        .get_column_names()
        .iter()
        .zip(&names)
        .any(|(old, new)| old.as_str() != new);
    if changed {
        debug!(path = %path.display(), "normalized header whitespace");
        df.set_column_names(names.iter().map(String::as_str))
            .with_context(|| format!("Failed to rename columns: {}", path.display()))?;
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );
    Ok(df)
}

fn cleaned_headers(df: &DataFrame, path: &Path) -> Vec<String> {
    let original: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut names = original.clone();
    for (idx, raw) in original.iter().enumerate() {
        let cleaned = clean_header(raw);
        if cleaned == *raw {
            continue;
        }
        if names.contains(&cleaned) {
            warn!(
                path = %path.display(),
                column = %raw,
                "trimmed header would duplicate another column, kept as written"
            );
            continue;
        }
        names[idx] = cleaned;
    }
    names
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}
