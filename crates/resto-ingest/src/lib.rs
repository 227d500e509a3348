pub mod dataset;
pub mod polars_utils;

pub use dataset::{IngestOptions, read_dataset, read_dataset_with_options};
pub use polars_utils::{any_to_f64, has_column, numeric_column_f64, parse_f64, set_f64_column};
