#![deny(unsafe_code)]

pub mod columns;
pub mod derive;
pub mod engine;
pub mod report;
pub mod utils;

pub use columns::ColumnIndex;
pub use derive::{DerivedColumn, add_derived_features};
pub use engine::{MapperOptions, SchemaMapper};
pub use report::MappingReport;
pub use utils::{normalize_name, token_sort_ratio};
