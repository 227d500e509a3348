#![deny(unsafe_code)]

pub mod bundle;
pub mod error;
pub mod hash;
pub mod loaders;
pub mod paths;

pub use crate::bundle::CatalogBundle;
pub use crate::error::CatalogError;
pub use crate::paths::catalog_root;
