#![deny(unsafe_code)]

pub mod csv_dir;
pub mod error;
pub mod hash;
pub mod json;
pub mod loader;
pub mod report;

pub use crate::error::CatalogError;
pub use crate::loader::{LoadedCatalog, SourceFile, load_catalog};
pub use crate::report::{CatalogCounts, CatalogIssue, CatalogReport};
