#![deny(unsafe_code)]

use std::path::Path;

use inventory_model::ReferenceCatalog;

use crate::error::CatalogError;
use crate::hash::sha256_hex;

/// One input file that contributed to a catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SourceFile {
    /// File name relative to the catalog location.
    pub path: String,
    pub sha256: String,
}

impl SourceFile {
    pub(crate) fn from_bytes(path: &Path, bytes: &[u8]) -> Self {
        let path = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            sha256: sha256_hex(bytes),
        }
    }
}

/// A catalog together with the files it was read from.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: ReferenceCatalog,
    pub sources: Vec<SourceFile>,
}

/// Loads a catalog from a CSV directory or a JSON snapshot file.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    if path.is_dir() {
        crate::csv_dir::load_csv_dir(path)
    } else {
        crate::json::load_json(path)
    }
}
