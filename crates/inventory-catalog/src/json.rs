#![deny(unsafe_code)]

use std::path::Path;

use inventory_model::ReferenceCatalog;
use tracing::debug;

use crate::error::CatalogError;
use crate::loader::{LoadedCatalog, SourceFile};

/// Reads a JSON snapshot with optional `types`, `makes`, `models`,
/// `operating_systems` and `os_versions` arrays.
pub fn load_json(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    let catalog: ReferenceCatalog =
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "loaded JSON catalog");
    Ok(LoadedCatalog {
        catalog,
        sources: vec![SourceFile::from_bytes(path, &bytes)],
    })
}
