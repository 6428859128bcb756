#![deny(unsafe_code)]

//! Catalog directories holding one CSV file per entity kind.

use std::collections::BTreeMap;
use std::path::Path;

use inventory_model::{
    AssetMake, AssetModel, AssetType, CatalogSnapshot, EntityId, OperatingSystem, OsVersion,
    ReferenceCatalog,
};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::loader::{LoadedCatalog, SourceFile};

pub const TYPES_FILE: &str = "types.csv";
pub const MAKES_FILE: &str = "makes.csv";
pub const MODELS_FILE: &str = "models.csv";
pub const OPERATING_SYSTEMS_FILE: &str = "operating_systems.csv";
pub const OS_VERSIONS_FILE: &str = "os_versions.csv";

const MODEL_COLUMNS: &[&str] = &["id", "make_id", "name"];

/// Loads every known CSV file under `dir`; a missing file is an empty list.
pub fn load_csv_dir(dir: &Path) -> Result<LoadedCatalog, CatalogError> {
    let mut sources = Vec::new();

    let types = read_rows(dir, TYPES_FILE, &mut sources, |row| {
        Ok(AssetType {
            id: row.id("id")?,
            name: row.text("name"),
        })
    })?;
    let makes = read_rows(dir, MAKES_FILE, &mut sources, |row| {
        Ok(AssetMake {
            id: row.id("id")?,
            type_id: row.id("type_id")?,
            name: row.text("name"),
        })
    })?;
    let models = read_rows(dir, MODELS_FILE, &mut sources, |row| {
        Ok(AssetModel {
            id: row.id("id")?,
            make_id: row.id("make_id")?,
            name: row.text("name"),
            specs: row.remaining(MODEL_COLUMNS),
        })
    })?;
    let operating_systems = read_rows(dir, OPERATING_SYSTEMS_FILE, &mut sources, |row| {
        Ok(OperatingSystem {
            id: row.id("id")?,
            name: row.text("name"),
        })
    })?;
    let os_versions = read_rows(dir, OS_VERSIONS_FILE, &mut sources, |row| {
        Ok(OsVersion {
            id: row.id("id")?,
            os_id: row.id("os_id")?,
            name: row.text("name"),
        })
    })?;

    debug!(dir = %dir.display(), files = sources.len(), "loaded CSV catalog");
    Ok(LoadedCatalog {
        catalog: ReferenceCatalog::new(CatalogSnapshot {
            types,
            makes,
            models,
            operating_systems,
            os_versions,
        }),
        sources,
    })
}

struct CsvRow<'a> {
    path: &'a Path,
    /// 1-based, excluding the header.
    record: usize,
    headers: &'a csv::StringRecord,
    values: &'a csv::StringRecord,
}

impl CsvRow<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn id(&self, name: &str) -> Result<EntityId, CatalogError> {
        let raw = self.get(name).ok_or_else(|| {
            CatalogError::csv(self.path, format!("record {}: missing {name}", self.record))
        })?;
        raw.parse().map_err(|_| {
            CatalogError::csv(
                self.path,
                format!("record {}: invalid {name} {raw:?}", self.record),
            )
        })
    }

    fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Non-empty cells of columns not listed in `known`.
    fn remaining(&self, known: &[&str]) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(header, value)| (header.trim(), value.trim()))
            .filter(|(header, value)| {
                !value.is_empty() && !known.iter().any(|k| header.eq_ignore_ascii_case(k))
            })
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect()
    }
}

fn read_rows<T>(
    dir: &Path,
    file: &str,
    sources: &mut Vec<SourceFile>,
    parse: impl Fn(&CsvRow<'_>) -> Result<T, CatalogError>,
) -> Result<Vec<T>, CatalogError> {
    let path = dir.join(file);
    if !path.is_file() {
        warn!(path = %path.display(), "catalog file missing, treating as empty");
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(&path).map_err(|e| CatalogError::io(&path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| CatalogError::csv(&path, e.to_string()))?
        .clone();

    let mut results = Vec::new();
    for (index, values) in reader.records().enumerate() {
        let values = values.map_err(|e| CatalogError::csv(&path, e.to_string()))?;
        let row = CsvRow {
            path: &path,
            record: index + 1,
            headers: &headers,
            values: &values,
        };
        results.push(parse(&row)?);
    }

    sources.push(SourceFile::from_bytes(&path, &bytes));
    Ok(results)
}
