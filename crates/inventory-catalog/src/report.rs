#![deny(unsafe_code)]

use std::collections::BTreeMap;

use inventory_model::{EntityId, EntityKind, ReferenceCatalog};
use tracing::warn;

use crate::loader::SourceFile;

pub const REPORT_SCHEMA: &str = "asset-inventory.catalog-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Referential-integrity findings for a catalog.
///
/// The resolver tolerates all of these (dangling ids simply never match);
/// the report exists so data problems can be fixed at the source.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogReport {
    pub schema: String,
    pub schema_version: u32,
    pub counts: CatalogCounts,
    pub sources: Vec<SourceFile>,
    pub issues: Vec<CatalogIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogCounts {
    pub asset_types: usize,
    pub asset_makes: usize,
    pub asset_models: usize,
    pub operating_systems: usize,
    pub os_versions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum CatalogIssue {
    /// The entity's parent key does not resolve.
    DanglingParent {
        kind: EntityKind,
        id: EntityId,
        parent_kind: EntityKind,
        parent_id: EntityId,
    },
    /// Several entities of one kind share an id; lookups use the first.
    DuplicateId {
        kind: EntityKind,
        id: EntityId,
        occurrences: usize,
    },
}

impl CatalogIssue {
    fn sort_key(&self) -> (EntityKind, EntityId, u8) {
        match self {
            CatalogIssue::DuplicateId { kind, id, .. } => (*kind, *id, 0),
            CatalogIssue::DanglingParent { kind, id, .. } => (*kind, *id, 1),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogIssue::DanglingParent {
                kind,
                id,
                parent_kind,
                parent_id,
            } => format!("{kind} {id} references missing {parent_kind} {parent_id}"),
            CatalogIssue::DuplicateId {
                kind,
                id,
                occurrences,
            } => format!("{kind} {id} appears {occurrences} times"),
        }
    }
}

impl CatalogReport {
    pub fn build(catalog: &ReferenceCatalog, sources: Vec<SourceFile>) -> Self {
        let mut issues = Vec::new();
        for kind in EntityKind::ALL {
            let entries = catalog.entries(kind);

            let mut occurrences: BTreeMap<EntityId, usize> = BTreeMap::new();
            for entity in &entries {
                *occurrences.entry(entity.id()).or_insert(0) += 1;
            }
            issues.extend(
                occurrences
                    .into_iter()
                    .filter(|(_, count)| *count > 1)
                    .map(|(id, occurrences)| CatalogIssue::DuplicateId {
                        kind,
                        id,
                        occurrences,
                    }),
            );

            let Some(parent_kind) = kind.parent_kind() else {
                continue;
            };
            for entity in &entries {
                let Some(parent_id) = entity.parent_id() else {
                    continue;
                };
                if !catalog.contains(parent_kind, parent_id) {
                    issues.push(CatalogIssue::DanglingParent {
                        kind,
                        id: entity.id(),
                        parent_kind,
                        parent_id,
                    });
                }
            }
        }
        issues.sort_by_key(CatalogIssue::sort_key);

        if !issues.is_empty() {
            warn!(issues = issues.len(), "reference catalog has integrity issues");
        }

        Self {
            schema: REPORT_SCHEMA.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            counts: CatalogCounts {
                asset_types: catalog.len(EntityKind::AssetType),
                asset_makes: catalog.len(EntityKind::AssetMake),
                asset_models: catalog.len(EntityKind::AssetModel),
                operating_systems: catalog.len(EntityKind::OperatingSystem),
                os_versions: catalog.len(EntityKind::OsVersion),
            },
            sources,
            issues,
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn dangling_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, CatalogIssue::DanglingParent { .. }))
            .count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, CatalogIssue::DuplicateId { .. }))
            .count()
    }
}
