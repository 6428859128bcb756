use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    AssetMake, AssetModel, AssetType, EntityId, EntityKind, EntityRef, OperatingSystem, OsVersion,
};

/// Plain reference lists as delivered by the backend.
///
/// Every list is optional so a catalog that is still loading can be
/// represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub types: Vec<AssetType>,
    #[serde(default)]
    pub makes: Vec<AssetMake>,
    #[serde(default)]
    pub models: Vec<AssetModel>,
    #[serde(default)]
    pub operating_systems: Vec<OperatingSystem>,
    #[serde(default)]
    pub os_versions: Vec<OsVersion>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn with_type(mut self, id: u64, name: &str) -> Self {
        self.types.push(AssetType {
            id: EntityId::new(id),
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_make(mut self, id: u64, type_id: u64, name: &str) -> Self {
        self.makes.push(AssetMake {
            id: EntityId::new(id),
            type_id: EntityId::new(type_id),
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_model(mut self, id: u64, make_id: u64, name: &str) -> Self {
        self.models.push(AssetModel {
            id: EntityId::new(id),
            make_id: EntityId::new(make_id),
            name: name.to_string(),
            specs: BTreeMap::new(),
        });
        self
    }

    #[must_use]
    pub fn with_os(mut self, id: u64, name: &str) -> Self {
        self.operating_systems.push(OperatingSystem {
            id: EntityId::new(id),
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_os_version(mut self, id: u64, os_id: u64, name: &str) -> Self {
        self.os_versions.push(OsVersion {
            id: EntityId::new(id),
            os_id: EntityId::new(os_id),
            name: name.to_string(),
        });
        self
    }

    fn entries(&self, kind: EntityKind) -> Vec<EntityRef<'_>> {
        match kind {
            EntityKind::AssetType => self.types.iter().map(EntityRef::AssetType).collect(),
            EntityKind::AssetMake => self.makes.iter().map(EntityRef::AssetMake).collect(),
            EntityKind::AssetModel => self.models.iter().map(EntityRef::AssetModel).collect(),
            EntityKind::OperatingSystem => self
                .operating_systems
                .iter()
                .map(EntityRef::OperatingSystem)
                .collect(),
            EntityKind::OsVersion => self.os_versions.iter().map(EntityRef::OsVersion).collect(),
        }
    }
}

/// Read-only snapshot of reference entities with per-kind id lookup.
///
/// Catalog order is preserved. When an id occurs more than once within a
/// kind, lookups resolve to the first occurrence. Referential integrity is
/// not checked here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CatalogSnapshot", into = "CatalogSnapshot")]
pub struct ReferenceCatalog {
    snapshot: CatalogSnapshot,
    index: BTreeMap<(EntityKind, EntityId), usize>,
}

impl ReferenceCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let mut index = BTreeMap::new();
        for kind in EntityKind::ALL {
            for (position, entity) in snapshot.entries(kind).iter().enumerate() {
                index.entry((kind, entity.id())).or_insert(position);
            }
        }
        Self { snapshot, index }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// All entities of `kind` in catalog order.
    pub fn entries(&self, kind: EntityKind) -> Vec<EntityRef<'_>> {
        self.snapshot.entries(kind)
    }

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<EntityRef<'_>> {
        let position = *self.index.get(&(kind, id))?;
        let entity = match kind {
            EntityKind::AssetType => EntityRef::AssetType(self.snapshot.types.get(position)?),
            EntityKind::AssetMake => EntityRef::AssetMake(self.snapshot.makes.get(position)?),
            EntityKind::AssetModel => EntityRef::AssetModel(self.snapshot.models.get(position)?),
            EntityKind::OperatingSystem => {
                EntityRef::OperatingSystem(self.snapshot.operating_systems.get(position)?)
            }
            EntityKind::OsVersion => EntityRef::OsVersion(self.snapshot.os_versions.get(position)?),
        };
        Some(entity)
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.index.contains_key(&(kind, id))
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::AssetType => self.snapshot.types.len(),
            EntityKind::AssetMake => self.snapshot.makes.len(),
            EntityKind::AssetModel => self.snapshot.models.len(),
            EntityKind::OperatingSystem => self.snapshot.operating_systems.len(),
            EntityKind::OsVersion => self.snapshot.os_versions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }
}

impl From<CatalogSnapshot> for ReferenceCatalog {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl From<ReferenceCatalog> for CatalogSnapshot {
    fn from(catalog: ReferenceCatalog) -> Self {
        catalog.snapshot
    }
}
