use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EntityId, ModelError};

/// Kind of reference entity held by the catalog.
///
/// Makes, models and OS versions carry a foreign key to their parent kind;
/// types and operating systems are the heads of their hierarchies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    AssetType,
    AssetMake,
    AssetModel,
    OperatingSystem,
    OsVersion,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::AssetType,
        EntityKind::AssetMake,
        EntityKind::AssetModel,
        EntityKind::OperatingSystem,
        EntityKind::OsVersion,
    ];

    /// Returns the snake_case name used in snapshots and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::AssetType => "asset_type",
            EntityKind::AssetMake => "asset_make",
            EntityKind::AssetModel => "asset_model",
            EntityKind::OperatingSystem => "operating_system",
            EntityKind::OsVersion => "os_version",
        }
    }

    /// Returns the kind this kind's parent key points at.
    pub fn parent_kind(&self) -> Option<EntityKind> {
        match self {
            EntityKind::AssetMake => Some(EntityKind::AssetType),
            EntityKind::AssetModel => Some(EntityKind::AssetMake),
            EntityKind::OsVersion => Some(EntityKind::OperatingSystem),
            EntityKind::AssetType | EntityKind::OperatingSystem => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    /// Accepts snake_case, spaced or hyphenated names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "asset_type" | "type" => Ok(EntityKind::AssetType),
            "asset_make" | "make" => Ok(EntityKind::AssetMake),
            "asset_model" | "model" => Ok(EntityKind::AssetModel),
            "operating_system" | "os" => Ok(EntityKind::OperatingSystem),
            "os_version" | "operating_system_version" => Ok(EntityKind::OsVersion),
            _ => Err(ModelError::UnknownEntityKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetType {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMake {
    pub id: EntityId,
    pub type_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetModel {
    pub id: EntityId,
    pub make_id: EntityId,
    pub name: String,
    /// Free-form specification fields (cpu, ram, storage, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsVersion {
    pub id: EntityId,
    pub os_id: EntityId,
    pub name: String,
}

/// Borrowed view over any catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    AssetType(&'a AssetType),
    AssetMake(&'a AssetMake),
    AssetModel(&'a AssetModel),
    OperatingSystem(&'a OperatingSystem),
    OsVersion(&'a OsVersion),
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::AssetType(_) => EntityKind::AssetType,
            EntityRef::AssetMake(_) => EntityKind::AssetMake,
            EntityRef::AssetModel(_) => EntityKind::AssetModel,
            EntityRef::OperatingSystem(_) => EntityKind::OperatingSystem,
            EntityRef::OsVersion(_) => EntityKind::OsVersion,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            EntityRef::AssetType(entity) => entity.id,
            EntityRef::AssetMake(entity) => entity.id,
            EntityRef::AssetModel(entity) => entity.id,
            EntityRef::OperatingSystem(entity) => entity.id,
            EntityRef::OsVersion(entity) => entity.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            EntityRef::AssetType(entity) => &entity.name,
            EntityRef::AssetMake(entity) => &entity.name,
            EntityRef::AssetModel(entity) => &entity.name,
            EntityRef::OperatingSystem(entity) => &entity.name,
            EntityRef::OsVersion(entity) => &entity.name,
        }
    }

    /// The foreign key this entity declares toward its parent kind.
    pub fn parent_id(&self) -> Option<EntityId> {
        match self {
            EntityRef::AssetMake(entity) => Some(entity.type_id),
            EntityRef::AssetModel(entity) => Some(entity.make_id),
            EntityRef::OsVersion(entity) => Some(entity.os_id),
            EntityRef::AssetType(_) | EntityRef::OperatingSystem(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_loose_spellings() {
        assert_eq!("Asset Make".parse::<EntityKind>().unwrap(), EntityKind::AssetMake);
        assert_eq!("os-version".parse::<EntityKind>().unwrap(), EntityKind::OsVersion);
        assert_eq!("MODEL".parse::<EntityKind>().unwrap(), EntityKind::AssetModel);
        assert!("vendor".parse::<EntityKind>().is_err());
    }

    #[test]
    fn parent_kinds_follow_the_hierarchy() {
        assert_eq!(EntityKind::AssetModel.parent_kind(), Some(EntityKind::AssetMake));
        assert_eq!(EntityKind::AssetMake.parent_kind(), Some(EntityKind::AssetType));
        assert_eq!(EntityKind::OsVersion.parent_kind(), Some(EntityKind::OperatingSystem));
        assert_eq!(EntityKind::AssetType.parent_kind(), None);
    }

    #[test]
    fn entity_ref_exposes_parent_key() {
        let version = OsVersion {
            id: EntityId::new(7),
            os_id: EntityId::new(2),
            name: "22.04".to_string(),
        };
        let entity = EntityRef::OsVersion(&version);
        assert_eq!(entity.kind(), EntityKind::OsVersion);
        assert_eq!(entity.parent_id(), Some(EntityId::new(2)));
        assert_eq!(entity.name(), "22.04");
    }
}
