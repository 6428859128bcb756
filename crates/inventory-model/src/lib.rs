#![deny(unsafe_code)]

pub mod catalog;
pub mod entity;
pub mod error;
pub mod ids;

pub use catalog::{CatalogSnapshot, ReferenceCatalog};
pub use entity::{AssetMake, AssetModel, AssetType, EntityKind, EntityRef, OperatingSystem, OsVersion};
pub use error::{ModelError, Result};
pub use ids::{EntityId, RoleName};
