//! Option lists for one role, as printed by `inventory options`.

use inventory_model::{EntityId, EntityKind, ReferenceCatalog, RoleName};
use inventory_resolve::{Chain, ChainError, SelectionState, options_for};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsListing {
    pub chain: String,
    pub role: RoleName,
    pub kind: EntityKind,
    /// Parent role and its current value; `None` for the head role.
    pub parent: Option<ParentValue>,
    pub selected: Option<EntityId>,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentValue {
    pub role: RoleName,
    pub value: Option<EntityId>,
}

impl OptionsListing {
    pub fn build(
        chain: &Chain,
        state: &SelectionState,
        catalog: &ReferenceCatalog,
        role: &str,
    ) -> Result<Self, ChainError> {
        let options = options_for(chain, state, catalog, role)?
            .into_iter()
            .map(|entity| OptionEntry {
                id: entity.id(),
                name: entity.name().to_string(),
            })
            .collect();
        let spec = chain.role(role).ok_or_else(|| ChainError::UnknownRole {
            chain: chain.name().to_string(),
            role: role.to_string(),
        })?;
        let parent = spec.parent.as_ref().map(|parent| ParentValue {
            role: parent.clone(),
            value: state.get(parent.as_str()),
        });
        Ok(Self {
            chain: chain.name().to_string(),
            role: spec.name.clone(),
            kind: spec.kind,
            parent,
            selected: state.get(spec.name.as_str()),
            options,
        })
    }

    /// True when the field would render disabled.
    pub fn is_disabled(&self) -> bool {
        self.options.is_empty()
    }
}
