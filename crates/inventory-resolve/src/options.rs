//! Filtered option lists for dependent fields.

use inventory_model::{EntityId, EntityRef, ReferenceCatalog, RoleName};

use crate::chain::Chain;
use crate::error::ChainError;
use crate::state::SelectionState;

/// Options of one role for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOptions<'c> {
    pub role: RoleName,
    pub selected: Option<EntityId>,
    pub options: Vec<EntityRef<'c>>,
}

impl RoleOptions<'_> {
    /// True when the field has nothing to choose from (render it disabled).
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// True when the selected id is among the offered options.
    pub fn selection_is_offered(&self) -> bool {
        self.selected
            .is_some_and(|selected| self.options.iter().any(|entity| entity.id() == selected))
    }
}

/// Catalog entries valid for `role` given the upstream selection.
///
/// The head role offers every entity of its kind; any other role offers the
/// entities whose parent key equals the parent role's value, or nothing when
/// that value is null. Catalog order is preserved.
pub fn options_for<'c>(
    chain: &Chain,
    state: &SelectionState,
    catalog: &'c ReferenceCatalog,
    role: &str,
) -> Result<Vec<EntityRef<'c>>, ChainError> {
    let position = chain.require_position(role)?;
    Ok(options_at(chain, state, catalog, position))
}

/// Options for every role, in chain order.
pub fn all_options<'c>(
    chain: &Chain,
    state: &SelectionState,
    catalog: &'c ReferenceCatalog,
) -> Vec<RoleOptions<'c>> {
    chain
        .roles()
        .iter()
        .enumerate()
        .map(|(position, spec)| RoleOptions {
            role: spec.name.clone(),
            selected: state.get(spec.name.as_str()),
            options: options_at(chain, state, catalog, position),
        })
        .collect()
}

fn options_at<'c>(
    chain: &Chain,
    state: &SelectionState,
    catalog: &'c ReferenceCatalog,
    position: usize,
) -> Vec<EntityRef<'c>> {
    let spec = &chain.roles()[position];
    let entries = catalog.entries(spec.kind);
    let Some(parent_role) = spec.parent.as_ref() else {
        return entries;
    };
    let Some(parent) = state.get(parent_role.as_str()) else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter(|entity| spec.parent_key_of(entity) == Some(parent))
        .collect()
}

#[cfg(test)]
mod tests {
    use inventory_model::CatalogSnapshot;

    use super::*;

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::new(
            CatalogSnapshot::default()
                .with_os(1, "Windows")
                .with_os(2, "Ubuntu")
                .with_os_version(10, 1, "10")
                .with_os_version(20, 2, "22.04")
                .with_os_version(11, 1, "11"),
        )
    }

    #[test]
    fn head_offers_everything() {
        let catalog = catalog();
        let options = options_for(
            &Chain::operating_system(),
            &SelectionState::new(),
            &catalog,
            "os",
        )
        .unwrap();
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn dependent_role_without_parent_offers_nothing() {
        let catalog = catalog();
        let options = options_for(
            &Chain::operating_system(),
            &SelectionState::new(),
            &catalog,
            "os_version",
        )
        .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn all_options_reports_selection() {
        let catalog = catalog();
        let state = SelectionState::new()
            .with(RoleName::new("os").unwrap(), EntityId::new(1))
            .with(RoleName::new("os_version").unwrap(), EntityId::new(11));
        let views = all_options(&Chain::operating_system(), &state, &catalog);

        assert_eq!(views.len(), 2);
        let versions: Vec<&str> = views[1].options.iter().map(|entity| entity.name()).collect();
        assert_eq!(versions, vec!["10", "11"]);
        assert!(views[1].selection_is_offered());
    }
}
