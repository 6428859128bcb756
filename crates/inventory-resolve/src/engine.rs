//! Resolution engine implementation.
//!
//! One call resolves one field edit in two fixed passes:
//!
//! 1. Downstream invalidation: every role after the changed one is cleared
//!    unless its stored entity still belongs to its (possibly new) parent.
//! 2. Upstream inference: walking from the changed role toward the head,
//!    each parent is set to the parent key of its child's catalog entity.
//!    A parent key that does not resolve ends the walk, and the roles above
//!    it that can no longer match are cleared.
//!
//! The result is a pure function of its inputs. Unresolvable ids (dangling
//! references, catalogs still loading) stop inference and invalidate
//! children; they never produce an error.

use std::collections::BTreeMap;

use inventory_model::{EntityId, EntityRef, ReferenceCatalog};
use tracing::{debug, trace};

use crate::chain::{Chain, ChainBuilder};
use crate::change::{Change, ChangeSet};
use crate::error::ChainError;
use crate::options::{RoleOptions, all_options, options_for};
use crate::state::SelectionState;

/// Outcome of one [`apply_change`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Consistent state after the edit.
    pub state: SelectionState,
    /// What changed relative to the input state.
    pub changes: ChangeSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Edited,
    Invalidated,
    Inferred,
}

/// Resolves the edit `role := value` against `current`.
///
/// Returns [`ChainError::UnknownRole`] when `role` is not part of `chain`;
/// catalog problems are absorbed. The changed role keeps the caller's value
/// even when it does not resolve in the catalog; everything downstream of an
/// unresolvable value is cleared and nothing is inferred from it. When an
/// inferred parent key does not resolve, the roles above it are cleared.
pub fn apply_change(
    chain: &Chain,
    current: &SelectionState,
    catalog: &ReferenceCatalog,
    role: &str,
    value: Option<EntityId>,
) -> Result<Resolution, ChainError> {
    let changed = chain.require_position(role)?;
    let specs = chain.roles();

    let before: Vec<Option<EntityId>> = specs
        .iter()
        .map(|spec| current.get(spec.name.as_str()))
        .collect();
    let mut working = before.clone();
    let mut origins = BTreeMap::new();

    working[changed] = value;
    origins.insert(changed, Origin::Edited);

    for position in changed + 1..specs.len() {
        let Some(child) = working[position] else {
            continue;
        };
        if !child_belongs_to_parent(chain, catalog, &working, position, child) {
            trace!(
                chain = chain.name(),
                role = %specs[position].name,
                id = %child,
                "clearing stale downstream selection"
            );
            working[position] = None;
            origins.insert(position, Origin::Invalidated);
        }
    }

    for position in (0..changed).rev() {
        match upstream_of(chain, catalog, &working, position + 1) {
            Upstream::Unknown => break,
            Upstream::Parent(required) => {
                if working[position] != Some(required) {
                    trace!(
                        chain = chain.name(),
                        role = %specs[position].name,
                        id = %required,
                        "inferring upstream selection"
                    );
                    working[position] = Some(required);
                    // Upstream wins if a role was already touched.
                    origins.insert(position, Origin::Inferred);
                }
            }
            Upstream::Dangling(key) => {
                // A stored id equal to the dangling key is kept; nothing above it can match.
                let kept = key.is_some() && working[position] == key;
                let end = if kept { position } else { position + 1 };
                for upper in (0..end).rev() {
                    if working[upper].is_some() {
                        trace!(
                            chain = chain.name(),
                            role = %specs[upper].name,
                            "clearing upstream selection above a dangling parent"
                        );
                        working[upper] = None;
                        origins.insert(upper, Origin::Invalidated);
                    }
                }
                break;
            }
        }
    }

    let mut changes = ChangeSet::default();
    for (position, origin) in origins {
        if working[position] == before[position] {
            continue;
        }
        let change = match (origin, working[position]) {
            (Origin::Inferred, Some(id)) => Change::Inferred(id),
            (_, Some(id)) => Change::Set(id),
            (_, None) => Change::Cleared,
        };
        changes.record(chain, specs[position].name.clone(), change);
    }

    let mut state = current.clone();
    changes.apply_to(&mut state);

    debug!(
        chain = chain.name(),
        role = %specs[changed].name,
        value = ?value.map(EntityId::get),
        changes = changes.len(),
        "resolved selection change"
    );

    Ok(Resolution { state, changes })
}

/// Looks `id` up as an entity of the role at `position`.
fn resolve<'c>(
    chain: &Chain,
    catalog: &'c ReferenceCatalog,
    position: usize,
    id: EntityId,
) -> Option<EntityRef<'c>> {
    catalog.get(chain.roles()[position].kind, id)
}

fn child_belongs_to_parent(
    chain: &Chain,
    catalog: &ReferenceCatalog,
    working: &[Option<EntityId>],
    position: usize,
    child: EntityId,
) -> bool {
    let Some(parent) = working[position - 1] else {
        return false;
    };
    if resolve(chain, catalog, position - 1, parent).is_none() {
        return false;
    }
    resolve(chain, catalog, position, child)
        .and_then(|entity| chain.roles()[position].parent_key_of(&entity))
        == Some(parent)
}

/// What the value stored at a child position says about its parent role.
enum Upstream {
    /// The child is null or unresolvable; nothing can be inferred.
    Unknown,
    /// The child's parent key resolves in the catalog.
    Parent(EntityId),
    /// The child resolves but its parent key is missing or dangling.
    Dangling(Option<EntityId>),
}

fn upstream_of(
    chain: &Chain,
    catalog: &ReferenceCatalog,
    working: &[Option<EntityId>],
    child_position: usize,
) -> Upstream {
    let Some(entity) = working[child_position]
        .and_then(|child| resolve(chain, catalog, child_position, child))
    else {
        return Upstream::Unknown;
    };
    match chain.roles()[child_position].parent_key_of(&entity) {
        Some(parent) if resolve(chain, catalog, child_position - 1, parent).is_some() => {
            Upstream::Parent(parent)
        }
        key => Upstream::Dangling(key),
    }
}

/// A chain bound to the engine so every form binding shares one declaration.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    chain: Chain,
}

impl ResolutionEngine {
    pub fn new(chain: Chain) -> Self {
        Self { chain }
    }

    /// Builds the chain and fails fast on a malformed declaration.
    pub fn build(builder: ChainBuilder) -> Result<Self, ChainError> {
        builder.build().map(Self::new)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn apply_change(
        &self,
        current: &SelectionState,
        catalog: &ReferenceCatalog,
        role: &str,
        value: Option<EntityId>,
    ) -> Result<Resolution, ChainError> {
        apply_change(&self.chain, current, catalog, role, value)
    }

    pub fn options_for<'c>(
        &self,
        current: &SelectionState,
        catalog: &'c ReferenceCatalog,
        role: &str,
    ) -> Result<Vec<EntityRef<'c>>, ChainError> {
        options_for(&self.chain, current, catalog, role)
    }

    pub fn all_options<'c>(
        &self,
        current: &SelectionState,
        catalog: &'c ReferenceCatalog,
    ) -> Vec<RoleOptions<'c>> {
        all_options(&self.chain, current, catalog)
    }
}

#[cfg(test)]
mod tests {
    use inventory_model::{CatalogSnapshot, RoleName};

    use super::*;

    fn id(value: u64) -> EntityId {
        EntityId::new(value)
    }

    fn role(name: &str) -> RoleName {
        RoleName::new(name).unwrap()
    }

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::new(
            CatalogSnapshot::default()
                .with_type(1, "Laptop")
                .with_type(2, "Monitor")
                .with_make(10, 1, "Dell")
                .with_make(11, 1, "HP")
                .with_make(12, 2, "LG")
                .with_model(100, 10, "XPS")
                .with_model(101, 11, "EliteBook")
                .with_model(102, 12, "UltraFine"),
        )
    }

    #[test]
    fn sibling_make_keeps_type_and_clears_model() {
        let chain = Chain::asset_model();
        let state = SelectionState::new()
            .with(role("type"), id(1))
            .with(role("make"), id(10))
            .with(role("model"), id(100));

        let resolution = apply_change(&chain, &state, &catalog(), "make", Some(id(11))).unwrap();

        assert_eq!(resolution.state.get("type"), Some(id(1)));
        assert_eq!(resolution.state.get("make"), Some(id(11)));
        assert_eq!(resolution.state.get("model"), None);
        assert_eq!(resolution.changes.get("type"), None);
        assert_eq!(resolution.changes.get("make"), Some(Change::Set(id(11))));
        assert_eq!(resolution.changes.get("model"), Some(Change::Cleared));
    }

    #[test]
    fn changing_type_keeps_valid_children() {
        let chain = Chain::asset_model();
        let state = SelectionState::new()
            .with(role("make"), id(10))
            .with(role("model"), id(100));

        let resolution = apply_change(&chain, &state, &catalog(), "type", Some(id(1))).unwrap();

        assert_eq!(resolution.state.get("make"), Some(id(10)));
        assert_eq!(resolution.state.get("model"), Some(id(100)));
        assert_eq!(resolution.changes.len(), 1);
    }

    #[test]
    fn make_from_other_type_reinfers_type() {
        let chain = Chain::asset_model();
        let state = SelectionState::new()
            .with(role("type"), id(1))
            .with(role("make"), id(10));

        let resolution = apply_change(&chain, &state, &catalog(), "make", Some(id(12))).unwrap();

        assert_eq!(resolution.state.get("type"), Some(id(2)));
        assert_eq!(resolution.changes.get("type"), Some(Change::Inferred(id(2))));
    }

    #[test]
    fn clearing_make_clears_model_only() {
        let chain = Chain::asset_model();
        let state = SelectionState::new()
            .with(role("type"), id(1))
            .with(role("make"), id(10))
            .with(role("model"), id(100));

        let resolution = apply_change(&chain, &state, &catalog(), "make", None).unwrap();

        assert_eq!(resolution.state.get("type"), Some(id(1)));
        assert_eq!(resolution.state.get("make"), None);
        assert_eq!(resolution.state.get("model"), None);
        assert_eq!(resolution.changes.get("make"), Some(Change::Cleared));
    }

    #[test]
    fn inferred_parent_must_exist() {
        let chain = Chain::asset_model();
        let catalog = ReferenceCatalog::new(
            CatalogSnapshot::default()
                .with_type(1, "Laptop")
                .with_model(200, 99, "Orphan"),
        );

        let resolution =
            apply_change(&chain, &SelectionState::new(), &catalog, "model", Some(id(200))).unwrap();

        assert_eq!(resolution.state.get("model"), Some(id(200)));
        assert_eq!(resolution.state.get("make"), None);
        assert_eq!(resolution.changes.len(), 1);
    }

    #[test]
    fn unknown_role_is_a_configuration_error() {
        let err = apply_change(
            &Chain::operating_system(),
            &SelectionState::new(),
            &catalog(),
            "make",
            Some(id(10)),
        )
        .unwrap_err();
        assert!(matches!(err, ChainError::UnknownRole { .. }));
    }

    #[test]
    fn roles_outside_the_chain_are_preserved() {
        let chain = Chain::asset_model();
        let state = SelectionState::new().with(role("vendor"), id(5));

        let resolution = apply_change(&chain, &state, &catalog(), "model", Some(id(100))).unwrap();

        assert_eq!(resolution.state.get("vendor"), Some(id(5)));
        assert_eq!(resolution.state.get("type"), Some(id(1)));
    }
}
