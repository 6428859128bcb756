use inventory_model::{EntityId, RoleName};
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::state::SelectionState;

/// What one resolution step did to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Change {
    /// Chosen by the user.
    Set(EntityId),
    /// Reset to null.
    Cleared,
    /// Derived from a more specific selection. Never fed back into the engine.
    Inferred(EntityId),
}

impl Change {
    pub fn value(&self) -> Option<EntityId> {
        match self {
            Change::Set(id) | Change::Inferred(id) => Some(*id),
            Change::Cleared => None,
        }
    }

    pub fn is_inferred(&self) -> bool {
        matches!(self, Change::Inferred(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Change::Set(_) => "set",
            Change::Cleared => "cleared",
            Change::Inferred(_) => "inferred",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: RoleName,
    pub change: Change,
}

/// Role mutations produced by one resolution step, in chain order.
///
/// Roles whose value did not change have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: Vec<RoleChange>,
}

impl ChangeSet {
    /// Change recorded for `role`. Role names compare case-insensitively.
    pub fn get(&self, role: &str) -> Option<Change> {
        let role = role.trim();
        self.entries
            .iter()
            .find(|entry| entry.role.as_str().eq_ignore_ascii_case(role))
            .map(|entry| entry.change)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleChange> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn inferred_roles(&self) -> Vec<&RoleName> {
        self.entries
            .iter()
            .filter(|entry| entry.change.is_inferred())
            .map(|entry| &entry.role)
            .collect()
    }

    /// Writes every entry into `state` without any further resolution.
    pub fn apply_to(&self, state: &mut SelectionState) {
        for entry in &self.entries {
            state.set(entry.role.clone(), entry.change.value());
        }
    }

    /// Records `change` for `role`, replacing an earlier entry for the same
    /// role and keeping chain order.
    pub(crate) fn record(&mut self, chain: &Chain, role: RoleName, change: Change) {
        match self.entries.iter_mut().find(|entry| entry.role == role) {
            Some(entry) => entry.change = change,
            None => self.entries.push(RoleChange { role, change }),
        }
        self.entries
            .sort_by_key(|entry| chain.position(entry.role.as_str()).unwrap_or(usize::MAX));
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a RoleChange;
    type IntoIter = std::slice::Iter<'a, RoleChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
