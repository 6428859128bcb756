use std::borrow::Cow;
use std::collections::BTreeMap;

use inventory_model::{EntityId, RoleName};
use serde::{Deserialize, Serialize};

/// Currently chosen identifiers of one chain instance.
///
/// A role that is absent from the map is null. Each form (or form row) owns
/// its own state; it is never shared between rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    values: BTreeMap<RoleName, EntityId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for pre-populating edit forms.
    #[must_use]
    pub fn with(mut self, role: RoleName, id: EntityId) -> Self {
        self.values.insert(role, id);
        self
    }

    /// Value of `role`. Role names compare case-insensitively.
    pub fn get(&self, role: &str) -> Option<EntityId> {
        self.values.get(lookup_key(role).as_ref()).copied()
    }

    pub fn set(&mut self, role: RoleName, value: Option<EntityId>) {
        match value {
            Some(id) => {
                self.values.insert(role, id);
            }
            None => {
                self.values.remove(&role);
            }
        }
    }

    pub fn clear(&mut self, role: &str) -> Option<EntityId> {
        self.values.remove(lookup_key(role).as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, EntityId)> {
        self.values.iter().map(|(role, id)| (role, *id))
    }
}

impl FromIterator<(RoleName, EntityId)> for SelectionState {
    fn from_iter<I: IntoIterator<Item = (RoleName, EntityId)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// `role` in the trimmed lower-case form [`RoleName`] stores.
fn lookup_key(role: &str) -> Cow<'_, str> {
    let trimmed = role.trim();
    if trimmed.bytes().any(|byte| byte.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}
