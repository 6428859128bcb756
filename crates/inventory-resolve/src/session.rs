//! Per-form chain instances with provenance tracking.

use std::collections::BTreeMap;
use std::sync::Arc;

use inventory_model::{EntityId, EntityRef, ReferenceCatalog, RoleName};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::Chain;
use crate::change::{Change, ChangeSet};
use crate::engine::apply_change;
use crate::error::ChainError;
use crate::options::{RoleOptions, all_options, options_for};
use crate::state::SelectionState;

/// Where a role's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Chosen by the user, or loaded from a persisted record.
    User,
    /// Derived by the engine from a downstream selection.
    Inferred,
}

/// One chain instance owned by one form or form row.
///
/// Edits go through [`ChainSession::edit`], which resolves them and applies
/// the resulting change set directly. Inferred entries are written without
/// re-entering the engine.
///
/// Clearing a role also clears the upstream roles that were only ever
/// inferred, walking toward the head and stopping at the first role the user
/// chose. Selecting a model and then clearing it therefore leaves an empty
/// chain, while a type picked by hand survives.
#[derive(Debug, Clone)]
pub struct ChainSession {
    chain: Arc<Chain>,
    state: SelectionState,
    provenance: BTreeMap<RoleName, Provenance>,
}

impl ChainSession {
    pub fn new(chain: Arc<Chain>) -> Self {
        Self {
            chain,
            state: SelectionState::new(),
            provenance: BTreeMap::new(),
        }
    }

    /// Opens a session pre-populated from a persisted record (edit mode).
    ///
    /// Only roles of the chain are kept; all of them count as user choices.
    pub fn with_state(chain: Arc<Chain>, initial: &SelectionState) -> Self {
        let mut session = Self::new(chain);
        for spec in session.chain.roles() {
            if let Some(id) = initial.get(spec.name.as_str()) {
                session.state.set(spec.name.clone(), Some(id));
                session.provenance.insert(spec.name.clone(), Provenance::User);
            }
        }
        session
    }

    /// An empty session over the same chain, for a new form row.
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.chain))
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn value(&self, role: &str) -> Option<EntityId> {
        self.chain
            .role(role)
            .and_then(|spec| self.state.get(spec.name.as_str()))
    }

    pub fn provenance(&self, role: &str) -> Option<Provenance> {
        let spec = self.chain.role(role)?;
        self.provenance.get(spec.name.as_str()).copied()
    }

    /// Applies a user edit and returns what changed.
    pub fn edit(
        &mut self,
        catalog: &ReferenceCatalog,
        role: &str,
        value: Option<EntityId>,
    ) -> Result<ChangeSet, ChainError> {
        let resolution = apply_change(&self.chain, &self.state, catalog, role, value)?;
        let mut changes = resolution.changes;
        let mut state = resolution.state;
        let position = self.chain.require_position(role)?;

        if value.is_none() {
            self.release_inferred_ancestors(position, &mut state, &mut changes);
        }

        for entry in &changes {
            match entry.change {
                Change::Set(_) => {
                    self.provenance.insert(entry.role.clone(), Provenance::User);
                }
                Change::Inferred(_) => {
                    self.provenance
                        .insert(entry.role.clone(), Provenance::Inferred);
                }
                Change::Cleared => {
                    self.provenance.remove(&entry.role);
                }
            }
        }
        // Re-selecting an inferred value confirms it.
        if value.is_some() {
            let name = self.chain.roles()[position].name.clone();
            self.provenance.insert(name, Provenance::User);
        }

        self.state = state;
        Ok(changes)
    }

    /// Clears every role and forgets provenance.
    pub fn reset(&mut self) {
        self.state = SelectionState::new();
        self.provenance.clear();
    }

    pub fn options<'c>(
        &self,
        catalog: &'c ReferenceCatalog,
        role: &str,
    ) -> Result<Vec<EntityRef<'c>>, ChainError> {
        options_for(&self.chain, &self.state, catalog, role)
    }

    pub fn all_options<'c>(&self, catalog: &'c ReferenceCatalog) -> Vec<RoleOptions<'c>> {
        all_options(&self.chain, &self.state, catalog)
    }

    fn release_inferred_ancestors(
        &self,
        position: usize,
        state: &mut SelectionState,
        changes: &mut ChangeSet,
    ) {
        for spec in self.chain.roles()[..position].iter().rev() {
            let name = spec.name.as_str();
            if state.get(name).is_none() {
                continue;
            }
            if self.provenance.get(name) != Some(&Provenance::Inferred) {
                break;
            }
            debug!(
                chain = self.chain.name(),
                role = name,
                "releasing inferred selection"
            );
            state.clear(name);
            changes.record(&self.chain, spec.name.clone(), Change::Cleared);
        }
    }
}
