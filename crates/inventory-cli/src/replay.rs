//! Replays a sequence of user edits through a [`ChainSession`].

use std::sync::Arc;

use inventory_model::{EntityId, ReferenceCatalog, RoleName};
use inventory_resolve::{Chain, ChainError, ChainSession, ChangeSet, Provenance, SelectionState};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::assignment::Assignment;

/// One replayed edit and what it changed.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub edit: Assignment,
    pub changes: ChangeSet,
}

/// Final value of one role after the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleValue {
    pub role: RoleName,
    pub value: Option<EntityId>,
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub chain: String,
    pub initial: SelectionState,
    pub steps: Vec<ReplayStep>,
    /// Every role of the chain, in chain order.
    pub roles: Vec<RoleValue>,
}

impl ReplayOutcome {
    pub fn final_state(&self) -> SelectionState {
        self.roles
            .iter()
            .filter_map(|entry| entry.value.map(|id| (entry.role.clone(), id)))
            .collect()
    }
}

/// Builds the pre-populated state of an edit-mode form.
///
/// Cleared assignments (`role=-`) are accepted and leave the role empty.
pub fn initial_state(
    chain: &Chain,
    assignments: &[Assignment],
) -> Result<SelectionState, ChainError> {
    let mut state = SelectionState::new();
    for assignment in assignments {
        let spec = chain
            .role(&assignment.role)
            .ok_or_else(|| ChainError::UnknownRole {
                chain: chain.name().to_string(),
                role: assignment.role.clone(),
            })?;
        state.set(spec.name.clone(), assignment.value);
    }
    Ok(state)
}

/// Applies `edits` in order to a session opened on `initial`.
pub fn replay(
    chain: Arc<Chain>,
    catalog: &ReferenceCatalog,
    initial: &SelectionState,
    edits: &[Assignment],
) -> Result<ReplayOutcome, ChainError> {
    let span = info_span!("replay", chain = %chain.name(), edits = edits.len());
    let _guard = span.enter();

    let mut session = ChainSession::with_state(Arc::clone(&chain), initial);
    let mut steps = Vec::with_capacity(edits.len());
    for edit in edits {
        let changes = session.edit(catalog, &edit.role, edit.value)?;
        debug!(edit = %edit, changed = changes.len(), "replayed edit");
        steps.push(ReplayStep {
            edit: edit.clone(),
            changes,
        });
    }

    let roles = chain
        .roles()
        .iter()
        .map(|spec| RoleValue {
            role: spec.name.clone(),
            value: session.value(spec.name.as_str()),
            provenance: session.provenance(spec.name.as_str()),
        })
        .collect();

    Ok(ReplayOutcome {
        chain: chain.name().to_string(),
        initial: session_initial(&chain, initial),
        steps,
        roles,
    })
}

fn session_initial(chain: &Chain, initial: &SelectionState) -> SelectionState {
    initial
        .iter()
        .filter(|(role, _)| chain.contains(role.as_str()))
        .map(|(role, id)| (role.clone(), id))
        .collect()
}
