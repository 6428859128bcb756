//! Several independent chains bound to one form.

use std::collections::BTreeSet;
use std::sync::Arc;

use inventory_model::{EntityId, ReferenceCatalog};

use crate::chain::Chain;
use crate::change::ChangeSet;
use crate::error::ChainError;
use crate::session::ChainSession;

const FORM_SCOPE: &str = "form";

/// Selection state of a whole form, e.g. an asset row with its model chain
/// and its operating-system chain.
///
/// Every row of a multi-row form (bulk creation, purchase-order assets) owns
/// its own `FormSelection`; use [`FormSelection::fresh`] to start a new row.
#[derive(Debug, Clone)]
pub struct FormSelection {
    sessions: Vec<ChainSession>,
}

impl FormSelection {
    /// Binds `chains` to one form. Role names must be unique across chains.
    pub fn new<I>(chains: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = Arc<Chain>>,
    {
        let mut seen = BTreeSet::new();
        let mut sessions = Vec::new();
        for chain in chains {
            for spec in chain.roles() {
                if !seen.insert(spec.name.clone()) {
                    return Err(ChainError::DuplicateRole {
                        chain: chain.name().to_string(),
                        role: spec.name.to_string(),
                    });
                }
            }
            sessions.push(ChainSession::new(chain));
        }
        Ok(Self { sessions })
    }

    /// The asset form: `type -> make -> model` plus `os -> os_version`.
    pub fn asset_form() -> Self {
        Self {
            sessions: vec![
                ChainSession::new(Arc::new(Chain::asset_model())),
                ChainSession::new(Arc::new(Chain::operating_system())),
            ],
        }
    }

    /// An empty copy sharing only the chain declarations.
    pub fn fresh(&self) -> Self {
        Self {
            sessions: self.sessions.iter().map(ChainSession::fresh).collect(),
        }
    }

    pub fn sessions(&self) -> &[ChainSession] {
        &self.sessions
    }

    pub fn session(&self, chain: &str) -> Option<&ChainSession> {
        self.sessions
            .iter()
            .find(|session| session.chain().name().eq_ignore_ascii_case(chain.trim()))
    }

    pub fn session_for_role(&self, role: &str) -> Option<&ChainSession> {
        self.sessions
            .iter()
            .find(|session| session.chain().contains(role))
    }

    pub fn value(&self, role: &str) -> Option<EntityId> {
        self.session_for_role(role)
            .and_then(|session| session.value(role))
    }

    /// Routes a user edit to the chain that owns `role`.
    pub fn edit(
        &mut self,
        catalog: &ReferenceCatalog,
        role: &str,
        value: Option<EntityId>,
    ) -> Result<ChangeSet, ChainError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|session| session.chain().contains(role))
            .ok_or_else(|| ChainError::UnknownRole {
                chain: FORM_SCOPE.to_string(),
                role: role.to_string(),
            })?;
        session.edit(catalog, role, value)
    }

    pub fn reset(&mut self) {
        for session in &mut self.sessions {
            session.reset();
        }
    }
}
