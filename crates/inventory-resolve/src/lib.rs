//! Cascading entity resolution for dependent selection fields.
//!
//! A [`Chain`] declares an ordered path of roles (`type -> make -> model`,
//! `os -> os_version`). [`apply_change`] turns one field edit into a
//! consistent [`SelectionState`] plus a [`ChangeSet`], and [`options_for`]
//! projects the catalog entries that are valid for a role. Both are pure
//! functions over a [`ReferenceCatalog`](inventory_model::ReferenceCatalog).
//!
//! Callers apply a returned `ChangeSet` by writing the bound field values
//! directly. Entries marked [`Change::Inferred`] must not be fed back into
//! the engine; only user-originated edits re-enter it. [`ChainSession`] and
//! [`FormSelection`] implement that contract for form bindings.

#![deny(unsafe_code)]

pub mod chain;
pub mod change;
pub mod engine;
pub mod error;
pub mod form;
pub mod options;
pub mod session;
pub mod state;

pub use chain::{
    Chain, ChainBuilder, MAX_CHAIN_DEPTH, ParentKeyFn, RoleSpec, declared_parent, roles,
};
pub use change::{Change, ChangeSet, RoleChange};
pub use engine::{Resolution, ResolutionEngine, apply_change};
pub use error::ChainError;
pub use form::FormSelection;
pub use options::{RoleOptions, all_options, options_for};
pub use session::{ChainSession, Provenance};
pub use state::SelectionState;
