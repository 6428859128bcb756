#![deny(unsafe_code)]

/// Static misconfiguration of a chain declaration or of a role reference.
///
/// These are programmer errors surfaced when a chain is built or when a
/// caller addresses a role the chain does not declare. Catalog data problems
/// never produce an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("chain {chain} declares no roles")]
    Empty { chain: String },

    #[error("chain {chain} has {depth} roles (maximum is {max})")]
    TooDeep {
        chain: String,
        depth: usize,
        max: usize,
    },

    #[error("chain {chain} has an invalid role name {role:?}")]
    InvalidRoleName { chain: String, role: String },

    #[error("chain {chain} declares role {role} more than once")]
    DuplicateRole { chain: String, role: String },

    #[error("head role {role} of chain {chain} must not declare a parent")]
    HeadWithParent { chain: String, role: String },

    #[error("role {role} of chain {chain} does not declare a parent")]
    MissingParent { chain: String, role: String },

    #[error("role {role} of chain {chain} references unknown parent {parent}")]
    UnknownParent {
        chain: String,
        role: String,
        parent: String,
    },

    #[error("role {role} of chain {chain} must depend on {expected}, not {parent}")]
    ParentNotAdjacent {
        chain: String,
        role: String,
        parent: String,
        expected: String,
    },

    #[error("chain {chain} has no role {role}")]
    UnknownRole { chain: String, role: String },
}
