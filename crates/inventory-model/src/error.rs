use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid entity id: {0:?}")]
    InvalidEntityId(String),
    #[error("invalid role name: {0:?}")]
    InvalidRoleName(String),
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
