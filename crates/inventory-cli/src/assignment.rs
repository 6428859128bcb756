//! `role=id` arguments.

use std::fmt;
use std::str::FromStr;

use inventory_model::EntityId;

/// Values that clear a role: `role=`, `role=-`, `role=null`.
const CLEAR_TOKENS: &[&str] = &["", "-", "null"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("expected ROLE=ID, got {0:?}")]
    MissingSeparator(String),
    #[error("empty role in {0:?}")]
    EmptyRole(String),
    #[error("invalid id {value:?} for role {role}")]
    InvalidId { role: String, value: String },
}

/// One field write: a role name and the id to store (or `None` to clear).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Assignment {
    pub role: String,
    pub value: Option<EntityId>,
}

impl FromStr for Assignment {
    type Err = AssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, value) = s
            .split_once('=')
            .ok_or_else(|| AssignmentError::MissingSeparator(s.to_string()))?;
        let role = role.trim().to_ascii_lowercase();
        if role.is_empty() {
            return Err(AssignmentError::EmptyRole(s.to_string()));
        }
        let value = value.trim();
        if CLEAR_TOKENS.iter().any(|token| value.eq_ignore_ascii_case(token)) {
            return Ok(Self { role, value: None });
        }
        let id = value.parse().map_err(|_| AssignmentError::InvalidId {
            role: role.clone(),
            value: value.to_string(),
        })?;
        Ok(Self {
            role,
            value: Some(id),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(id) => write!(f, "{}={id}", self.role),
            None => write!(f, "{}=-", self.role),
        }
    }
}
