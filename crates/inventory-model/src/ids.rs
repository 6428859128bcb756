#![deny(unsafe_code)]

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Identifier of a reference entity as issued by the backend.
///
/// Ids are only unique within one [`EntityKind`](crate::EntityKind); a make and a
/// model may share the same numeric id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidEntityId(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of one field position within a chain (e.g. `make`).
///
/// Role names are trimmed and lower-cased so `"Make"` and `" make "` address
/// the same field.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidRoleName(value));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Builds a role name from a literal that is already trimmed and
    /// lower-case. Used for static chain declarations.
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(!value.is_empty() && value == value.trim().to_ascii_lowercase());
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoleName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl FromStr for RoleName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Borrow<str> for RoleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_parses_trimmed_digits() {
        assert_eq!(" 42 ".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!(matches!(
            "abc".parse::<EntityId>(),
            Err(ModelError::InvalidEntityId(_))
        ));
        assert!("".parse::<EntityId>().is_err());
    }

    #[test]
    fn role_name_normalizes_case() {
        let role = RoleName::new(" Make ").unwrap();
        assert_eq!(role.as_str(), "make");
        assert!(RoleName::new("   ").is_err());
    }
}
