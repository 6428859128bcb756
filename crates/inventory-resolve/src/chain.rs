//! Static chain declarations.
//!
//! A chain is plain data: an ordered list of roles where every role after
//! the head names the role it depends on and how to read the parent key off
//! one of its catalog entities.

use std::collections::BTreeSet;
use std::fmt;

use inventory_model::{EntityId, EntityKind, EntityRef, RoleName};

use crate::error::ChainError;

/// Deepest chain the engine accepts.
pub const MAX_CHAIN_DEPTH: usize = 3;

/// Reads the parent key off a dependent entity (`make => make.type_id`).
pub type ParentKeyFn = fn(&EntityRef<'_>) -> Option<EntityId>;

/// Role names used by the built-in chains.
pub mod roles {
    pub const TYPE: &str = "type";
    pub const MAKE: &str = "make";
    pub const MODEL: &str = "model";
    pub const OS: &str = "os";
    pub const OS_VERSION: &str = "os_version";

    pub const ASSET_MODEL_CHAIN: &str = "asset_model";
    pub const OPERATING_SYSTEM_CHAIN: &str = "operating_system";
}

/// Parent key as declared by the entity itself.
pub fn declared_parent(entity: &EntityRef<'_>) -> Option<EntityId> {
    entity.parent_id()
}

/// One field position within a chain.
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub name: RoleName,
    /// Catalog kind the role selects from.
    pub kind: EntityKind,
    /// Role this one depends on; `None` only for the chain head.
    pub parent: Option<RoleName>,
    pub parent_key: ParentKeyFn,
}

impl RoleSpec {
    pub fn is_head(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent key of `entity` as seen through this role.
    pub fn parent_key_of(&self, entity: &EntityRef<'_>) -> Option<EntityId> {
        (self.parent_key)(entity)
    }
}

/// A validated, simple path of dependent roles.
#[derive(Debug, Clone)]
pub struct Chain {
    name: String,
    roles: Vec<RoleSpec>,
}

impl Chain {
    /// `type -> make -> model`.
    pub fn asset_model() -> Self {
        Self {
            name: roles::ASSET_MODEL_CHAIN.to_string(),
            roles: vec![
                head_role(roles::TYPE, EntityKind::AssetType),
                child_role(roles::MAKE, EntityKind::AssetMake, roles::TYPE),
                child_role(roles::MODEL, EntityKind::AssetModel, roles::MAKE),
            ],
        }
    }

    /// `os -> os_version`.
    pub fn operating_system() -> Self {
        Self {
            name: roles::OPERATING_SYSTEM_CHAIN.to_string(),
            roles: vec![
                head_role(roles::OS, EntityKind::OperatingSystem),
                child_role(roles::OS_VERSION, EntityKind::OsVersion, roles::OS),
            ],
        }
    }

    pub fn builtins() -> Vec<Chain> {
        vec![Self::asset_model(), Self::operating_system()]
    }

    /// Looks up a built-in chain by name (`asset_model`, `operating_system`).
    pub fn builtin(name: &str) -> Option<Chain> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            roles::ASSET_MODEL_CHAIN => Some(Self::asset_model()),
            roles::OPERATING_SYSTEM_CHAIN | "os" => Some(Self::operating_system()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &[RoleSpec] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Always false for a built chain.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn head(&self) -> Option<&RoleSpec> {
        self.roles.first()
    }

    pub fn leaf(&self) -> Option<&RoleSpec> {
        self.roles.last()
    }

    /// Position of `role` in chain order. Role names compare case-insensitively.
    pub fn position(&self, role: &str) -> Option<usize> {
        let role = role.trim();
        self.roles
            .iter()
            .position(|spec| spec.name.as_str().eq_ignore_ascii_case(role))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.position(role).is_some()
    }

    pub fn role(&self, role: &str) -> Option<&RoleSpec> {
        self.position(role).map(|position| &self.roles[position])
    }

    pub(crate) fn require_position(&self, role: &str) -> Result<usize, ChainError> {
        self.position(role).ok_or_else(|| ChainError::UnknownRole {
            chain: self.name.clone(),
            role: role.to_string(),
        })
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.roles.iter().map(|spec| spec.name.as_str()).collect();
        write!(f, "{}: {}", self.name, names.join(" -> "))
    }
}

fn head_role(name: &'static str, kind: EntityKind) -> RoleSpec {
    RoleSpec {
        name: RoleName::from_static(name),
        kind,
        parent: None,
        parent_key: declared_parent,
    }
}

fn child_role(name: &'static str, kind: EntityKind, parent: &'static str) -> RoleSpec {
    RoleSpec {
        name: RoleName::from_static(name),
        kind,
        parent: Some(RoleName::from_static(parent)),
        parent_key: declared_parent,
    }
}

#[derive(Debug, Clone)]
struct RoleDecl {
    name: String,
    kind: EntityKind,
    parent: Option<String>,
    parent_key: ParentKeyFn,
}

/// Builder for custom chain declarations.
///
/// Nothing is checked until [`ChainBuilder::build`], which reports the first
/// configuration problem as a [`ChainError`].
///
/// ```
/// use inventory_model::EntityKind;
/// use inventory_resolve::{ChainBuilder, declared_parent};
///
/// let chain = ChainBuilder::new("asset_model")
///     .head("type", EntityKind::AssetType)
///     .then("make", EntityKind::AssetMake, "type", declared_parent)
///     .build()
///     .unwrap();
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    name: String,
    decls: Vec<RoleDecl>,
}

impl ChainBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decls: Vec::new(),
        }
    }

    /// Declares a role without a parent.
    #[must_use]
    pub fn head(mut self, role: impl Into<String>, kind: EntityKind) -> Self {
        self.decls.push(RoleDecl {
            name: role.into(),
            kind,
            parent: None,
            parent_key: declared_parent,
        });
        self
    }

    /// Declares a role that depends on `parent`.
    #[must_use]
    pub fn then(
        mut self,
        role: impl Into<String>,
        kind: EntityKind,
        parent: impl Into<String>,
        parent_key: ParentKeyFn,
    ) -> Self {
        self.decls.push(RoleDecl {
            name: role.into(),
            kind,
            parent: Some(parent.into()),
            parent_key,
        });
        self
    }

    pub fn build(self) -> Result<Chain, ChainError> {
        let chain = self.name;
        if self.decls.is_empty() {
            return Err(ChainError::Empty { chain });
        }
        if self.decls.len() > MAX_CHAIN_DEPTH {
            return Err(ChainError::TooDeep {
                chain,
                depth: self.decls.len(),
                max: MAX_CHAIN_DEPTH,
            });
        }

        let mut names = Vec::with_capacity(self.decls.len());
        let mut seen = BTreeSet::new();
        for decl in &self.decls {
            let name = RoleName::new(decl.name.as_str()).map_err(|_| ChainError::InvalidRoleName {
                chain: chain.clone(),
                role: decl.name.clone(),
            })?;
            if !seen.insert(name.clone()) {
                return Err(ChainError::DuplicateRole {
                    chain,
                    role: name.to_string(),
                });
            }
            names.push(name);
        }

        let mut roles = Vec::with_capacity(self.decls.len());
        for (position, (decl, name)) in self.decls.into_iter().zip(names.iter()).enumerate() {
            let parent = match (position, decl.parent) {
                (0, None) => None,
                (0, Some(_)) => {
                    return Err(ChainError::HeadWithParent {
                        chain,
                        role: name.to_string(),
                    });
                }
                (_, None) => {
                    return Err(ChainError::MissingParent {
                        chain,
                        role: name.to_string(),
                    });
                }
                (_, Some(raw)) => {
                    let parent = RoleName::new(raw.as_str())
                        .ok()
                        .filter(|parent| seen.contains(parent))
                        .ok_or_else(|| ChainError::UnknownParent {
                            chain: chain.clone(),
                            role: name.to_string(),
                            parent: raw.clone(),
                        })?;
                    let expected = &names[position - 1];
                    if &parent != expected {
                        return Err(ChainError::ParentNotAdjacent {
                            chain,
                            role: name.to_string(),
                            parent: parent.to_string(),
                            expected: expected.to_string(),
                        });
                    }
                    Some(parent)
                }
            };
            roles.push(RoleSpec {
                name: name.clone(),
                kind: decl.kind,
                parent,
                parent_key: decl.parent_key,
            });
        }

        Ok(Chain { name: chain, roles })
    }
}
