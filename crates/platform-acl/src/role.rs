//! # Roles
//!
//! Membership roles and the grant hierarchy between them.
//!
//! | Role     | Can grant               |
//! |----------|-------------------------|
//! | `owner`  | owner, admin, member    |
//! | `admin`  | admin, member           |
//! | `member` | -                       |
//! | `none`   | -                       |
//! | `self`   | -                       |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AclError, AclResult};

/// A capability level held by a member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No membership
    None,
    /// Regular member
    Member,
    /// Manages members
    Admin,
    /// Full control
    Owner,
    /// The principal acting on itself.
    ///
    /// Written `self` in text and JSON; `Self` is reserved as an identifier.
    #[serde(rename = "self")]
    Oneself,
}

/// Roles and the roles each one may grant to others.
const ROLE_GRANTS: &[(Role, &[Role])] = &[
    (Role::None, &[]),
    (Role::Member, &[]),
    (Role::Admin, &[Role::Member, Role::Admin]),
    (Role::Owner, &[Role::Member, Role::Admin, Role::Owner]),
    (Role::Oneself, &[]),
];

impl Role {
    /// Get the canonical lowercase name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Member => "member",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Oneself => "self",
        }
    }

    /// Get the human-readable name of the role.
    pub fn name(&self) -> &'static str {
        match self {
            Role::None => "None",
            Role::Member => "Member",
            Role::Admin => "Admin",
            Role::Owner => "Owner",
            Role::Oneself => "Self",
        }
    }

    /// Parse a role from its canonical name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Role::None),
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            "self" => Some(Role::Oneself),
            _ => None,
        }
    }

    /// Get all roles.
    pub fn all() -> Vec<Self> {
        ROLE_GRANTS.iter().map(|(role, _)| *role).collect()
    }

    /// Get the roles this role may grant.
    pub fn grants(&self) -> &'static [Role] {
        ROLE_GRANTS
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, grants)| *grants)
            .unwrap_or(&[])
    }

    /// Check if this role may grant another role.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::Role;
    ///
    /// assert!(Role::Owner.can_grant(Role::Owner));
    /// assert!(Role::Admin.can_grant(Role::Member));
    /// assert!(!Role::Admin.can_grant(Role::Owner));
    /// assert!(!Role::Member.can_grant(Role::Member));
    /// ```
    pub fn can_grant(&self, target: Role) -> bool {
        self.grants().contains(&target)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AclError;

    fn from_str(s: &str) -> AclResult<Self> {
        Role::parse(s).ok_or_else(|| AclError::InvalidRole(s.to_string()))
    }
}

/// The roles held by one member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roles(Vec<Role>);

impl Roles {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Check if any held role may grant the target role.
    pub fn can_grant(&self, target: Role) -> bool {
        self.0.iter().any(|role| role.can_grant(target))
    }

    /// Check if a role is held.
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Get the deduplicated union of two sets, ordered by role.
    pub fn merge(&self, other: &Roles) -> Roles {
        let mut merged: Vec<Role> = self.0.iter().chain(&other.0).copied().collect();
        merged.sort();
        merged.dedup();
        Roles(merged)
    }

    /// Iterate over the held roles.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    /// Get the number of held roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Role>> for Roles {
    fn from(roles: Vec<Role>) -> Self {
        Self(roles)
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, role) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(role.as_str())?;
        }
        Ok(())
    }
}
