//! Role to repository-permission policy.

use serde::{Deserialize, Serialize};

use crate::member::Role;

/// Remote repository permission level, named as GitHub's REST API expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access.
    Pull,
    /// Read-write access.
    Push,
}

impl Permission {
    /// Total policy: hands-on contributors get write, everyone else read.
    ///
    /// No wildcard arm - a new `Role` variant fails to compile until this
    /// mapping is extended.
    pub fn for_role(role: Role) -> Permission {
        match role {
            Role::Dev => Permission::Push,
            Role::Admin | Role::Client => Permission::Pull,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Pull => "pull",
            Permission::Push => "push",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
