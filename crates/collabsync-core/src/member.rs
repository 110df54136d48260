//! Roster member snapshot values.

use serde::{Deserialize, Serialize};

use crate::identity::MemberId;

/// Internal role of a team member.
///
/// Adding a variant here forces an update of the permission policy - the
/// mapping is an exhaustive match with no wildcard arm.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    Dev,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Dev => "dev",
        }
    }
}

/// Immutable snapshot of one team member as the engine sees them.
///
/// Carries only what reconciliation needs: identity, role, and the remote
/// principal. The persistence-layer user entity never crosses this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub role: Role,
    github_login: Option<String>,
}

impl Member {
    pub fn new(id: MemberId, role: Role, github_login: Option<String>) -> Self {
        Self {
            id,
            role,
            github_login,
        }
    }

    /// The member's GitHub login, or `None` when missing or blank.
    ///
    /// Members without a usable login are invisible to reconciliation: they
    /// never appear in desired membership and never cause a remote call.
    pub fn login(&self) -> Option<&str> {
        match self.github_login.as_deref() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
            None => None,
        }
    }
}
