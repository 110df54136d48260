//! Collaborator host seam.
//!
//! The engine talks to the remote system only through [`CollaboratorHost`].
//! Each call is synchronous and independent; the host holds no reconciliation
//! state across calls. Production uses [`crate::github::GitHubHost`]; tests
//! inject a scripted double.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::{Permission, RepoId, Transience};

/// Result of an add operation.
///
/// "Already a collaborator" is a success shape, not an error: the engine
/// reports it as `Unchanged`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The user was added, or an invitation was created.
    Invited,
    /// The user already had access.
    AlreadyCollaborator,
}

/// Result of a remove operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user's access was revoked.
    Removed,
    /// The user was not a collaborator to begin with.
    NotACollaborator,
}

/// Remote host failures.
///
/// `Auth` is the one kind the engine treats as fatal to a whole batch -
/// every further call would be rejected identically. Everything else is
/// scoped to the call that produced it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HostError {
    #[error("authentication rejected by remote host: {0}")]
    Auth(String),

    #[error("transport failure talking to remote host: {0}")]
    Transport(String),

    #[error("remote host returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode remote response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HostError {
    /// Whether retrying the same call may succeed.
    pub fn transience(&self) -> Transience {
        match self {
            HostError::Transport(_) => Transience::Retryable,
            HostError::Api { status, .. } if *status >= 500 => Transience::Retryable,
            HostError::Auth(_) | HostError::Api { .. } | HostError::Decode(_) => {
                Transience::Permanent
            }
        }
    }
}

/// Thin contract over a remote repository host's collaborator operations.
pub trait CollaboratorHost {
    /// Current collaborator logins for the repository.
    fn list_collaborators(&self, repo: &RepoId) -> Result<BTreeSet<String>, HostError>;

    /// Grant `login` the given permission on the repository.
    fn add_collaborator(
        &self,
        repo: &RepoId,
        login: &str,
        permission: Permission,
    ) -> Result<AddOutcome, HostError>;

    /// Revoke `login`'s access to the repository.
    fn remove_collaborator(&self, repo: &RepoId, login: &str) -> Result<RemoveOutcome, HostError>;
}
