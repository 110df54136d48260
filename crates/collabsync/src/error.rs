//! Reconciliation error taxonomy.
//!
//! Only batch-fatal conditions become errors. A single member's failed
//! add/remove is recorded in the report and logged, never raised.

use thiserror::Error;

use crate::core::{Effect, ProjectId, RepoRefError, Transience};
use crate::host::HostError;

/// Errors that abort a whole reconciliation pass.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error("project {project} has no linked repository")]
    RepoNotLinked { project: ProjectId },

    #[error(transparent)]
    Ref(#[from] RepoRefError),

    #[error("authentication rejected by remote host: {message}")]
    Auth { message: String },

    #[error("failed to list collaborators for {repo}: {source}")]
    ListFailed {
        repo: String,
        #[source]
        source: HostError,
    },
}

impl ReconcileError {
    /// Whether retrying the pass may succeed.
    pub fn transience(&self) -> Transience {
        match self {
            // Configuration and reference problems need operator action.
            ReconcileError::RepoNotLinked { .. } | ReconcileError::Ref(_) => Transience::Permanent,

            // Credentials may be rotated; the fetch may be a blip.
            ReconcileError::Auth { .. } => Transience::Retryable,
            ReconcileError::ListFailed { source, .. } => source.transience(),
        }
    }

    /// What we know about remote side effects when this error is returned.
    pub fn effect(&self) -> Effect {
        match self {
            // These all fail before any mutation is attempted.
            ReconcileError::RepoNotLinked { .. }
            | ReconcileError::Ref(_)
            | ReconcileError::ListFailed { .. } => Effect::None,

            // A 401 can interrupt a batch after some members were applied.
            ReconcileError::Auth { .. } => Effect::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_permanent_and_effect_free() {
        let err = ReconcileError::RepoNotLinked {
            project: ProjectId::new("p-1").unwrap(),
        };
        assert_eq!(err.transience(), Transience::Permanent);
        assert_eq!(err.effect(), Effect::None);
    }

    #[test]
    fn list_failure_inherits_host_transience() {
        let err = ReconcileError::ListFailed {
            repo: "org/proj1".into(),
            source: HostError::Transport("timed out".into()),
        };
        assert!(err.transience().is_retryable());
        assert_eq!(err.effect(), Effect::None);
    }

    #[test]
    fn auth_rejection_has_unknown_effect() {
        let err = ReconcileError::Auth {
            message: "bad credentials".into(),
        };
        assert_eq!(err.effect(), Effect::Unknown);
    }
}
