#![forbid(unsafe_code)]

//! GitHub collaborator reconciliation.
//!
//! Keeps a repository's collaborator list converged with a project's team
//! roster. Two entry points on [`Reconciler`]:
//! - [`Reconciler::on_team_edit`]: apply the delta between two roster
//!   snapshots (cheap, proportional to the edit).
//! - [`Reconciler::force`]: fetch observed membership and converge desired
//!   vs observed (idempotent, safe to re-run after drift).
//!
//! The engine takes immutable snapshots and an explicit host; the calling
//! layer owns persistence, transactions, and credentials.

pub use collabsync_core as core;

pub mod config;
pub mod error;
pub mod github;
pub mod host;
pub mod reconcile;
pub mod telemetry;

pub use crate::core::{
    BatchId, Effect, Member, MemberId, MemberOp, MemberOutcome, Outcome, Permission, ProjectId,
    ProjectSnapshot, ReconcileReport, RepoId, RepoRefError, Role, Roster, RosterDelta, Transience,
};
pub use config::{Config, ConfigError, GithubConfig, LogFormat, LoggingConfig};
pub use error::ReconcileError;
pub use github::GitHubHost;
pub use host::{AddOutcome, CollaboratorHost, HostError, RemoveOutcome};
pub use reconcile::Reconciler;

use thiserror::Error;

/// Crate-level convenience error.
///
/// Not a "god error": a thin wrapper over the capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn transience(&self) -> Transience {
        match self {
            Error::Reconcile(e) => e.transience(),
            Error::Host(e) => e.transience(),
            Error::Config(_) => Transience::Permanent,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            Error::Reconcile(e) => e.effect(),
            Error::Host(_) => Effect::Unknown,
            Error::Config(_) => Effect::None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
