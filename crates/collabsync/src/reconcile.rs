//! Collaborator reconciliation engine.
//!
//! Two modes, one diff/apply loop:
//! - Incremental: diff two roster snapshots, apply the delta. No list call;
//!   remote traffic is proportional to the edit.
//! - Full: fetch observed membership, converge desired vs observed. The one
//!   idempotent path that repairs drift, safe to re-run.
//!
//! Batches run sequentially in member-id order on the caller's thread. One
//! member's failure is recorded and logged, then the loop moves on; only
//! credential rejection aborts a batch, since every further call would be
//! rejected the same way.

use crate::config::{Config, ConfigError};
use crate::core::{
    Member, MemberOp, MemberOutcome, Outcome, Permission, ProjectSnapshot, ReconcileReport, RepoId,
    Roster, resolve,
};
use crate::error::ReconcileError;
use crate::github::GitHubHost;
use crate::host::{AddOutcome, CollaboratorHost, HostError, RemoveOutcome};

/// Reconciles a project's team roster against its repository's collaborator
/// list through a [`CollaboratorHost`].
pub struct Reconciler<H> {
    host: H,
    default_owner: Option<String>,
}

impl Reconciler<GitHubHost> {
    /// Production wiring: GitHub host plus the configured default owner.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let host = GitHubHost::from_config(&config.github)?;
        Ok(Self::new(host, config.github.owner.clone()))
    }
}

impl<H: CollaboratorHost> Reconciler<H> {
    pub fn new(host: H, default_owner: Option<String>) -> Self {
        Self {
            host,
            default_owner,
        }
    }

    /// Incremental reconciliation after a team edit.
    ///
    /// `project.team` is the post-edit roster; `old_team` the snapshot taken
    /// before the edit. Projects without a linked repository are a no-op:
    /// zero remote calls, empty report.
    pub fn on_team_edit(
        &self,
        project: &ProjectSnapshot,
        old_team: &Roster,
    ) -> Result<ReconcileReport, ReconcileError> {
        let Some(reference) = project.repo_reference() else {
            tracing::debug!(
                project = %project.id,
                "no linked repository, skipping collaborator sync"
            );
            return Ok(ReconcileReport::new(project.id.clone(), None));
        };
        let repo = resolve(reference, self.default_owner.as_deref())?;

        let delta = project.team.delta_since(old_team);
        let mut report = ReconcileReport::new(project.id.clone(), Some(repo.full_name()));
        tracing::debug!(
            project = %project.id,
            repo = %repo,
            batch = %report.batch,
            joined = delta.added.len(),
            left = delta.removed.len(),
            "reconciling team edit"
        );

        self.add_members(&repo, &delta.added, &mut report)?;
        self.remove_members(&repo, &delta.removed, &mut report)?;

        if !report.is_noop() {
            tracing::info!(
                project = %project.id,
                batch = %report.batch,
                "{}",
                report.summary_line()
            );
        }
        Ok(report)
    }

    /// Full reconciliation: converge the repository's collaborator list onto
    /// the team roster, regardless of how the drift happened.
    ///
    /// Fails hard when the project has no linked repository or the observed
    /// membership cannot be fetched - no mutation is attempted against an
    /// unverified baseline.
    pub fn force(&self, project: &ProjectSnapshot) -> Result<ReconcileReport, ReconcileError> {
        let Some(reference) = project.repo_reference() else {
            return Err(ReconcileError::RepoNotLinked {
                project: project.id.clone(),
            });
        };
        let repo = resolve(reference, self.default_owner.as_deref())?;

        let observed = self.host.list_collaborators(&repo).map_err(|source| match source {
            HostError::Auth(message) => ReconcileError::Auth { message },
            source => ReconcileError::ListFailed {
                repo: repo.full_name(),
                source,
            },
        })?;
        let desired = project.team.logins();

        let to_add: Vec<Member> = project
            .team
            .iter()
            .filter(|m| m.login().is_some_and(|login| !observed.contains(login)))
            .cloned()
            .collect();
        let to_remove: Vec<&str> = observed
            .iter()
            .filter(|login| !desired.contains(*login))
            .map(String::as_str)
            .collect();

        let mut report = ReconcileReport::new(project.id.clone(), Some(repo.full_name()));
        tracing::debug!(
            project = %project.id,
            repo = %repo,
            batch = %report.batch,
            observed = observed.len(),
            desired = desired.len(),
            to_add = to_add.len(),
            to_remove = to_remove.len(),
            "forced reconciliation"
        );

        self.add_members(&repo, &to_add, &mut report)?;
        for login in to_remove {
            self.remove_login(&repo, login, None, &mut report)?;
        }

        tracing::info!(
            project = %project.id,
            batch = %report.batch,
            attempted = report.outcomes.len(),
            failed = report.failed(),
            "{}",
            report.summary_line()
        );
        Ok(report)
    }

    fn add_members(
        &self,
        repo: &RepoId,
        members: &[Member],
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        for member in members {
            let Some(login) = member.login() else {
                continue;
            };
            let permission = Permission::for_role(member.role);
            let outcome = match self.host.add_collaborator(repo, login, permission) {
                Ok(AddOutcome::Invited) => Outcome::Added { permission },
                Ok(AddOutcome::AlreadyCollaborator) => Outcome::Unchanged,
                Err(HostError::Auth(message)) => {
                    return Err(ReconcileError::Auth { message });
                }
                Err(err) => {
                    tracing::warn!(
                        project = %report.project,
                        repo = %repo,
                        login,
                        member = %member.id,
                        error = %err,
                        "failed to add collaborator"
                    );
                    Outcome::Failed {
                        op: MemberOp::Add,
                        reason: err.to_string(),
                    }
                }
            };
            report.push(MemberOutcome {
                login: login.to_string(),
                member: Some(member.id.clone()),
                outcome,
            });
        }
        Ok(())
    }

    fn remove_members(
        &self,
        repo: &RepoId,
        members: &[Member],
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        for member in members {
            let Some(login) = member.login() else {
                continue;
            };
            self.remove_login(repo, login, Some(member), report)?;
        }
        Ok(())
    }

    fn remove_login(
        &self,
        repo: &RepoId,
        login: &str,
        member: Option<&Member>,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let outcome = match self.host.remove_collaborator(repo, login) {
            Ok(RemoveOutcome::Removed) => Outcome::Removed,
            Ok(RemoveOutcome::NotACollaborator) => Outcome::Unchanged,
            Err(HostError::Auth(message)) => {
                return Err(ReconcileError::Auth { message });
            }
            Err(err) => {
                tracing::warn!(
                    project = %report.project,
                    repo = %repo,
                    login,
                    member = member.map(|m| m.id.as_str()),
                    error = %err,
                    "failed to remove collaborator"
                );
                Outcome::Failed {
                    op: MemberOp::Remove,
                    reason: err.to_string(),
                }
            }
        };
        report.push(MemberOutcome {
            login: login.to_string(),
            member: member.map(|m| m.id.clone()),
            outcome,
        });
        Ok(())
    }
}
