//! Per-member reconciliation outcomes.
//!
//! One reconciliation pass accumulates a [`ReconcileReport`]: an ordered
//! list of what happened to each member, plus a batch id for log
//! correlation. Reports are returned to the caller, never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{MemberId, ProjectId};
use crate::permission::Permission;

/// Correlates every log line of one reconciliation pass.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which mutating operation a failure belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOp {
    Add,
    Remove,
}

impl MemberOp {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberOp::Add => "add",
            MemberOp::Remove => "remove",
        }
    }
}

/// What happened to one member during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Outcome {
    /// Collaborator added (or invited) with this permission.
    Added { permission: Permission },
    /// Collaborator removed.
    Removed,
    /// Already in the desired state; no mutation was issued or needed.
    Unchanged,
    /// The operation for this member failed; the batch continued.
    Failed { op: MemberOp, reason: String },
}

/// One member's result within a pass.
///
/// `member` is the internal identity when known; removals discovered only
/// on the remote side carry just the login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub login: String,
    pub member: Option<MemberId>,
    pub outcome: Outcome,
}

/// Accumulated result of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub batch: BatchId,
    pub project: ProjectId,
    /// Resolved `owner/name`, or `None` for the unlinked-project no-op.
    pub repo: Option<String>,
    pub outcomes: Vec<MemberOutcome>,
}

impl ReconcileReport {
    pub fn new(project: ProjectId, repo: Option<String>) -> Self {
        Self {
            batch: BatchId::new(),
            project,
            repo,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: MemberOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn added(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Added { .. }))
    }

    pub fn removed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Removed))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// True when the pass issued no mutation and recorded no failure.
    pub fn is_noop(&self) -> bool {
        self.added() == 0 && self.removed() == 0 && self.failed() == 0
    }

    /// Count-based one-liner for logs.
    ///
    /// Format:
    /// - `collab(org/proj1): +2 added, -1 removed`
    /// - `collab(org/proj1): ~1 unchanged, !1 failed`
    /// - `collab(org/proj1): no changes`
    pub fn summary_line(&self) -> String {
        let repo = self.repo.as_deref().unwrap_or("unlinked");
        let mut parts = Vec::new();
        if self.added() > 0 {
            parts.push(format!("+{} added", self.added()));
        }
        if self.removed() > 0 {
            parts.push(format!("-{} removed", self.removed()));
        }
        if self.unchanged() > 0 {
            parts.push(format!("~{} unchanged", self.unchanged()));
        }
        if self.failed() > 0 {
            parts.push(format!("!{} failed", self.failed()));
        }
        if parts.is_empty() {
            format!("collab({repo}): no changes")
        } else {
            format!("collab({repo}): {}", parts.join(", "))
        }
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}
