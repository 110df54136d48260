//! Test doubles and builders for engine scenarios.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use collabsync::{
    AddOutcome, CollaboratorHost, HostError, Member, MemberId, Permission, ProjectId,
    ProjectSnapshot, RemoveOutcome, RepoId, Role, Roster,
};

/// One recorded host call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        repo: String,
    },
    Add {
        repo: String,
        login: String,
        permission: Permission,
    },
    Remove {
        repo: String,
        login: String,
    },
}

/// Injectable failure for a scripted call.
#[derive(Debug, Copy, Clone)]
pub enum Fault {
    Auth,
    Api(u16),
    Transport,
}

impl Fault {
    fn to_error(self) -> HostError {
        match self {
            Fault::Auth => HostError::Auth("bad credentials".into()),
            Fault::Api(status) => HostError::Api {
                status,
                message: "scripted failure".into(),
            },
            Fault::Transport => HostError::Transport("connection reset".into()),
        }
    }
}

/// In-memory collaborator host.
///
/// Mutations apply to the collaborator set, so a second pass observes the
/// first pass's effects - the same way the real host behaves.
#[derive(Default)]
pub struct ScriptedHost {
    collaborators: RefCell<BTreeSet<String>>,
    calls: RefCell<Vec<Call>>,
    add_faults: BTreeMap<String, Fault>,
    remove_faults: BTreeMap<String, Fault>,
    list_fault: Option<Fault>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collaborators(logins: &[&str]) -> Self {
        let host = Self::new();
        *host.collaborators.borrow_mut() = logins.iter().map(|l| l.to_string()).collect();
        host
    }

    pub fn fail_add(mut self, login: &str, fault: Fault) -> Self {
        self.add_faults.insert(login.to_string(), fault);
        self
    }

    pub fn fail_remove(mut self, login: &str, fault: Fault) -> Self {
        self.remove_faults.insert(login.to_string(), fault);
        self
    }

    pub fn fail_list(mut self, fault: Fault) -> Self {
        self.list_fault = Some(fault);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .count()
    }

    pub fn collaborators(&self) -> BTreeSet<String> {
        self.collaborators.borrow().clone()
    }
}

impl CollaboratorHost for &ScriptedHost {
    fn list_collaborators(&self, repo: &RepoId) -> Result<BTreeSet<String>, HostError> {
        self.calls.borrow_mut().push(Call::List {
            repo: repo.full_name(),
        });
        if let Some(fault) = self.list_fault {
            return Err(fault.to_error());
        }
        Ok(self.collaborators.borrow().clone())
    }

    fn add_collaborator(
        &self,
        repo: &RepoId,
        login: &str,
        permission: Permission,
    ) -> Result<AddOutcome, HostError> {
        self.calls.borrow_mut().push(Call::Add {
            repo: repo.full_name(),
            login: login.to_string(),
            permission,
        });
        if let Some(fault) = self.add_faults.get(login) {
            return Err(fault.to_error());
        }
        if self.collaborators.borrow_mut().insert(login.to_string()) {
            Ok(AddOutcome::Invited)
        } else {
            Ok(AddOutcome::AlreadyCollaborator)
        }
    }

    fn remove_collaborator(&self, repo: &RepoId, login: &str) -> Result<RemoveOutcome, HostError> {
        self.calls.borrow_mut().push(Call::Remove {
            repo: repo.full_name(),
            login: login.to_string(),
        });
        if let Some(fault) = self.remove_faults.get(login) {
            return Err(fault.to_error());
        }
        if self.collaborators.borrow_mut().remove(login) {
            Ok(RemoveOutcome::Removed)
        } else {
            Ok(RemoveOutcome::NotACollaborator)
        }
    }
}

pub fn member(id: &str, role: Role, login: Option<&str>) -> Member {
    Member::new(MemberId::new(id).unwrap(), role, login.map(String::from))
}

pub fn roster(members: impl IntoIterator<Item = Member>) -> Roster {
    members.into_iter().collect()
}

pub fn project(id: &str, repo: Option<&str>, team: Roster) -> ProjectSnapshot {
    ProjectSnapshot::new(
        ProjectId::new(id).unwrap(),
        repo.map(String::from),
        team,
    )
}
