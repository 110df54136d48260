//! Team roster snapshots and roster deltas.
//!
//! A roster is a set of members unique by internal identity. Iteration is
//! ordered by member id so remote calls and their logs are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::identity::{MemberId, ProjectId};
use crate::member::Member;

/// Immutable set of team members, unique by `MemberId`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Member>", into = "Vec<Member>")]
pub struct Roster {
    members: BTreeMap<MemberId, Member>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, replacing any previous snapshot with the same id.
    pub fn insert(&mut self, member: Member) {
        self.members.insert(member.id.clone(), member);
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.members.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Desired membership: the non-blank GitHub logins of this roster.
    pub fn logins(&self) -> BTreeSet<String> {
        self.members
            .values()
            .filter_map(|m| m.login())
            .map(String::from)
            .collect()
    }

    /// Set difference by member identity: who joined and who left relative
    /// to `old`.
    pub fn delta_since(&self, old: &Roster) -> RosterDelta {
        let added = self
            .members
            .values()
            .filter(|m| !old.contains(&m.id))
            .cloned()
            .collect();
        let removed = old
            .members
            .values()
            .filter(|m| !self.contains(&m.id))
            .cloned()
            .collect();
        RosterDelta { added, removed }
    }
}

impl FromIterator<Member> for Roster {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for member in iter {
            roster.insert(member);
        }
        roster
    }
}

impl From<Vec<Member>> for Roster {
    fn from(members: Vec<Member>) -> Self {
        members.into_iter().collect()
    }
}

impl From<Roster> for Vec<Member> {
    fn from(roster: Roster) -> Self {
        roster.members.into_values().collect()
    }
}

/// Result of diffing two rosters, both sides in member-id order.
#[derive(Debug, Clone, Default)]
pub struct RosterDelta {
    pub added: Vec<Member>,
    pub removed: Vec<Member>,
}

impl RosterDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Everything the engine needs to know about one project, as a value.
///
/// Built by the calling layer from its store; the engine never reaches back
/// into persistence. `repo` holds the stored reference verbatim (`name` or
/// `owner/name`), unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: ProjectId,
    pub repo: Option<String>,
    pub team: Roster,
}

impl ProjectSnapshot {
    pub fn new(id: ProjectId, repo: Option<String>, team: Roster) -> Self {
        Self { id, repo, team }
    }

    /// The stored repository reference, or `None` when unset or blank.
    pub fn repo_reference(&self) -> Option<&str> {
        self.repo
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Role;

    fn member(id: &str, login: Option<&str>) -> Member {
        Member::new(
            MemberId::new(id).unwrap(),
            Role::Dev,
            login.map(String::from),
        )
    }

    fn roster(ids: &[&str]) -> Roster {
        ids.iter().map(|id| member(id, Some(id))).collect()
    }

    #[test]
    fn delta_sides_are_disjoint_and_cover_the_union() {
        let old = roster(&["a", "b", "c"]);
        let new = roster(&["b", "c", "d", "e"]);
        let delta = new.delta_since(&old);

        let added: BTreeSet<_> = delta.added.iter().map(|m| m.id.clone()).collect();
        let removed: BTreeSet<_> = delta.removed.iter().map(|m| m.id.clone()).collect();
        assert!(added.is_disjoint(&removed));

        let shared: BTreeSet<_> = old
            .iter()
            .filter(|m| new.contains(&m.id))
            .map(|m| m.id.clone())
            .collect();
        let union: BTreeSet<_> = old.iter().chain(new.iter()).map(|m| m.id.clone()).collect();
        let rebuilt: BTreeSet<_> = added
            .iter()
            .chain(removed.iter())
            .chain(shared.iter())
            .cloned()
            .collect();
        assert_eq!(rebuilt, union);
    }

    #[test]
    fn delta_of_identical_rosters_is_empty() {
        let team = roster(&["a", "b"]);
        assert!(team.delta_since(&team.clone()).is_empty());
    }

    #[test]
    fn logins_skip_members_without_a_usable_login() {
        let team: Roster = [
            member("a", Some("alice")),
            member("b", None),
            member("c", Some("   ")),
        ]
        .into_iter()
        .collect();
        let logins = team.logins();
        assert_eq!(logins.into_iter().collect::<Vec<_>>(), vec!["alice"]);
    }

    #[test]
    fn insert_replaces_by_identity() {
        let mut team = Roster::new();
        team.insert(member("a", Some("old-login")));
        team.insert(member("a", Some("new-login")));
        assert_eq!(team.len(), 1);
        assert_eq!(team.iter().next().unwrap().login(), Some("new-login"));
    }

    #[test]
    fn blank_repo_reference_reads_as_unlinked() {
        let id = ProjectId::new("p-1").unwrap();
        let unset = ProjectSnapshot::new(id.clone(), None, Roster::new());
        let blank = ProjectSnapshot::new(id, Some("  ".into()), Roster::new());
        assert_eq!(unset.repo_reference(), None);
        assert_eq!(blank.repo_reference(), None);
    }
}
