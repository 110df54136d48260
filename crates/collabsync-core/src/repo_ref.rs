//! Repository reference resolution.
//!
//! Projects store a repository reference as either `name` or `owner/name`.
//! Every remote call goes through [`resolve`] exactly once so that an
//! un-normalized reference can never silently target the wrong repository.
//! A reference we cannot resolve is an error, never a guess.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fully resolved repository identity used for all remote calls.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `owner/name` form the remote API expects.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Debug for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoId({}/{})", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Reference could not be resolved into an `owner/name` identity.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RepoRefError {
    #[error("repository reference is empty")]
    Empty,

    #[error("malformed repository reference: {0:?}")]
    Malformed(String),

    #[error("no default owner configured for bare repository name {0:?}")]
    NoDefaultOwner(String),
}

/// Resolve a stored reference against an optionally configured default owner.
///
/// `owner/name` splits as written; a bare `name` combines with the default
/// owner. More than one `/`, an empty segment, or an empty reference fails.
pub fn resolve(reference: &str, default_owner: Option<&str>) -> Result<RepoId, RepoRefError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(RepoRefError::Empty);
    }

    match reference.matches('/').count() {
        0 => {
            let owner = default_owner.map(str::trim).filter(|o| !o.is_empty());
            match owner {
                Some(owner) => Ok(RepoId {
                    owner: owner.to_string(),
                    name: reference.to_string(),
                }),
                None => Err(RepoRefError::NoDefaultOwner(reference.to_string())),
            }
        }
        1 => {
            let (owner, name) = reference.split_once('/').expect("exactly one slash");
            let owner = owner.trim();
            let name = name.trim();
            if owner.is_empty() || name.is_empty() {
                return Err(RepoRefError::Malformed(reference.to_string()));
            }
            Ok(RepoId {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(RepoRefError::Malformed(reference.to_string())),
    }
}
