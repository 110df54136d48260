//! GitHub REST implementation of the collaborator host.
//!
//! Blocking `ureq` client against the collaborators endpoints:
//! - `GET  /repos/{owner}/{repo}/collaborators` (paginated)
//! - `PUT  /repos/{owner}/{repo}/collaborators/{login}` with a permission body
//! - `DELETE /repos/{owner}/{repo}/collaborators/{login}`
//!
//! Idempotency lives in the status codes: a PUT for an existing collaborator
//! answers 204, a DELETE for a non-collaborator answers 404. Both map to
//! no-op outcomes, not errors.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GithubConfig};
use crate::core::{Permission, RepoId};
use crate::host::{AddOutcome, CollaboratorHost, HostError, RemoveOutcome};

const USER_AGENT: &str = "collabsync";
const API_VERSION: &str = "2022-11-28";
const PER_PAGE: usize = 100;

/// GitHub-backed [`CollaboratorHost`].
///
/// Holds only the agent and credentials; no reconciliation state survives a
/// call.
pub struct GitHubHost {
    agent: ureq::Agent,
    api_url: String,
    token: String,
}

impl GitHubHost {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Build a host from configuration. A missing token is a configuration
    /// error surfaced here, before any remote call.
    pub fn from_config(config: &GithubConfig) -> Result<Self, ConfigError> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Ok(Self::new(
            token,
            config.api_url.as_str(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn collaborators_url(&self, repo: &RepoId, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/collaborators?per_page={}&page={}",
            self.api_url,
            repo.owner(),
            repo.name(),
            PER_PAGE,
            page
        )
    }

    fn collaborator_url(&self, repo: &RepoId, login: &str) -> String {
        format!(
            "{}/repos/{}/{}/collaborators/{}",
            self.api_url,
            repo.owner(),
            repo.name(),
            login
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
            .set("User-Agent", USER_AGENT)
    }
}

impl CollaboratorHost for GitHubHost {
    fn list_collaborators(&self, repo: &RepoId) -> Result<BTreeSet<String>, HostError> {
        let mut logins = BTreeSet::new();
        for page in 1.. {
            let url = self.collaborators_url(repo, page);
            let resp = self.request("GET", &url).call().map_err(host_error)?;
            let body = resp
                .into_string()
                .map_err(|e| HostError::Transport(e.to_string()))?;
            let rows = parse_collaborator_page(&body)?;
            let count = rows.len();
            logins.extend(rows);
            if count < PER_PAGE {
                break;
            }
        }
        Ok(logins)
    }

    fn add_collaborator(
        &self,
        repo: &RepoId,
        login: &str,
        permission: Permission,
    ) -> Result<AddOutcome, HostError> {
        let url = self.collaborator_url(repo, login);
        let body = serde_json::to_string(&PermissionBody {
            permission: permission.as_str(),
        })?;
        let resp = self
            .request("PUT", &url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(host_error)?;
        // 201: invitation created. 204: already a collaborator.
        match resp.status() {
            204 => Ok(AddOutcome::AlreadyCollaborator),
            _ => Ok(AddOutcome::Invited),
        }
    }

    fn remove_collaborator(&self, repo: &RepoId, login: &str) -> Result<RemoveOutcome, HostError> {
        let url = self.collaborator_url(repo, login);
        match self.request("DELETE", &url).call() {
            Ok(_) => Ok(RemoveOutcome::Removed),
            Err(ureq::Error::Status(404, _)) => Ok(RemoveOutcome::NotACollaborator),
            Err(err) => Err(host_error(err)),
        }
    }
}

#[derive(Serialize)]
struct PermissionBody<'a> {
    permission: &'a str,
}

#[derive(Deserialize)]
struct CollaboratorRow {
    login: String,
}

fn parse_collaborator_page(body: &str) -> Result<Vec<String>, HostError> {
    let rows: Vec<CollaboratorRow> = serde_json::from_str(body)?;
    Ok(rows.into_iter().map(|r| r.login).collect())
}

fn host_error(err: ureq::Error) -> HostError {
    match err {
        ureq::Error::Status(401, resp) => HostError::Auth(status_message(resp)),
        ureq::Error::Status(status, resp) => HostError::Api {
            status,
            message: status_message(resp),
        },
        ureq::Error::Transport(t) => HostError::Transport(t.to_string()),
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw body text.
fn status_message(resp: ureq::Response) -> String {
    #[derive(Deserialize)]
    struct ApiMessage {
        message: String,
    }

    let body = resp.into_string().unwrap_or_default();
    match serde_json::from_str::<ApiMessage>(&body) {
        Ok(api) => api.message,
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve;

    fn host() -> GitHubHost {
        GitHubHost::new("token", "https://api.github.com/", Duration::from_secs(1))
    }

    #[test]
    fn urls_target_the_resolved_repository() {
        let repo = resolve("org/proj1", None).unwrap();
        let host = host();
        assert_eq!(
            host.collaborators_url(&repo, 2),
            "https://api.github.com/repos/org/proj1/collaborators?per_page=100&page=2"
        );
        assert_eq!(
            host.collaborator_url(&repo, "alice"),
            "https://api.github.com/repos/org/proj1/collaborators/alice"
        );
    }

    #[test]
    fn trailing_slash_in_api_url_is_dropped() {
        let host = GitHubHost::new("t", "https://ghe.example.com/api/v3/", Duration::from_secs(1));
        assert_eq!(host.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn collaborator_page_parses_logins() {
        let body = r#"[{"login":"alice","id":1},{"login":"bob","id":2}]"#;
        assert_eq!(parse_collaborator_page(body).unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn malformed_page_is_a_decode_error() {
        assert!(matches!(
            parse_collaborator_page("not json"),
            Err(HostError::Decode(_))
        ));
    }

    #[test]
    fn permission_body_uses_wire_names() {
        let body = serde_json::to_string(&PermissionBody {
            permission: Permission::Push.as_str(),
        })
        .unwrap();
        assert_eq!(body, r#"{"permission":"push"}"#);
    }

    #[test]
    fn missing_token_fails_construction() {
        let config = GithubConfig {
            token: Some("   ".into()),
            ..GithubConfig::default()
        };
        assert!(matches!(
            GitHubHost::from_config(&config),
            Err(ConfigError::MissingToken)
        ));
    }
}
