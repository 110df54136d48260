//! Configuration: TOML file plus environment overrides.
//!
//! The host application decides where the file lives and passes the path.
//! Environment variables win over file values; override parsing is fed
//! through an injected lookup so it is testable without touching the
//! process environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("github token is not configured")]
    MissingToken,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Default owner for bare repository names. Bare references fail to
    /// resolve without it.
    pub owner: Option<String>,
    /// Bearer token. Usually supplied via environment, not the file.
    pub token: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            token: None,
            api_url: "https://api.github.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub stdout: bool,
    pub format: LogFormat,
    /// Extra filter directives, same syntax as the `LOG` env var.
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            format: LogFormat::Compact,
            filter: None,
        }
    }
}

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Defaults plus environment overrides, for hosts that run file-less.
pub fn from_env() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_env_overrides_from(config, |key| std::env::var(key).ok());
}

fn apply_env_overrides_from<F>(config: &mut Config, mut lookup: F)
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup("COLLABSYNC_GITHUB_OWNER") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.github.owner = Some(trimmed.to_string());
        }
    }

    let token = lookup("COLLABSYNC_GITHUB_TOKEN").or_else(|| lookup("GITHUB_TOKEN"));
    if let Some(raw) = token {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.github.token = Some(trimmed.to_string());
        }
    }

    if let Some(raw) = lookup("COLLABSYNC_API_URL") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.github.api_url = trimmed.to_string();
        }
    }

    if let Some(raw) = lookup("COLLABSYNC_TIMEOUT_SECS") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<u64>() {
                Ok(secs) => config.github.timeout_secs = secs,
                Err(err) => {
                    tracing::warn!("invalid COLLABSYNC_TIMEOUT_SECS, ignoring: {err}");
                }
            }
        }
    }

    if lookup("COLLABSYNC_NO_STDOUT_LOG").is_some() {
        config.logging.stdout = false;
    }
}
