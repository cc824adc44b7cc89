use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from release registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("network error: {0}")]
    NetworkError(String),
}

/// Repository identifier in `owner/repo` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// `owner/repo`, as passed to the changelog generator
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl std::str::FromStr for RepoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoId::new(owner, repo))
            }
            _ => Err(format!("Invalid repository '{}', expected owner/repo", s)),
        }
    }
}

/// A published release. Read-only; the registry owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Release {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            name: None,
            draft: false,
            prerelease: false,
            published_at: None,
        }
    }
}

/// Source of published releases for a repository.
///
/// Implementations must surface network and auth failures as errors
/// rather than empty results. `latest_release` returning `Ok(None)` means
/// the repository has no published release.
#[async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Human-readable name of the registry (e.g., "GitHub")
    fn name(&self) -> &str;

    /// The most recent published release, if any
    async fn latest_release(&self, repo: &RepoId) -> Result<Option<Release>, RegistryError>;

    /// Releases in registry order (most recent first)
    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_id() {
        let id: RepoId = "octocat/hello-world".parse().unwrap();
        assert_eq!(id.owner, "octocat");
        assert_eq!(id.repo, "hello-world");
        assert_eq!(id.to_string(), "octocat/hello-world");
        assert_eq!(id.full_name(), "octocat/hello-world");
    }

    #[test]
    fn test_parse_repo_id_rejects_malformed() {
        assert!("octocat".parse::<RepoId>().is_err());
        assert!("/repo".parse::<RepoId>().is_err());
        assert!("owner/".parse::<RepoId>().is_err());
        assert!("a/b/c".parse::<RepoId>().is_err());
        assert!("".parse::<RepoId>().is_err());
    }

    #[test]
    fn test_release_deserializes_with_missing_fields() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1.0.0"}"#).unwrap();
        assert_eq!(release, Release::new("v1.0.0"));
    }
}
