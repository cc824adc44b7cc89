//! GitHub Releases implementation of [`ReleaseRegistry`].
//!
//! Uses the REST endpoints:
//! - `GET /repos/{owner}/{repo}/releases/latest`
//! - `GET /repos/{owner}/{repo}/releases?per_page=100`
//!
//! GitHub answers `404` on `/releases/latest` when the repository has no
//! published release, so that status maps to `Ok(None)` instead of an error.
//! Listing fetches a single page and returns it exactly in API order (newest
//! first), drafts included.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{Release, ReleaseRegistry, RegistryError, RepoId};

/// Default GitHub API base URL
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT_VALUE: &str = "changelog-action";

const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub Releases client
pub struct GitHubRegistry {
    client: Client,
    token: Option<String>,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubRegistry")
            .field("has_token", &self.token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubRegistry {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.filter(|t| !t.is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at another API root (GitHub Enterprise, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| RegistryError::AuthFailed("Invalid token format".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    fn releases_url(&self, repo: &RepoId, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases{}",
            self.api_base, repo.owner, repo.repo, path
        )
    }

    async fn get(&self, url: &str) -> Result<Response, RegistryError> {
        debug!(url, "GitHub API request");
        self.client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: Response,
    ) -> Result<T, RegistryError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| RegistryError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    async fn error_from_response(response: Response, status: StatusCode) -> RegistryError {
        let rate_limit_exhausted = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
            == Some(0);

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::TOO_MANY_REQUESTS => RegistryError::RateLimited,
            StatusCode::FORBIDDEN if rate_limit_exhausted => RegistryError::RateLimited,
            StatusCode::UNAUTHORIZED => RegistryError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                RegistryError::AuthFailed(format!("Permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => RegistryError::NotFound(message),
            _ if status.is_server_error() => RegistryError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => RegistryError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl ReleaseRegistry for GitHubRegistry {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn latest_release(&self, repo: &RepoId) -> Result<Option<Release>, RegistryError> {
        let response = self.get(&self.releases_url(repo, "/latest")).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(repo = %repo, "No published release");
            return Ok(None);
        }

        let release: Release = Self::handle_response(response).await?;
        debug!(repo = %repo, tag = %release.tag_name, "Fetched latest release");
        Ok(Some(release))
    }

    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>, RegistryError> {
        let url = self.releases_url(repo, &format!("?per_page={}", PER_PAGE));
        let response = self.get(&url).await?;

        let releases: Vec<Release> = Self::handle_response(response).await?;
        debug!(repo = %repo, count = releases.len(), "Listed releases");

        Ok(releases)
    }
}
