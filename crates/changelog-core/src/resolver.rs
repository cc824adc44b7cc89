use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use changelog_registry::ReleaseRegistry;

use crate::{ChangelogError, RunConfig};

/// The two references a changelog is generated between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRefs {
    pub head: String,
    pub base: String,
}

impl ResolvedRefs {
    /// Both references must be non-empty
    pub fn new(head: String, base: String) -> Result<Self, ChangelogError> {
        if head.is_empty() || base.is_empty() {
            return Err(ChangelogError::InvalidReferenceInput);
        }
        Ok(Self { head, base })
    }
}

/// Determines the head and base references for a run
pub struct ReferenceResolver<'a> {
    registry: &'a dyn ReleaseRegistry,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a dyn ReleaseRegistry) -> Self {
        Self { registry }
    }

    /// Resolve both references.
    ///
    /// - head: `head_ref`, or the current commit when empty
    /// - base: `base_ref`; when empty, the latest release tag, or with a
    ///   tag pattern, the first listed release whose tag matches
    ///
    /// Makes at most one registry call and never retries it.
    pub async fn resolve(&self, config: &RunConfig) -> Result<ResolvedRefs, ChangelogError> {
        let head = self.head(config);
        let base = self.base(config).await?;
        ResolvedRefs::new(head, base)
    }

    /// `head_ref`, or the current commit when empty. May still be empty.
    pub fn head(&self, config: &RunConfig) -> String {
        if config.head_ref.is_empty() {
            debug!(commit = %config.current_commit, "No head-ref given, using current commit");
            config.current_commit.clone()
        } else {
            config.head_ref.clone()
        }
    }

    /// `base_ref`, or a tag looked up in the registry when empty
    pub async fn base(&self, config: &RunConfig) -> Result<String, ChangelogError> {
        if config.base_ref.is_empty() {
            self.base_from_releases(config).await
        } else {
            Ok(config.base_ref.clone())
        }
    }

    async fn base_from_releases(&self, config: &RunConfig) -> Result<String, ChangelogError> {
        let repo = &config.repo;

        match config.match_tag {
            None => {
                let release = self.registry.latest_release(repo).await?.ok_or_else(|| {
                    ChangelogError::NoReleasesFound {
                        owner: repo.owner.clone(),
                        repo: repo.repo.clone(),
                    }
                })?;

                info!(tag = %release.tag_name, registry = self.registry.name(), "Using latest release as base");
                Ok(release.tag_name)
            }
            Some(ref pattern) => {
                let releases = self.registry.list_releases(repo).await?;
                debug!(count = releases.len(), pattern = %pattern, "Matching release tags");

                let release = releases
                    .into_iter()
                    .find(|r| pattern.matches(&r.tag_name))
                    .ok_or_else(|| ChangelogError::NoMatchingReleaseFound {
                        owner: repo.owner.clone(),
                        repo: repo.repo.clone(),
                        pattern: pattern.to_string(),
                    })?;

                info!(tag = %release.tag_name, pattern = %pattern, "Using matching release as base");
                Ok(release.tag_name)
            }
        }
    }
}
