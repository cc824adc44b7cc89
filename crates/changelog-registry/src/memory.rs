//! In-memory registry for deterministic testing.
//!
//! Releases are returned in insertion order. Every call is recorded so tests
//! can assert how many registry round-trips a run made.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{Release, ReleaseRegistry, RegistryError, RepoId};

/// Recorded registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOperation {
    LatestRelease { repo: RepoId },
    ListReleases { repo: RepoId },
}

#[derive(Debug, Default)]
struct Inner {
    releases: Vec<Release>,
    fail_with: Option<RegistryError>,
    operations: Vec<RegistryOperation>,
}

/// Thread-safe via internal `Arc<Mutex<...>>`; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding releases with the given tags, most recent first
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_releases(tags.into_iter().map(Release::new).collect())
    }

    pub fn with_releases(releases: Vec<Release>) -> Self {
        let registry = Self::new();
        registry.lock().releases = releases;
        registry
    }

    /// Make every subsequent call fail with `error`
    pub fn fail_with(&self, error: RegistryError) {
        self.lock().fail_with = Some(error);
    }

    pub fn operations(&self) -> Vec<RegistryOperation> {
        self.lock().operations.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().operations.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-call
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: RegistryOperation) -> Result<(), RegistryError> {
        let mut inner = self.lock();
        inner.operations.push(op);
        match inner.fail_with {
            Some(ref err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReleaseRegistry for InMemoryRegistry {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn latest_release(&self, repo: &RepoId) -> Result<Option<Release>, RegistryError> {
        self.record(RegistryOperation::LatestRelease { repo: repo.clone() })?;
        Ok(self.lock().releases.first().cloned())
    }

    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>, RegistryError> {
        self.record(RegistryOperation::ListReleases { repo: repo.clone() })?;
        Ok(self.lock().releases.clone())
    }
}
