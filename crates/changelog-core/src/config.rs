use std::path::PathBuf;

use changelog_registry::RepoId;

use crate::{ChangelogError, MatchPattern};

/// Everything a run needs, built once at the boundary and passed by value.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Requested head reference (empty = current commit)
    pub head_ref: String,
    /// Requested base reference (empty = resolve from releases)
    pub base_ref: String,
    /// Commit the run was triggered on
    pub current_commit: String,
    /// Repository the releases and changelog belong to
    pub repo: RepoId,
    /// Ask the generator for oldest-first order
    pub reverse: bool,
    /// Ask the generator to fetch refs before diffing
    pub fetch: bool,
    /// Restrict base resolution to releases whose tag matches
    pub match_tag: Option<MatchPattern>,
    /// Keep only changelog lines that match
    pub match_commit: Option<MatchPattern>,
    /// Working directory for the generator
    pub working_dir: PathBuf,
}

impl RunConfig {
    pub fn new(repo: RepoId, current_commit: impl Into<String>, working_dir: PathBuf) -> Self {
        Self {
            head_ref: String::new(),
            base_ref: String::new(),
            current_commit: current_commit.into().trim().to_string(),
            repo,
            reverse: false,
            fetch: true,
            match_tag: None,
            match_commit: None,
            working_dir,
        }
    }

    pub fn with_head_ref(mut self, head_ref: &str) -> Self {
        self.head_ref = head_ref.trim().to_string();
        self
    }

    pub fn with_base_ref(mut self, base_ref: &str) -> Self {
        self.base_ref = base_ref.trim().to_string();
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Set the tag pattern; blank means no filtering
    pub fn with_match_tag(mut self, pattern: &str) -> Result<Self, ChangelogError> {
        self.match_tag = compile(pattern)?;
        Ok(self)
    }

    /// Set the changelog line pattern; blank means no filtering
    pub fn with_match_commit(mut self, pattern: &str) -> Result<Self, ChangelogError> {
        self.match_commit = compile(pattern)?;
        Ok(self)
    }
}

fn compile(pattern: &str) -> Result<Option<MatchPattern>, ChangelogError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        Ok(None)
    } else {
        MatchPattern::new(pattern).map(Some)
    }
}
