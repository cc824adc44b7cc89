use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::GeneratorOutput;

/// Errors raised while trying to run a generator.
///
/// These mean the generator could not be run at all. A generator that ran
/// and printed nothing is not an error at this layer.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to spawn generator process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Generator not found at path: {0}")]
    NotFound(String),
}

/// Process environment for a generator run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Working directory for the generator
    pub working_dir: PathBuf,
}

impl GeneratorConfig {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }
}

/// The five positional arguments handed to a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    pub head: String,
    pub base: String,
    /// `owner/repo`
    pub repo: String,
    /// List changes oldest first
    pub reverse: bool,
    /// Fetch refs before diffing
    pub fetch: bool,
}

impl GeneratorRequest {
    /// Positional arguments in generator order: head, base, repo, reverse, fetch
    pub fn args(&self) -> [String; 5] {
        [
            self.head.clone(),
            self.base.clone(),
            self.repo.clone(),
            self.reverse.to_string(),
            self.fetch.to_string(),
        ]
    }
}

/// Something that turns two references into changelog text
#[async_trait]
pub trait ChangelogGenerator: Send + Sync {
    /// Human-readable name of the generator
    fn name(&self) -> &str;

    /// Run the generator to completion and capture both output streams.
    ///
    /// A non-zero exit code is reported in the output, not as an error.
    async fn generate(
        &self,
        request: &GeneratorRequest,
        config: &GeneratorConfig,
    ) -> Result<GeneratorOutput, GeneratorError>;

    /// Whether the executable exists. Checked before every run.
    async fn is_available(&self) -> bool;

    /// Get the path to the generator executable
    fn binary_path(&self) -> &Path;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_args_order() {
        let request = GeneratorRequest {
            head: "abc123".to_string(),
            base: "v1.0.0".to_string(),
            repo: "octocat/hello-world".to_string(),
            reverse: false,
            fetch: true,
        };

        assert_eq!(
            request.args(),
            ["abc123", "v1.0.0", "octocat/hello-world", "false", "true"]
        );
    }
}
