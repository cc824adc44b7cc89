use thiserror::Error;

use changelog_generator::GeneratorError;
use changelog_registry::RegistryError;

#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("There are no releases on {owner}/{repo}. Tags are not releases.")]
    NoReleasesFound { owner: String, repo: String },

    #[error(
        "There are no releases on {owner}/{repo} with match tag {pattern}. Tags are not releases."
    )]
    NoMatchingReleaseFound {
        owner: String,
        repo: String,
        pattern: String,
    },

    #[error(
        "Branch names must contain only numbers, strings, underscores, periods, forward slashes, and dashes."
    )]
    InvalidReferenceInput,

    /// The generator ran but wrote nothing to stdout; stderr is the reason
    #[error("{stderr}")]
    GeneratorProducedNoOutput { stderr: String },

    #[error("Could not generate changelog between references because: {0}")]
    GeneratorInvocationFailed(#[from] GeneratorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ChangelogError {
    /// Process exit code for a run that ended with this error.
    ///
    /// A generator that could not even be started exits 0 so it stays
    /// distinguishable from one that ran and produced nothing.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::GeneratorInvocationFailed(_) => 0,
            _ => 1,
        }
    }
}
