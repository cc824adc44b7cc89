use serde::{Deserialize, Serialize};

use crate::ChangelogError;

/// The terminal outcome of a run. Exactly one variant per run; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangelogResult {
    /// Changelog text, possibly empty after filtering
    Success { text: String },
    /// Failure message and the process exit code it implies
    Failure { error_text: String, exit_code: i32 },
}

impl ChangelogResult {
    pub fn success(text: String) -> Self {
        Self::Success { text }
    }

    pub fn failure(error: &ChangelogError) -> Self {
        Self::Failure {
            error_text: error.to_string(),
            exit_code: error.exit_code(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error_text, .. } => Some(error_text),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Failure { exit_code, .. } => *exit_code,
        }
    }
}
