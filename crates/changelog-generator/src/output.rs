use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output captured from a generator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOutput {
    /// Full stdout, unmodified
    pub stdout: String,
    /// Full stderr, unmodified
    pub stderr: String,
    /// Exit code from the process (-1 if killed by a signal)
    pub exit_code: i32,
    /// Duration of execution
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl GeneratorOutput {
    pub fn new(stdout: String, stderr: String, exit_code: i32, duration: Duration) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            duration,
        }
    }

    /// Check if the generator exited successfully
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether anything was written to stdout
    pub fn has_stdout(&self) -> bool {
        !self.stdout.is_empty()
    }

    /// Count lines in stdout
    pub fn stdout_lines(&self) -> usize {
        self.stdout.lines().count()
    }

    /// Count lines in stderr
    pub fn stderr_lines(&self) -> usize {
        self.stderr.lines().count()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
