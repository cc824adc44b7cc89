use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::{GeneratorConfig, GeneratorError, GeneratorOutput};

/// Utility for spawning generator processes
pub struct ProcessSpawner;

impl ProcessSpawner {
    /// Spawn a process, wait for it, and capture both streams in full
    pub async fn spawn(
        binary: &Path,
        args: &[String],
        config: &GeneratorConfig,
    ) -> Result<GeneratorOutput, GeneratorError> {
        let start = Instant::now();

        debug!(
            binary = %binary.display(),
            args = ?args,
            working_dir = %config.working_dir.display(),
            "Spawning generator process"
        );

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .current_dir(&config.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null()); // Non-interactive

        let output = cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => GeneratorError::NotFound(binary.display().to_string()),
            _ => GeneratorError::SpawnFailed(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);
        let duration = start.elapsed();

        trace!(stdout = %stdout, stderr = %stderr, "Generator streams");
        debug!(
            exit_code,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration_ms = duration.as_millis(),
            "Generator process completed"
        );

        Ok(GeneratorOutput::new(stdout, stderr, exit_code, duration))
    }
}
