use std::sync::Arc;
use tracing::{debug, warn};

use changelog_generator::{ChangelogGenerator, GeneratorConfig, GeneratorError, GeneratorRequest};
use changelog_logging::{LogEvent, Logger};

use crate::pattern::filter_lines;
use crate::{ChangelogError, ResolvedRefs, RunConfig};

/// Runs the generator for two resolved references and post-processes its output
pub struct ChangelogPipeline<'a> {
    generator: &'a dyn ChangelogGenerator,
    logger: Arc<Logger>,
}

impl<'a> ChangelogPipeline<'a> {
    pub fn new(generator: &'a dyn ChangelogGenerator, logger: Arc<Logger>) -> Self {
        Self { generator, logger }
    }

    /// Produce the changelog text between `refs`.
    ///
    /// Presence of stdout is the only success criterion: the generator's
    /// exit code is logged but not trusted. Filtering everything away is
    /// still a success with empty text.
    pub async fn run(
        &self,
        refs: &ResolvedRefs,
        config: &RunConfig,
    ) -> Result<String, ChangelogError> {
        let request = GeneratorRequest {
            head: refs.head.clone(),
            base: refs.base.clone(),
            repo: config.repo.full_name(),
            reverse: config.reverse,
            fetch: config.fetch,
        };
        let generator_config = GeneratorConfig::new(config.working_dir.clone());

        if !self.generator.is_available().await {
            let path = self.generator.binary_path().display().to_string();
            warn!(generator = self.generator.name(), path = %path, "Generator not available");
            return Err(GeneratorError::NotFound(path).into());
        }

        self.logger.log(&LogEvent::GeneratorStarted {
            generator: self.generator.name().to_string(),
            head: refs.head.clone(),
            base: refs.base.clone(),
        });

        let output = self
            .generator
            .generate(&request, &generator_config)
            .await?;

        self.logger.log(&LogEvent::GeneratorCompleted {
            exit_code: output.exit_code,
            duration_secs: output.duration.as_secs_f64(),
            stdout_lines: output.stdout_lines(),
            stderr_lines: output.stderr_lines(),
        });

        if !output.has_stdout() {
            warn!(exit_code = output.exit_code, "Generator produced no output");
            return Err(ChangelogError::GeneratorProducedNoOutput {
                stderr: output.stderr,
            });
        }

        if !output.success() {
            debug!(
                exit_code = output.exit_code,
                "Generator exited non-zero but produced output"
            );
        }

        match config.match_commit {
            Some(ref pattern) => {
                let filtered = filter_lines(&output.stdout, pattern);
                self.logger.log(&LogEvent::ChangelogFiltered {
                    pattern: pattern.to_string(),
                    kept: filtered.kept,
                    dropped: filtered.dropped,
                });
                Ok(filtered.text)
            }
            None => Ok(output.stdout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use changelog_generator::GeneratorOutput;
    use changelog_logging::LogFormat;
    use changelog_registry::RepoId;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Generator returning a canned output and recording requests
    struct CannedGenerator {
        stdout: String,
        stderr: String,
        exit_code: i32,
        requests: Mutex<Vec<GeneratorRequest>>,
    }

    impl CannedGenerator {
        fn new(stdout: &str, stderr: &str, exit_code: i32) -> Self {
            Self {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChangelogGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(
            &self,
            request: &GeneratorRequest,
            _config: &GeneratorConfig,
        ) -> Result<GeneratorOutput, GeneratorError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(GeneratorOutput::new(
                self.stdout.clone(),
                self.stderr.clone(),
                self.exit_code,
                Duration::from_millis(5),
            ))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn binary_path(&self) -> &Path {
            Path::new("canned")
        }
    }

    struct BrokenGenerator;

    #[async_trait]
    impl ChangelogGenerator for BrokenGenerator {
        fn name(&self) -> &str {
            "broken"
        }

        async fn generate(
            &self,
            _request: &GeneratorRequest,
            _config: &GeneratorConfig,
        ) -> Result<GeneratorOutput, GeneratorError> {
            unreachable!("unavailable generator must not be invoked")
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn binary_path(&self) -> &Path {
            Path::new("/action/changelog.sh")
        }
    }

    fn logger() -> Arc<Logger> {
        Arc::new(Logger::with_writer(LogFormat::Compact, Box::new(std::io::sink())))
    }

    fn refs() -> ResolvedRefs {
        ResolvedRefs {
            head: "abc123".to_string(),
            base: "v1.0".to_string(),
        }
    }

    fn config() -> RunConfig {
        RunConfig::new(RepoId::new("octocat", "hello"), "abc123", PathBuf::from("."))
    }

    #[tokio::test]
    async fn test_passes_positional_arguments() {
        let generator = CannedGenerator::new("a", "", 0);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        pipeline
            .run(&refs(), &config().with_reverse(true).with_fetch(false))
            .await
            .unwrap();

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].args(),
            ["abc123", "v1.0", "octocat/hello", "true", "false"]
        );
    }

    #[tokio::test]
    async fn test_unfiltered_output_is_unchanged() {
        let generator = CannedGenerator::new("a\nb", "", 0);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        let text = pipeline.run(&refs(), &config()).await.unwrap();
        assert_eq!(text, "a\nb");
    }

    #[tokio::test]
    async fn test_filters_matching_lines() {
        let generator = CannedGenerator::new("fix: bug\nfeat: thing\nchore: cleanup\n", "", 0);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        let text = pipeline
            .run(&refs(), &config().with_match_commit("feat:*").unwrap())
            .await
            .unwrap();
        assert_eq!(text, "feat: thing");
    }

    #[tokio::test]
    async fn test_everything_filtered_is_still_success() {
        let generator = CannedGenerator::new("fix: bug\n", "", 0);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        let text = pipeline
            .run(&refs(), &config().with_match_commit("feat:*").unwrap())
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_empty_stdout_surfaces_stderr() {
        let generator = CannedGenerator::new("", "fatal: bad revision", 0);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        let err = pipeline.run(&refs(), &config()).await.unwrap_err();
        assert_eq!(err.to_string(), "fatal: bad revision");
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_stdout_wins_over_exit_code() {
        let generator = CannedGenerator::new("feat: thing", "warning", 128);
        let pipeline = ChangelogPipeline::new(&generator, logger());

        let text = pipeline.run(&refs(), &config()).await.unwrap();
        assert_eq!(text, "feat: thing");
    }

    #[tokio::test]
    async fn test_invocation_failure_is_wrapped() {
        let pipeline = ChangelogPipeline::new(&BrokenGenerator, logger());

        let err = pipeline.run(&refs(), &config()).await.unwrap_err();
        assert!(matches!(err, ChangelogError::GeneratorInvocationFailed(_)));
        assert!(err
            .to_string()
            .starts_with("Could not generate changelog between references because: "));
        assert_eq!(err.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_generator_names_its_path() {
        let pipeline = ChangelogPipeline::new(&BrokenGenerator, logger());

        let err = pipeline.run(&refs(), &config()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not generate changelog between references because: \
             Generator not found at path: /action/changelog.sh"
        );
    }
}
