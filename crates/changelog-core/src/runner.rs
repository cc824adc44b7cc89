use std::sync::Arc;
use tracing::warn;

use changelog_generator::ChangelogGenerator;
use changelog_logging::{LogEvent, Logger};
use changelog_registry::ReleaseRegistry;

use crate::{
    ChangelogError, ChangelogPipeline, ChangelogResult, ReferenceResolver, ResolvedRefs, RunConfig,
};

/// Orchestrates a single run: resolve references, then generate the changelog
pub struct ChangelogRunner<'a> {
    registry: &'a dyn ReleaseRegistry,
    generator: &'a dyn ChangelogGenerator,
    logger: Arc<Logger>,
}

impl<'a> ChangelogRunner<'a> {
    pub fn new(
        registry: &'a dyn ReleaseRegistry,
        generator: &'a dyn ChangelogGenerator,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            registry,
            generator,
            logger,
        }
    }

    /// Run to completion. Every failure is converted into
    /// `ChangelogResult::Failure` here and logged once.
    pub async fn run(&self, config: RunConfig) -> ChangelogResult {
        self.logger.log(&LogEvent::RunStarted {
            repo: config.repo.full_name(),
            working_dir: config.working_dir.clone(),
        });

        match self.try_run(&config).await {
            Ok(text) => ChangelogResult::success(text),
            Err(e) => {
                warn!(error = %e, "Changelog run failed");
                let result = ChangelogResult::failure(&e);
                self.logger.log(&LogEvent::RunFailed {
                    error: e.to_string(),
                    exit_code: result.exit_code(),
                });
                result
            }
        }
    }

    async fn try_run(&self, config: &RunConfig) -> Result<String, ChangelogError> {
        let resolver = ReferenceResolver::new(self.registry);
        let head = resolver.head(config);

        // References are echoed even when the base lookup fails
        let base = match resolver.base(config).await {
            Ok(base) => base,
            Err(e) => {
                self.logger.log(&LogEvent::ReferencesResolved {
                    head,
                    base: String::new(),
                });
                return Err(e);
            }
        };

        self.logger.log(&LogEvent::ReferencesResolved {
            head: head.clone(),
            base: base.clone(),
        });

        let refs = ResolvedRefs::new(head, base)?;

        let text = ChangelogPipeline::new(self.generator, self.logger.clone())
            .run(&refs, config)
            .await?;

        self.logger.log(&LogEvent::ChangelogGenerated {
            base: refs.base,
            head: refs.head,
            changelog: text.clone(),
        });

        Ok(text)
    }
}
