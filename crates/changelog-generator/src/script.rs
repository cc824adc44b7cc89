use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    ChangelogGenerator, GeneratorConfig, GeneratorError, GeneratorOutput, GeneratorRequest,
    ProcessSpawner,
};

/// File name of the generator script shipped alongside the action
pub const DEFAULT_SCRIPT_NAME: &str = "changelog.sh";

/// Generator backed by an executable script taking the five positional arguments
pub struct ScriptGenerator {
    binary_path: PathBuf,
}

impl ScriptGenerator {
    pub fn with_binary_path(path: PathBuf) -> Self {
        Self { binary_path: path }
    }
}

#[async_trait]
impl ChangelogGenerator for ScriptGenerator {
    fn name(&self) -> &str {
        "changelog script"
    }

    fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.binary_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn generate(
        &self,
        request: &GeneratorRequest,
        config: &GeneratorConfig,
    ) -> Result<GeneratorOutput, GeneratorError> {
        debug!(
            generator = self.name(),
            head = %request.head,
            base = %request.base,
            repo = %request.repo,
            "Running generator"
        );

        let args = request.args();
        ProcessSpawner::spawn(&self.binary_path, &args, config).await
    }
}
