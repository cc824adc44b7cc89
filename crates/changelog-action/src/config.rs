//! Action inputs.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables (the runner
//! upper-cases the input name and keeps dashes) or as CLI flags. Blank values
//! count as unset. Everything is converted once into a [`RunConfig`].

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use changelog_core::RunConfig;
use changelog_generator::DEFAULT_SCRIPT_NAME;
use changelog_registry::github::DEFAULT_API_BASE;
use changelog_registry::RepoId;

#[derive(Args, Debug, Clone, Default)]
pub struct ActionInputs {
    /// Head reference (default: the commit that triggered the run)
    #[arg(long, env = "INPUT_HEAD-REF")]
    pub head_ref: Option<String>,

    /// Base reference (default: latest release tag)
    #[arg(long, env = "INPUT_BASE-REF")]
    pub base_ref: Option<String>,

    /// Token for the release registry
    #[arg(long, env = "INPUT_MYTOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// List changes oldest first [default: false]
    #[arg(long, env = "INPUT_REVERSE")]
    pub reverse: Option<String>,

    /// Fetch references before generating [default: true]
    #[arg(long, env = "INPUT_FETCH")]
    pub fetch: Option<String>,

    /// Only consider releases whose tag matches this glob
    #[arg(long, env = "INPUT_MATCH-TAG")]
    pub match_tag: Option<String>,

    /// Only keep changelog lines matching this glob
    #[arg(long, env = "INPUT_MATCH-COMMIT")]
    pub match_commit: Option<String>,

    /// Commit the run was triggered on
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Registry API root
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Path to the changelog generator executable
    #[arg(long, env = "CHANGELOG_GENERATOR")]
    pub generator: Option<PathBuf>,
}

impl ActionInputs {
    pub fn to_run_config(&self, working_dir: PathBuf) -> Result<RunConfig> {
        let repo: RepoId = non_blank(&self.repository)
            .context("No repository given; set GITHUB_REPOSITORY or --repository")?
            .parse()
            .map_err(anyhow::Error::msg)?;

        let sha = non_blank(&self.sha).unwrap_or_default();

        let config = RunConfig::new(repo, sha, working_dir)
            .with_head_ref(non_blank(&self.head_ref).unwrap_or_default())
            .with_base_ref(non_blank(&self.base_ref).unwrap_or_default())
            .with_reverse(parse_boolish("reverse", non_blank(&self.reverse), false)?)
            .with_fetch(parse_boolish("fetch", non_blank(&self.fetch), true)?)
            .with_match_tag(non_blank(&self.match_tag).unwrap_or_default())?
            .with_match_commit(non_blank(&self.match_commit).unwrap_or_default())?;

        Ok(config)
    }

    /// Registry token: the `myToken` input, else `GITHUB_TOKEN`
    pub fn token(&self) -> Option<String> {
        non_blank(&self.token)
            .map(str::to_string)
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()))
    }

    pub fn api_url(&self) -> &str {
        non_blank(&self.api_url).unwrap_or(DEFAULT_API_BASE)
    }

    /// Generator path: explicit, else the script shipped with the action
    /// (`GITHUB_ACTION_PATH`), else the script next to this executable
    pub fn generator_path(&self) -> PathBuf {
        if let Some(ref path) = self.generator {
            if !path.as_os_str().is_empty() {
                return path.clone();
            }
        }

        if let Ok(dir) = std::env::var("GITHUB_ACTION_PATH") {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir).join(DEFAULT_SCRIPT_NAME);
            }
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_SCRIPT_NAME)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_NAME))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_boolish(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!(
            "Input '{}' must be a boolean (true or false), got '{}'",
            name,
            value
        ),
    }
}
