mod config;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use changelog_core::ChangelogRunner;
use changelog_generator::ScriptGenerator;
use changelog_logging::{init_tracing, LogFormat, Logger};
use changelog_registry::GitHubRegistry;

use crate::config::ActionInputs;
use crate::output::WorkflowCommands;

#[derive(Parser, Debug)]
#[command(
    name = "changelog-action",
    about = "Generate a changelog between two references as a CI step output",
    version
)]
struct Cli {
    #[command(flatten)]
    inputs: ActionInputs,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Diagnostic log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the final result as JSON
    #[arg(long)]
    json_output: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_format: LogFormat = cli.log_format.into();
    init_tracing(&cli.log_level, log_format);

    let commands = WorkflowCommands::from_env();

    let code = match run(&cli, log_format, &commands).await {
        Ok(code) => code,
        Err(e) => {
            commands.set_failed(&format!("{:#}", e));
            1
        }
    };

    std::process::exit(code);
}

async fn run(cli: &Cli, log_format: LogFormat, commands: &WorkflowCommands) -> Result<i32> {
    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = cli.inputs.to_run_config(working_dir)?;

    let registry = GitHubRegistry::new(cli.inputs.token()).with_api_base(cli.inputs.api_url());
    let generator = ScriptGenerator::with_binary_path(cli.inputs.generator_path());

    let logger = Arc::new(Logger::new(log_format));
    let runner = ChangelogRunner::new(&registry, &generator, logger);

    let result = runner.run(config).await;

    if cli.json_output {
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    }

    match result.text() {
        Some(text) => commands.set_output("changelog", text)?,
        None => commands.set_failed(result.error_text().unwrap_or_default()),
    }

    Ok(result.exit_code())
}
