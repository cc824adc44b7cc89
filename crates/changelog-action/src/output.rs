//! GitHub Actions workflow commands.
//!
//! Step outputs go to the file named by `GITHUB_OUTPUT` in the multi-line
//! `name<<DELIMITER` form. Without that file the legacy `::set-output`
//! command is printed instead. Failures are printed as `::error::`.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Writer for step outputs and failure annotations
#[derive(Debug, Clone, Default)]
pub struct WorkflowCommands {
    output_file: Option<PathBuf>,
}

impl WorkflowCommands {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(output_file)
    }

    /// Expose `value` as the step output `name`
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match self.output_file {
            Some(ref path) => {
                let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
                let entry = file_command_entry(name, value, &delimiter)?;

                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                file.write_all(entry.as_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => {
                println!(
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                );
            }
        }
        Ok(())
    }

    /// Mark the step as failed with `message`
    pub fn set_failed(&self, message: &str) {
        println!("{}", error_command(message));
    }
}

/// `name<<DELIM\nvalue\nDELIM\n`, refusing values that would end early
fn file_command_entry(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) {
        anyhow::bail!("Output name must not contain the delimiter {}", delimiter);
    }
    if value.contains(delimiter) {
        anyhow::bail!("Output value must not contain the delimiter {}", delimiter);
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_command_entry() {
        let entry = file_command_entry("changelog", "feat: a\nfix: b", "EOF_1").unwrap();
        assert_eq!(entry, "changelog<<EOF_1\nfeat: a\nfix: b\nEOF_1\n");
    }

    #[test]
    fn test_file_command_entry_rejects_delimiter_in_value() {
        assert!(file_command_entry("changelog", "x\nEOF_1\ny", "EOF_1").is_err());
    }

    #[test]
    fn test_error_command_escapes() {
        assert_eq!(
            error_command("fatal: bad revision\r\n100% broken"),
            "::error::fatal: bad revision%0D%0A100%25 broken"
        );
    }

    #[test]
    fn test_escape_property() {
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let commands = WorkflowCommands::new(Some(path.clone()));
        commands.set_output("changelog", "feat: thing").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "existing=1");
        assert!(lines[1].starts_with("changelog<<ghadelimiter_"));
        assert_eq!(lines[2], "feat: thing");
        assert_eq!(lines[3], lines[1].trim_start_matches("changelog<<"));
    }

    #[test]
    fn test_set_output_empty_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");

        WorkflowCommands::new(Some(path.clone()))
            .set_output("changelog", "")
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
    }
}
