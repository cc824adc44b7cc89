use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Structured log events for a changelog run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    RunStarted {
        repo: String,
        working_dir: PathBuf,
    },
    ReferencesResolved {
        head: String,
        base: String,
    },
    GeneratorStarted {
        generator: String,
        head: String,
        base: String,
    },
    GeneratorCompleted {
        exit_code: i32,
        duration_secs: f64,
        stdout_lines: usize,
        stderr_lines: usize,
    },
    ChangelogFiltered {
        pattern: String,
        kept: usize,
        dropped: usize,
    },
    ChangelogGenerated {
        base: String,
        head: String,
        changelog: String,
    },
    RunFailed {
        error: String,
        exit_code: i32,
    },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

/// Logger for run events. Writes to stderr unless given another sink,
/// leaving stdout to workflow commands.
pub struct Logger {
    format: LogFormat,
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            writer: None,
        }
    }

    /// Log into `writer` instead of stderr
    pub fn with_writer(format: LogFormat, writer: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            writer: Some(Mutex::new(writer)),
        }
    }

    pub fn log(&self, event: &LogEvent) {
        let rendered = match self.format {
            LogFormat::Json => Self::render_json(event),
            LogFormat::Pretty => Self::render_pretty(event),
            LogFormat::Compact => Self::render_compact(event),
        };

        let Some(text) = rendered else {
            return;
        };

        match self.writer {
            Some(ref writer) => {
                if let Ok(mut w) = writer.lock() {
                    let _ = writeln!(w, "{}", text);
                }
            }
            None => {
                let _ = writeln!(std::io::stderr(), "{}", text);
            }
        }
    }

    fn render_json(event: &LogEvent) -> Option<String> {
        let mut value = serde_json::to_value(event).ok()?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        Some(value.to_string())
    }

    fn render_pretty(event: &LogEvent) -> Option<String> {
        let text = match event {
            LogEvent::ReferencesResolved { head, base } => {
                format!("head-ref: {}\nbase-ref: {}", head, base)
            }
            LogEvent::GeneratorCompleted {
                exit_code,
                duration_secs,
                ..
            } if *exit_code != 0 => format!(
                "{} generator exited with {} ({:.1}s)",
                "⚠".bright_yellow(),
                exit_code,
                duration_secs
            ),
            LogEvent::ChangelogFiltered {
                pattern,
                kept,
                dropped,
            } => format!(
                "{}",
                format!(
                    "Filtered with '{}': kept {} {}, dropped {}",
                    pattern,
                    kept,
                    if *kept == 1 { "line" } else { "lines" },
                    dropped
                )
                .dimmed()
            ),
            LogEvent::ChangelogGenerated {
                base,
                head,
                changelog,
            } => format!(
                "{}",
                format!("Changelog between {} and {}:\n{}", base, head, changelog).green()
            ),
            // Failures reach the console as an `::error::` workflow command
            LogEvent::RunFailed { .. } => return None,
            // Noise in pretty mode; visible in json/compact and tracing debug
            LogEvent::RunStarted { .. }
            | LogEvent::GeneratorStarted { .. }
            | LogEvent::GeneratorCompleted { .. } => return None,
        };
        Some(text)
    }

    fn render_compact(event: &LogEvent) -> Option<String> {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::RunStarted { repo, .. } => format!("[{}] run:start {}", timestamp, repo),
            LogEvent::ReferencesResolved { head, base } => {
                format!("[{}] refs head={} base={}", timestamp, head, base)
            }
            LogEvent::GeneratorStarted { generator, .. } => {
                format!("[{}] generator:start {}", timestamp, generator)
            }
            LogEvent::GeneratorCompleted {
                exit_code,
                duration_secs,
                stdout_lines,
                stderr_lines,
            } => format!(
                "[{}] generator:done exit={} {:.1}s out={} err={}",
                timestamp, exit_code, duration_secs, stdout_lines, stderr_lines
            ),
            LogEvent::ChangelogFiltered {
                pattern,
                kept,
                dropped,
            } => format!(
                "[{}] filter '{}' kept={} dropped={}",
                timestamp, pattern, kept, dropped
            ),
            LogEvent::ChangelogGenerated { changelog, .. } => format!(
                "[{}] changelog:done {} lines",
                timestamp,
                changelog.lines().count()
            ),
            LogEvent::RunFailed { error, exit_code } => {
                format!("[{}] error:{} {}", timestamp, exit_code, error)
            }
        };
        Some(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Shared buffer so tests can read what the logger wrote
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_pretty_echoes_references() {
        let buf = Buffer::default();
        let logger = Logger::with_writer(LogFormat::Pretty, Box::new(buf.clone()));

        logger.log(&LogEvent::ReferencesResolved {
            head: "abc123".to_string(),
            base: "v1.0.0".to_string(),
        });

        assert_eq!(buf.contents(), "head-ref: abc123\nbase-ref: v1.0.0\n");
    }

    #[test]
    fn test_pretty_banner_contains_changelog() {
        let buf = Buffer::default();
        let logger = Logger::with_writer(LogFormat::Pretty, Box::new(buf.clone()));

        logger.log(&LogEvent::ChangelogGenerated {
            base: "v1.0.0".to_string(),
            head: "abc123".to_string(),
            changelog: "feat: thing".to_string(),
        });

        let out = buf.contents();
        assert!(out.contains("Changelog between v1.0.0 and abc123:\nfeat: thing"));
    }

    #[test]
    fn test_pretty_skips_generator_started() {
        let buf = Buffer::default();
        let logger = Logger::with_writer(LogFormat::Pretty, Box::new(buf.clone()));

        logger.log(&LogEvent::GeneratorStarted {
            generator: "changelog script".to_string(),
            head: "a".to_string(),
            base: "b".to_string(),
        });

        assert!(buf.contents().is_empty());
    }

    #[test]
    fn test_json_lines_are_tagged() {
        let buf = Buffer::default();
        let logger = Logger::with_writer(LogFormat::Json, Box::new(buf.clone()));

        logger.log(&LogEvent::RunFailed {
            error: "fatal: bad revision".to_string(),
            exit_code: 1,
        });

        let value: serde_json::Value = serde_json::from_str(buf.contents().trim()).unwrap();
        assert_eq!(value["event"], "run_failed");
        assert_eq!(value["error"], "fatal: bad revision");
        assert_eq!(value["exit_code"], 1);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_compact_filter_line() {
        let buf = Buffer::default();
        let logger = Logger::with_writer(LogFormat::Compact, Box::new(buf.clone()));

        logger.log(&LogEvent::ChangelogFiltered {
            pattern: "feat:*".to_string(),
            kept: 1,
            dropped: 3,
        });

        assert!(buf.contents().contains("filter 'feat:*' kept=1 dropped=3"));
    }
}
