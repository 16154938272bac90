//! Logging infrastructure for MultiMutect.
//!
//! Provides structured logging with stderr output and optional file output:
//! - Always prints to stderr (stdout stays clean for shell pipelines)
//! - Optionally also writes to `<log_dir>/multimutect.log`
//! - Configurable via the RUST_LOG environment variable (default `info`)

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log filename used under the configured log directory.
pub const LOG_FILE: &str = "multimutect.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system.
///
/// Sets up a stderr layer and, when `log_dir` is given, a non-blocking file
/// layer writing to `<log_dir>/multimutect.log` (directory created if
/// needed, file truncated on session start).
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(log_dir: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true);

    let file_guard = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;

            // Clear the previous session's log file.
            let log_path = dir.join(LOG_FILE);
            fs::write(&log_path, "")?;

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();

            None
        }
    };

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Testing actual log output requires integration tests because tracing
    // uses a global subscriber that can only be set once per process. The
    // tests below cover the file-system side.

    #[test]
    fn test_log_file_name() {
        assert_eq!(LOG_FILE, "multimutect.log");
    }

    #[test]
    fn test_clearing_previous_log_file() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE);
        fs::write(&log_path, "old session data").unwrap();

        fs::write(&log_path, "").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_nested_log_dir_creation() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("logs");

        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(LOG_FILE), "").unwrap();

        assert!(nested.join(LOG_FILE).exists());
    }
}
