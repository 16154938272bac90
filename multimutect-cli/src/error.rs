//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single nonzero exit code for every failure mode.

use multimutect::command::CommandBuildError;
use multimutect::pipeline::PipelineError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid argument combination
    Config(String),
    /// Parameter set could not be assembled
    Params(CommandBuildError),
    /// The pipeline aborted fatally
    Pipeline(PipelineError),
    /// The run finished but some chunks did not succeed
    ChunksFailed { failed: usize, total: usize },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::ChunksFailed { .. } = self {
            eprintln!();
            eprintln!("Per-chunk logs above name each failing region and its stderr;");
            eprintln!("partial chunk outputs and the merged VCF are left in place for inspection.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Params(e) => write!(f, "Invalid parameters: {}", e),
            CliError::Pipeline(e) => write!(f, "Run failed: {}", e),
            CliError::ChunksFailed { failed, total } => {
                write!(f, "{} of {} chunks did not succeed", failed, total)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Params(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CommandBuildError> for CliError {
    fn from(e: CommandBuildError) -> Self {
        CliError::Params(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
