// Common error types for ci-bootstrap

use std::path::PathBuf;
use thiserror::Error;

use crate::models::pipeline_report::Stage;

/// Exit status used when the test runner exceeds its time budget
pub const TIMEOUT_EXIT_CODE: i32 = 124;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Virtual environment not found at {}: {} does not exist", .venv.display(), .script.display())]
    ActivationError { venv: PathBuf, script: PathBuf },

    #[error("No artifact matches '{pattern}'")]
    ArtifactNotFound { pattern: String },

    #[error("Artifact pattern '{pattern}' is ambiguous, {} files match: {}", .matches.len(), join_paths(.matches))]
    ArtifactAmbiguous { pattern: String, matches: Vec<PathBuf> },

    #[error("Failed to write {}: {source}", .path.display())]
    RenderError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} failed with exit code {code}")]
    CommandFailed { stage: Stage, code: i32 },

    #[error("Test runner timed out after {0} seconds")]
    Timeout(u64),
}

impl BootstrapError {
    /// Process exit status this error should terminate with.
    ///
    /// Child process failures keep the child's own status so the caller
    /// sees exactly what pip or the test runner reported.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::Timeout(_) => TIMEOUT_EXIT_CODE,
            _ => 1,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error as presented to the user on stderr
#[derive(Debug)]
pub struct UserError {
    pub message: String,
    pub exit_code: i32,
}

impl UserError {
    pub fn from_bootstrap_error(err: &BootstrapError) -> Self {
        Self {
            message: err.to_string(),
            exit_code: err.exit_code(),
        }
    }

    pub fn print(&self) {
        eprintln!("Error: {}", self.message);
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
