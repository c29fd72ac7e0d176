//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file not found
    #[error("{kind} file not found: {path}")]
    NotFound { kind: &'static str, path: String },

    /// Recording decoded to zero samples
    #[error("No samples in {path}")]
    EmptyRecording { path: String },

    /// Argument combination the command cannot honour
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Some frames failed to render
    #[error("{failed} of {total} frames failed to render")]
    RenderFailures { failed: u64, total: u64 },
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::NotFound {
            kind: "Configuration",
            path: path.display().to_string(),
        }
    }

    pub fn data_not_found(path: &Path) -> Self {
        Self::NotFound {
            kind: "Data",
            path: path.display().to_string(),
        }
    }

    pub fn empty_recording(path: &Path) -> Self {
        Self::EmptyRecording {
            path: path.display().to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
