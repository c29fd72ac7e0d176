//! Layered error definitions
//!
//! Categorized by source: config / argument / lookup / allocation / canvas

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Toolkit Errors =====
    /// Rejected input (empty view, zero duration, bad parameter)
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// Time or index query outside the stored range
    #[error("lookup out of range for t={target_us}us: {message}")]
    LookupOutOfRange { target_us: u64, message: String },

    /// Working buffer could not be reserved
    #[error("allocation of {requested} elements failed")]
    AllocationFailure { requested: usize },

    // ===== Canvas Errors =====
    /// Drawing backend failure
    #[error("canvas error: {message}")]
    Canvas { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create lookup error
    pub fn lookup_out_of_range(target_us: u64, message: impl Into<String>) -> Self {
        Self::LookupOutOfRange {
            target_us,
            message: message.into(),
        }
    }

    /// Create allocation failure error
    pub fn allocation(requested: usize) -> Self {
        Self::AllocationFailure { requested }
    }

    /// Create canvas error
    pub fn canvas(message: impl Into<String>) -> Self {
        Self::Canvas {
            message: message.into(),
        }
    }
}
