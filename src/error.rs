//! Error handling module for the realm add-on
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Directive parse errors are user-facing: they surface before installation
//! begins and invalidate the whole kickstart section.

use thiserror::Error;

/// Main error type for the realm add-on
#[derive(Error, Debug)]
pub enum RealmAddonError {
    /// IO errors (section files, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directive line tokenized to nothing
    #[error("Missing realm command arguments")]
    EmptyCommand,

    /// The leading command word is not one of join/permit/deny
    #[error("Unsupported realm command: '{0}'")]
    UnsupportedCommand(String),

    /// A second `join` line was seen
    #[error("The realm command 'join' should only be specified once")]
    DuplicateJoin,

    /// Unknown option or malformed option syntax
    #[error("Invalid realm arguments: {0}")]
    InvalidArguments(String),

    /// Zero or more than one positional realm name on a `join` line
    #[error("Specify one realm to join")]
    RealmCount,
}

/// Result type alias for realm add-on operations
pub type Result<T> = std::result::Result<T, RealmAddonError>;

impl RealmAddonError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid-arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// True for errors produced while parsing directive text.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyCommand
                | Self::UnsupportedCommand(_)
                | Self::DuplicateJoin
                | Self::InvalidArguments(_)
                | Self::RealmCount
        )
    }
}
