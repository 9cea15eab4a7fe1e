//! Error types for termweave.
//!
//! All errors are represented by [`TermweaveError`], which covers
//! configuration issues, layout defects, tool integrations, and failures at
//! the iTerm2 scripting boundary.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in termweave.
#[derive(Error, Debug)]
pub enum TermweaveError {
    /// Config file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// A file referenced by an `!include` tag does not exist.
    #[error("Included file not found: {0}")]
    IncludeNotFound(PathBuf),

    /// An `!include` tag carried something other than a path scalar.
    #[error("Invalid !include value: expected a file path")]
    InvalidInclude,

    /// Could not determine the user's home directory.
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// Pane position string is not 1-3 `/`-separated positive integers.
    /// Non-fatal during layout: the pane is skipped.
    #[error("Invalid position format: {0}")]
    InvalidPosition(String),

    /// Requested global profile does not exist.
    #[error("Profile not found: {0}")]
    ProfileNotFound(PathBuf),

    /// Profile name contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid profile name: {0}. Use alphanumeric characters, underscores, and hyphens only.")]
    InvalidProfileName(String),

    /// A tool hook failed while generating commands.
    #[error("Tool integration error: {0}")]
    ToolIntegration(String),

    /// A call across the iTerm2 scripting boundary failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Convenient Result type alias for termweave operations.
pub type Result<T> = std::result::Result<T, TermweaveError>;
