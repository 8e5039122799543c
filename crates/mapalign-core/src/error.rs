//! Error types and error code constants for mapalign.
//!
//! This module provides a unified error type (`MapalignError`) that bridges
//! the subsystem errors (tree, Tiny I/O, configuration) into a common format
//! suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller, malformed configuration)
//! - `3`: Resolution errors (file or namespace not found, unreadable mappings)
//! - `4`: Apply errors (failed to write the corrected mappings)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! The analysis itself never fails: malformed mapping data is reported as
//! problems, not errors.

use std::fmt;

use thiserror::Error;

use crate::analysis::UnknownProblemKind;
use crate::config::ConfigError;
use crate::tree::tiny::TinyError;
use crate::tree::TreeError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed configuration).
    InvalidArguments = 2,
    /// Resolution errors (file not found, namespace not found, bad mappings).
    ResolutionError = 3,
    /// Apply errors (failed to write changes).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum MapalignError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The mapping file could not be parsed.
    #[error("invalid mappings in {path}: {message}")]
    InvalidMappings { path: String, message: String },

    /// Failed to write the corrected mappings.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&MapalignError> for OutputErrorCode {
    fn from(err: &MapalignError) -> Self {
        match err {
            MapalignError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            MapalignError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            MapalignError::InvalidMappings { .. } => OutputErrorCode::ResolutionError,
            MapalignError::ApplyError { .. } => OutputErrorCode::ApplyError,
            MapalignError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<MapalignError> for OutputErrorCode {
    fn from(err: MapalignError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<TreeError> for MapalignError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::DuplicateNamespace { name } => MapalignError::InvalidArguments {
                message: format!("duplicate namespace '{}'", name),
            },
            TreeError::ClassNotFound { id } => MapalignError::InternalError {
                message: format!("{} not found", id),
            },
        }
    }
}

impl From<ConfigError> for MapalignError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                MapalignError::FileNotFound {
                    path: path.display().to_string(),
                }
            }
            other => MapalignError::InvalidArguments {
                message: other.to_string(),
            },
        }
    }
}

impl From<UnknownProblemKind> for MapalignError {
    fn from(err: UnknownProblemKind) -> Self {
        MapalignError::InvalidArguments {
            message: err.to_string(),
        }
    }
}

impl MapalignError {
    /// Bridge a Tiny read error for the given input file.
    pub fn from_read(path: impl Into<String>, err: TinyError) -> Self {
        let path = path.into();
        match err {
            TinyError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                MapalignError::FileNotFound { path }
            }
            TinyError::Io(io_err) => MapalignError::InternalError {
                message: format!("IO error reading {}: {}", path, io_err),
            },
            other => MapalignError::InvalidMappings {
                path,
                message: other.to_string(),
            },
        }
    }

    /// Bridge a write failure for the given output file.
    pub fn from_write(path: impl Into<String>, err: std::io::Error) -> Self {
        let path = path.into();
        MapalignError::ApplyError {
            message: format!("failed to write {}: {}", path, err),
            file: Some(path),
        }
    }

    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        MapalignError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        MapalignError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
