//! Unified Error System for Workflow Studio
//!
//! Graph computation itself never fails: absent snapshots produce empty graphs and
//! dangling references contribute nothing. Errors only appear at the boundaries
//! (reading snapshots, loading config, IPC commands) and serialize to JSON so the
//! frontend can show the message with recovery hints.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::error::{StudioError, ErrorCode};
//! use crate::studio_err;
//!
//! let err = StudioError::new(ErrorCode::GraphNotLoaded, "No phases loaded yet");
//! let err = studio_err!(WorkflowNotFound, "Unknown workflow: {}", id);
//! let err: StudioError = io_error.into();
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes grouped by category (thousands digit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    // Graph errors (2xxx)
    WorkflowNotFound = 2001,
    GraphNotLoaded = 2002,
    InvalidNavigationKey = 2003,
    SessionPoisoned = 2004,

    // Snapshot errors (4xxx)
    SnapshotParseError = 4001,

    // Config errors (5xxx)
    ConfigInvalid = 5001,

    // IO errors (7xxx)
    FileNotFound = 7001,
    FilePermissionDenied = 7002,
    FileReadFailed = 7003,
}

impl ErrorCode {
    /// Get the category name for this error code.
    pub fn category(&self) -> &'static str {
        match (*self as u16) / 1000 {
            2 => "graph",
            4 => "snapshot",
            5 => "config",
            7 => "io",
            _ => "unknown",
        }
    }

    /// Whether this error is typically recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ErrorCode::ConfigInvalid
                | ErrorCode::FilePermissionDenied
                | ErrorCode::SessionPoisoned
        )
    }

    /// Default recovery hints for this error code.
    pub fn default_hints(&self) -> Vec<&'static str> {
        match self {
            ErrorCode::GraphNotLoaded => vec![
                "Load the phase definitions before requesting the graph",
                "Check that the backend phases endpoint is reachable",
            ],
            ErrorCode::SnapshotParseError => vec![
                "Check that the snapshot is valid JSON",
                "Verify the backend and studio versions match",
            ],
            ErrorCode::ConfigInvalid => vec![
                "Check the YAML syntax of the config file",
                "Delete the config file to fall back to defaults",
            ],
            ErrorCode::FileNotFound => vec![
                "Check if the path is correct",
                "Verify the file exists",
            ],
            ErrorCode::FilePermissionDenied => vec![
                "Check file permissions",
                "Run with appropriate permissions",
            ],
            ErrorCode::InvalidNavigationKey => vec![
                "Use ArrowUp, ArrowDown, ArrowLeft, ArrowRight, Enter or Space",
            ],
            _ => vec![],
        }
    }
}

/// Structured error returned across the IPC boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("[{error_id}] {message}")]
pub struct StudioError {
    pub error_id: String,
    pub code: u16,
    pub category: String,
    pub message: String,
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recovery_hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl StudioError {
    /// Create a new StudioError with default hints.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let hints = code.default_hints();
        Self {
            error_id: format!("WS-{:04}", code as u16),
            code: code as u16,
            category: code.category().to_string(),
            message: message.into(),
            recoverable: code.is_recoverable(),
            recovery_hints: hints.into_iter().map(String::from).collect(),
            cause: None,
        }
    }

    /// Add cause (original error message) for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Create from a standard error, preserving the original message as cause.
    pub fn from_error<E: std::error::Error>(code: ErrorCode, error: E) -> Self {
        Self::new(code, error.to_string()).with_cause(format!("{:?}", error))
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    /// Convert to JSON string for the frontend.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

#[macro_export]
macro_rules! studio_err {
    ($code:ident, $msg:expr) => {
        $crate::error::StudioError::new($crate::error::ErrorCode::$code, $msg)
    };
    ($code:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::StudioError::new(
            $crate::error::ErrorCode::$code,
            format!($fmt, $($arg)*)
        )
    };
}

impl From<std::io::Error> for StudioError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StudioError::from_error(ErrorCode::FileNotFound, e),
            std::io::ErrorKind::PermissionDenied => {
                StudioError::from_error(ErrorCode::FilePermissionDenied, e)
            }
            _ => StudioError::from_error(ErrorCode::FileReadFailed, e),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::from_error(ErrorCode::SnapshotParseError, e)
    }
}

impl From<serde_yaml::Error> for StudioError {
    fn from(e: serde_yaml::Error) -> Self {
        StudioError::from_error(ErrorCode::ConfigInvalid, e)
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
