//! Error types and path context for instance, generation and harness operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all crate operations
///
/// A malformed or geometrically invalid solution is not an error; the
/// validator reports it as a rejection.
#[derive(Debug)]
pub enum FenceError {
    /// Instance data doesn't describe a valid grid
    MalformedInstance {
        /// Description of what's wrong with the instance
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Every regeneration attempt ended with fewer than two live connectors
    GenerationExhausted {
        /// Number of full generation attempts made
        attempts: usize,
        /// Grid dimensions (rows, cols)
        grid_dimensions: (usize, usize),
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Solver build command exited unsuccessfully
    SolverBuild {
        /// Command line that was run
        command: String,
        /// Exit status, if the process exited normally
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Solver process could not be started
    SolverLaunch {
        /// Executable that failed to launch
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Benchmark report serialization failed
    Report {
        /// Report destination
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// Report timestamp could not be formatted
    Timestamp {
        /// Underlying formatting error
        source: time::error::Format,
    },
}

impl fmt::Display for FenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInstance { reason } => {
                write!(f, "Malformed instance: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::GenerationExhausted {
                attempts,
                grid_dimensions,
            } => {
                write!(
                    f,
                    "Generation exhausted after {attempts} attempts (grid size {}x{})",
                    grid_dimensions.0, grid_dimensions.1
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::SolverBuild {
                command,
                status,
                stderr,
            } => {
                let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
                write!(
                    f,
                    "Solver build '{command}' failed (status {status}): {}",
                    stderr.trim()
                )
            }
            Self::SolverLaunch { path, source } => {
                write!(f, "Failed to launch solver '{}': {source}", path.display())
            }
            Self::Report { path, source } => {
                write!(f, "Failed to write report '{}': {source}", path.display())
            }
            Self::Timestamp { source } => {
                write!(f, "Failed to format report timestamp: {source}")
            }
        }
    }
}

impl std::error::Error for FenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } | Self::SolverLaunch { source, .. } => Some(source),
            Self::Report { source, .. } => Some(source),
            Self::Timestamp { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, FenceError>;

/// Attaches the offending path to low-level I/O and serialization failures
pub trait WithPath<T> {
    /// Wrap the error together with `path` and the attempted `operation`
    ///
    /// # Errors
    ///
    /// Propagates the underlying error converted into a [`FenceError`]
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| FenceError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl<T> WithPath<T> for std::result::Result<T, serde_json::Error> {
    fn with_path(self, path: &Path, _operation: &'static str) -> Result<T> {
        self.map_err(|source| FenceError::Report {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl From<std::io::Error> for FenceError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> FenceError {
    FenceError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed instance error
pub fn malformed_instance(reason: &impl ToString) -> FenceError {
    FenceError::MalformedInstance {
        reason: reason.to_string(),
    }
}
