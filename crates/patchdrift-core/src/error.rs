//! Error types and exit codes for patchdrift.
//!
//! `PatchdriftError` is the single error type that reaches the CLI. Language
//! crates bridge their own errors into it with `impl From<X> for
//! PatchdriftError`. Per-patch failures are not errors at this level: they
//! are recorded as [`crate::report::SkipReason`] values and the run goes on.
//!
//! ## Exit codes
//!
//! - `2`: invalid arguments (bad flags, out-of-range tunables)
//! - `3`: input not found (missing root directory or file)
//! - `10`: internal errors (I/O failures, parser failures, bugs)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes, used as process exit codes and in JSON error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from the caller.
    InvalidArguments = 2,
    /// A required input could not be found.
    ResolutionError = 3,
    /// I/O, parser or unexpected-state failures.
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

/// Fatal errors of an analysis run.
#[derive(Debug, Error)]
pub enum PatchdriftError {
    /// Invalid arguments from the caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// One of the three tree roots does not exist or is not a directory.
    #[error("root directory not found: {path}")]
    RootNotFound { path: String },

    /// A file disappeared between collection and reading.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Reading a file or directory failed.
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// The parser could not produce a tree at all.
    #[error("failed to parse {path}: {message}")]
    ParseFailed { path: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&PatchdriftError> for OutputErrorCode {
    fn from(err: &PatchdriftError) -> Self {
        match err {
            PatchdriftError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            PatchdriftError::RootNotFound { .. } => OutputErrorCode::ResolutionError,
            PatchdriftError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            PatchdriftError::Io { .. } => OutputErrorCode::InternalError,
            PatchdriftError::ParseFailed { .. } => OutputErrorCode::InternalError,
            PatchdriftError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl PatchdriftError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        PatchdriftError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a root-not-found error.
    pub fn root_not_found(path: impl Into<String>) -> Self {
        PatchdriftError::RootNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PatchdriftError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_arguments_maps_to_two() {
            let err = PatchdriftError::invalid_args("pairing threshold out of range");
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn missing_inputs_map_to_three() {
            let root = PatchdriftError::root_not_found("/nowhere");
            let file = PatchdriftError::FileNotFound {
                path: "Source/Pawn.cs".to_string(),
            };
            assert_eq!(root.error_code().code(), 3);
            assert_eq!(file.error_code().code(), 3);
        }

        #[test]
        fn io_and_parse_failures_map_to_ten() {
            let io = PatchdriftError::Io {
                path: "Source".to_string(),
                message: "permission denied".to_string(),
            };
            let parse = PatchdriftError::ParseFailed {
                path: "Broken.cs".to_string(),
                message: "parser returned no tree".to_string(),
            };
            assert_eq!(io.error_code().code(), 10);
            assert_eq!(parse.error_code().code(), 10);
            assert_eq!(PatchdriftError::internal("x").error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn invalid_arguments_display() {
            let err = PatchdriftError::invalid_args("missing --old");
            assert_eq!(err.to_string(), "invalid arguments: missing --old");
        }

        #[test]
        fn root_not_found_display() {
            let err = PatchdriftError::root_not_found("/tmp/old");
            assert_eq!(err.to_string(), "root directory not found: /tmp/old");
        }

        #[test]
        fn code_display_is_numeric() {
            assert_eq!(OutputErrorCode::ResolutionError.to_string(), "3");
            assert_eq!(OutputErrorCode::InternalError.to_string(), "10");
        }
    }
}
