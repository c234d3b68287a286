//! Exit codes and structured error output.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: scan finished and duplicates were found
/// - 1: fatal error (invalid root, bad arguments, unexpected failure)
/// - 2: scan finished, no duplicates
/// - 3: scan finished but some files could not be read
/// - 4: the report file could not be written
/// - 130: interrupted with Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates found.
    Success = 0,
    /// Fatal error.
    GeneralError = 1,
    /// No duplicates found.
    NoDuplicates = 2,
    /// Completed with per-file read errors.
    PartialSuccess = 3,
    /// Report could not be written; the summary was still printed.
    ReportWriteFailed = 4,
    /// Interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::ReportWriteFailed => "DS004",
            Self::Interrupted => "DS130",
        }
    }
}

/// Fatal error rendered as JSON for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Code prefix (e.g., "DS001")
    pub code: String,
    /// Numeric exit code
    pub exit_code: i32,
    /// Error message including its causes
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Build from an application error and the exit code it maps to.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
