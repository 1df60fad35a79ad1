//! Exit codes for the uq-quad CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use uq_common::{Error, ErrorCategory};

/// Exit codes for uq-quad operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Rule generated and written
    Clean = 0,

    /// Invalid arguments or distribution specification
    ArgsError = 10,

    /// Settings file missing, unreadable, or invalid
    ConfigError = 11,

    /// The requested rule cannot be built (singular system, dependency, ...)
    RuleError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::RuleError => "ERR_RULE",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(error: &Error) -> Self {
        match error.category() {
            ErrorCategory::Input => ExitCode::ArgsError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Distribution => match error {
                Error::InvalidDistribution(_) => ExitCode::ArgsError,
                _ => ExitCode::RuleError,
            },
            ErrorCategory::Numerical | ErrorCategory::Recurrence => ExitCode::RuleError,
            ErrorCategory::Io => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
