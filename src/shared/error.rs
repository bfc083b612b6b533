use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// Per-project failures are reported but never change the exit code;
/// only failures that leave the run without valid input are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The run completed (individual projects may still have failed)
    Success = 0,
    /// Authentication, catalog read or configuration failure
    Fatal = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::Fatal => write!(f, "Fatal Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Which kind of name-keyed join produced more than one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Engagement,
    Test,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Engagement => write!(f, "engagement"),
            MatchKind::Test => write!(f, "test"),
        }
    }
}

/// Errors raised while talking to Dependency-Track and DefectDojo.
///
/// Every remote failure carries the HTTP status and (truncated) response
/// body so the log line is enough to diagnose the problem.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Login to {url} failed with status {status}\nResponse: {body}\n\n💡 Hint: Check DT_USERNAME and DT_PASSWORD")]
    Auth {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to fetch {resource}: status {status}\nResponse: {body}")]
    Fetch {
        resource: String,
        status: u16,
        body: String,
    },

    #[error("Failed to create engagement '{name}': status {status}\nResponse: {body}")]
    Create {
        name: String,
        status: u16,
        body: String,
    },

    #[error("Failed to download findings for project {project_id}: status {status}\nResponse: {body}")]
    Download {
        project_id: String,
        status: u16,
        body: String,
    },

    #[error("Failed to import scan into engagement {engagement_id}: status {status}\nResponse: {body}")]
    Upload {
        engagement_id: u64,
        status: u16,
        body: String,
    },

    #[error("Failed to reimport scan into test {test_id}: status {status}\nResponse: {body}")]
    Reimport {
        test_id: u64,
        status: u16,
        body: String,
    },

    #[error("Ambiguous {kind} match for '{key}': {count} candidates share this name")]
    AmbiguousMatch {
        kind: MatchKind,
        key: String,
        count: usize,
    },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    Config { message: String, hint: String },
}
