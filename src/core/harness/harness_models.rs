use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the remote clients before a check can judge a response.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("missing credential: {0}")]
    MissingCredential(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries `?key=<API key>`; strip it before rendering.
        let err = err.without_url();
        if err.is_decode() {
            CheckError::Decode(err.to_string())
        } else {
            CheckError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::Decode(err.to_string())
    }
}

/// Why a check did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Timeout, refused connection, TLS failure and friends.
    Transport(String),
    /// A non-2xx status that is not the shape the check was looking for.
    UnexpectedStatus { status: u16, body: String },
    /// The remote answered but the expected markers were missing.
    ContentMismatch(String),
    /// The body was not the JSON shape the check expected.
    MalformedResponse(String),
    MissingCredential(String),
    Panicked(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FailureReason::UnexpectedStatus { status, body } => {
                write!(f, "unexpected status {}: {}", status, body)
            }
            FailureReason::ContentMismatch(msg) => write!(f, "content mismatch: {}", msg),
            FailureReason::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            FailureReason::MissingCredential(name) => write!(f, "{} is not configured", name),
            FailureReason::Panicked(msg) => write!(f, "check panicked: {}", msg),
        }
    }
}

impl From<CheckError> for FailureReason {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Transport(msg) => FailureReason::Transport(msg),
            CheckError::Decode(msg) => FailureReason::MalformedResponse(msg),
            CheckError::MissingCredential(name) => FailureReason::MissingCredential(name),
            CheckError::InvalidEndpoint(msg) => {
                FailureReason::Transport(format!("invalid endpoint: {}", msg))
            }
        }
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed { detail: String },
    Failed(FailureReason),
}

impl CheckOutcome {
    pub fn passed(detail: impl Into<String>) -> Self {
        CheckOutcome::Passed {
            detail: detail.into(),
        }
    }

    pub fn content_mismatch(msg: impl Into<String>) -> Self {
        CheckOutcome::Failed(FailureReason::ContentMismatch(msg.into()))
    }

    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        CheckOutcome::Failed(FailureReason::UnexpectedStatus {
            status,
            body: body.into(),
        })
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed { .. })
    }
}

/// One executed check as it appears in the final report.
#[derive(Debug, Clone)]
pub struct CheckRecord {
    pub name: String,
    pub outcome: CheckOutcome,
    pub elapsed: Duration,
}

/// Running tally for one suite.
///
/// Counters only ever increase and `total_passed` never exceeds `total_run`.
#[derive(Debug, Clone)]
pub struct Report {
    pub suite: String,
    pub total_run: usize,
    pub total_passed: usize,
    pub records: Vec<CheckRecord>,
    pub started_at: DateTime<Utc>,
}

impl Report {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            total_run: 0,
            total_passed: 0,
            records: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, outcome: CheckOutcome, elapsed: Duration) {
        self.total_run += 1;
        if outcome.is_passed() {
            self.total_passed += 1;
        }
        self.records.push(CheckRecord {
            name: name.into(),
            outcome,
            elapsed,
        });
    }

    /// Zero checks counts as all passed.
    pub fn all_passed(&self) -> bool {
        self.total_passed == self.total_run
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(|r| !r.outcome.is_passed())
    }

    pub fn render_summary(&self) -> String {
        format!(
            "📊 Test Results: {}/{} tests passed",
            self.total_passed, self.total_run
        )
    }
}
