//! Error types for the contract checker
//!
//! All fallible operations return `Result<T, Error>`.
//! Every variant is fatal: the pipeline fails fast rather than emit a
//! verification query that may be wrong.

use thiserror::Error as ThisError;

/// Contract checker error types
#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed header, unknown field, unknown check kind or
    /// unresolved contract reference
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Contracts in one specification declare different variable sets
    #[error("Variable set mismatch: contract '{contract}' differs from '{reference}': {detail}")]
    VariableSetMismatch {
        reference: String,
        contract: String,
        detail: String,
    },

    /// Engine reported a different number of results than checks submitted
    #[error("Verdict count mismatch: expected {expected} specification results, engine reported {found}")]
    VerdictCountMismatch { expected: usize, found: usize },

    /// Specification result line carrying neither "is true" nor "is false"
    #[error("Malformed verdict for check {index}: {line}")]
    MalformedVerdict { index: usize, line: String },

    /// Engine missing, failed to start, or exited non-zero
    #[error("Engine invocation error: {0}")]
    EngineInvocationError(String),

    /// Formula synthesis requested for a contract that was never saturated
    #[error("Contract '{0}' has not been saturated")]
    Unsaturated(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::ParseError {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for contract checker operations
pub type Result<T> = std::result::Result<T, Error>;
