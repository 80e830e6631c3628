//! Error types for the validation harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating a generated service worker.
///
/// Every variant is terminal for the run: a run either fully validates or
/// reports exactly one categorized failure.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied both or neither of the two source inputs
    #[error("Invalid input: {0}")]
    PreconditionError(String),

    /// The service worker file could not be read
    #[error("Failed to load service worker source: {0}")]
    LoadError(String),

    /// The source failed to parse or threw during top-level evaluation
    #[error("Service worker evaluation failed: {0}")]
    EvaluationError(String),

    /// A method's observed call trace disagrees with its expectation
    #[error("Method call mismatch for `{method}`: expected {expected}, observed {observed}")]
    MethodCallsError {
        /// Surface method whose trace failed to match
        method: &'static str,
        /// Expected trace, or "not called"
        expected: String,
        /// Observed trace, or "not called"
        observed: String,
    },
}
