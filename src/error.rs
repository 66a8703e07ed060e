//! Rule construction errors.

use thiserror::Error;

/// Errors raised while building a rewrite rule.
///
/// All variants are construction-time failures: a rule that builds
/// successfully cannot fail at request time.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The source pattern did not compile.
    #[error("invalid source pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A method token was not a recognizable HTTP method.
    #[error("invalid HTTP method {0:?}")]
    Method(String),
}

/// Result type for rule construction.
pub type RewriteResult<T> = Result<T, RewriteError>;
