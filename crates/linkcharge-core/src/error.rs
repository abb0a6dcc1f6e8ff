//! Error types for the fallible, non-hot-path operations.
//!
//! Resolution, decoration and mutation handling never fail; only compiling
//! configuration into runtime structures can.

use thiserror::Error;

/// Errors raised while compiling configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A panel selector is outside the supported subset.
    #[error("Invalid selector '{selector}': {reason}")]
    Selector {
        /// The selector as written.
        selector: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An attribute rule cannot be evaluated.
    #[error("Invalid rule for field '{field}': {reason}")]
    Rule {
        /// Field the rule reads.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
