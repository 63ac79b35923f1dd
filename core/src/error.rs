//! Error types for cookbook metadata operations.
//!
//! Every validation failure in the core surfaces as a [`MetadataError`] at
//! the call that supplied the bad input. Nothing is deferred and nothing is
//! partially written.

use thiserror::Error;

/// Errors that can occur while building, querying, or decoding metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A `"<op> <version>"` expression could not be parsed.
    #[error("invalid version constraint expression: {0:?}")]
    InvalidConstraintExpression(String),

    /// A version string is not a dot-separated list of non-negative integers.
    #[error("invalid version format: {0:?}")]
    InvalidVersionFormat(String),

    /// An attribute option failed its type or enum check.
    #[error("invalid option '{option}' for attribute '{path}': {reason}")]
    InvalidAttributeOption {
        /// Attribute path the option was supplied for.
        path: String,
        /// Option key, e.g. `display_name`.
        option: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A recipe description was set for a recipe that was never registered.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// A structured metadata document has the wrong shape.
    #[error("invalid metadata document: {0}")]
    InvalidDocument(String),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`MetadataError`].
pub type Result<T> = std::result::Result<T, MetadataError>;
