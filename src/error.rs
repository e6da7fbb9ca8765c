//! Error types for parameter filtering.

use thiserror::Error;

/// Errors surfaced to callers of the parameter API.
///
/// A declaration that does not match its value is not an error: the key is
/// dropped. Only the variants below abort the call that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// `require` found the key absent or holding an empty value.
    #[error("param is missing or the value is empty: {key}")]
    ParameterMissing {
        /// The offending key.
        key: String,
    },

    /// `fetch` without a default hit an absent key.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The offending key.
        key: String,
    },

    /// Raised by `permit` when the unpermitted-key policy is `raise`.
    #[error("found unpermitted parameters: {}", keys.join(", "))]
    UnpermittedParameters {
        /// Every rejected top-level key, in input order.
        keys: Vec<String>,
    },

    /// A mass-assignment sink was handed a tree that was never permitted.
    #[error("forbidden attributes: parameters must be permitted before mass assignment")]
    ForbiddenAttributes,

    /// A mass-assignment sink has no attribute with this name.
    #[error("unknown attribute '{name}'")]
    UnknownAttribute {
        /// Attribute name as it appeared in the parameters.
        name: String,
    },

    /// The filter specification could not be parsed.
    #[error("invalid filter specification: {0}")]
    InvalidFilterSpec(String),

    /// The decoded request body cannot become a parameter tree.
    #[error("invalid parameters: {0}")]
    InvalidInput(String),

    /// A permit setting holds a value it cannot take.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ParamsError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::ParameterMissing { key: key.into() }
    }

    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }
}

/// Result type alias for parameter operations.
pub type ParamsResult<T> = Result<T, ParamsError>;
