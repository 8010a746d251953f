//! Error types for joint persistence and configuration.

use thiserror::Error;

/// Errors that can occur while saving, loading or configuring joints.
///
/// Index contract violations (a DOF index outside `0..6`) are not represented
/// here: they panic at the call site.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored field does not have the type the reader asked for.
    #[error("field `{field}` has type {found}, expected {expected}")]
    TypeMismatch {
        /// Name of the offending field.
        field: String,
        /// Type the reader asked for.
        expected: String,
        /// Type actually stored.
        found: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConstraintError {
    /// Create a type mismatch error.
    #[must_use]
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid config error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConstraintError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Result type for constraint operations.
pub type Result<T> = std::result::Result<T, ConstraintError>;
