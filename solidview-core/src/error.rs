/// Error types for shape generation, constraint solving and configuration
use thiserror::Error;

use crate::shape::ShapeKind;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core. None of them are fatal: the session absorbs
/// each one and keeps the last valid state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter was non-positive, non-finite or not a number at all.
    #[error("invalid parameter {name}: {value:?}")]
    InvalidParameter { name: String, value: String },

    /// The fixed parameters make the free-parameter bound undefined.
    #[error("degenerate constraint for {shape}: bound is not finite")]
    DegenerateConstraint { shape: ShapeKind },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(name: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
        }
    }
}
