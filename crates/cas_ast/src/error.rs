//! Error types for cas_ast crate.

use thiserror::Error;

/// Errors that can occur in AST operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstError {
    /// Tensor rows don't share the same width
    #[error("invalid matrix: {reason}")]
    InvalidMatrix { reason: String },

    /// A non-real number was asked for a primitive real value
    #[error("invalid downcast: {reason}")]
    InvalidDowncast { reason: String },

    /// `contains` was asked about an element whose membership is unknown
    #[error("cannot decide whether {element} belongs to {set}")]
    Undecidable { set: String, element: String },

    /// Internal invariant violation
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AstError {
    /// True for invariant violations that should never surface in correct code.
    pub fn is_internal(&self) -> bool {
        matches!(self, AstError::InternalError(_))
    }
}

/// Helper macro for invariant assertions in cas_ast.
/// In debug: uses debug_assert!
/// In release: returns Err(AstError::InternalError) if condition fails.
#[macro_export]
macro_rules! ensure_ast_invariant {
    ($cond:expr, $msg:literal $(, $args:expr)* $(,)?) => {
        if cfg!(debug_assertions) {
            debug_assert!($cond, $msg $(, $args)*);
        }
        if !$cond {
            return Err($crate::error::AstError::InternalError(format!($msg $(, $args)*)));
        }
    };
}
