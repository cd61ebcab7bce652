//! Dispatch error types
//!
//! Errors that can escape operator resolution. `NotApplicable` is *not*
//! here: it is a routine outcome (see [`crate::value::Outcome`]), not a failure.

use thiserror::Error;

/// Error raised while resolving an operator application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Every dispatch step returned NotApplicable.
    #[error("TypeError: unsupported operand type(s) for {symbol}: '{left}' and '{right}'")]
    UnsupportedOperandTypes {
        /// Operator symbol, e.g. `+`
        symbol: &'static str,
        /// Type name of the left operand
        left: String,
        /// Type name of the right operand
        right: String,
    },

    /// The operand types were compatible but the divisor zero-tested true.
    #[error("ZeroDivisionError: {0}")]
    DivisionByZero(String),

    /// Operand values outside the operator's domain (negative shift count, ...)
    #[error("ValueError: {0}")]
    ValueError(String),

    /// Floating point result not representable
    #[error("OverflowError: {0}")]
    OverflowError(String),

    /// Exception raised by a user capability method, propagated unchanged
    #[error("{0}")]
    Raised(String),
}

impl DispatchError {
    /// Create an unsupported-operand error
    pub fn unsupported<L: Into<String>, R: Into<String>>(
        symbol: &'static str,
        left: L,
        right: R,
    ) -> Self {
        DispatchError::UnsupportedOperandTypes {
            symbol,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Plain division by zero
    pub fn division_by_zero() -> Self {
        DispatchError::DivisionByZero("division by zero".to_string())
    }

    /// Division by zero with a specific message
    pub fn zero_division<S: Into<String>>(msg: S) -> Self {
        DispatchError::DivisionByZero(msg.into())
    }

    /// Create a value error
    pub fn value_error<S: Into<String>>(msg: S) -> Self {
        DispatchError::ValueError(msg.into())
    }

    /// Create an overflow error
    pub fn overflow_error<S: Into<String>>(msg: S) -> Self {
        DispatchError::OverflowError(msg.into())
    }

    /// Wrap an exception raised by user code
    pub fn raised<S: Into<String>>(msg: S) -> Self {
        DispatchError::Raised(msg.into())
    }

    /// True for the unsupported-operand failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DispatchError::UnsupportedOperandTypes { .. })
    }
}

/// Result type alias for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;
