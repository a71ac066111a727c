//! Runtime errors for the interpreter

use crate::bigint::NumError;
use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Numeric-core failure (malformed input, capacity, allocation)
    #[error("{0}")]
    Num(#[from] NumError),

    /// `break_ifz` executed outside any loop
    #[error("break_ifz outside loop")]
    BreakOutsideLoop,

    /// Output sink failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
