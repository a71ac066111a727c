//! Tree-walking interpreter

mod env;
mod error;
mod eval;

pub use env::Env;
pub use error::{InterpResult, RuntimeError};
pub use eval::{Flow, Interpreter};
