//! Brio Compiler Library
//!
//! A tiny imperative loop language where every numeric value is a signed
//! arbitrary-precision integer. The crate ships a tree-walking interpreter
//! and two text backends (Rust source and LLVM IR) on top of a shared
//! big-integer core.

pub mod ast;
pub mod bigint;
pub mod codegen;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod rt;

pub use ast::Span;
pub use error::{CompileError, Result};

/// Number of built-in `arg<N>` input variables (`arg1`, `arg2`, ...).
///
/// Command-line arguments beyond this count are ignored; missing ones
/// default to zero.
pub const ARG_COUNT: usize = 2;
