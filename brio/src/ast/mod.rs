//! Abstract Syntax Tree definitions

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::{Deserialize, Serialize};

/// A program is a sequence of top-level statements
pub type Program = Vec<Spanned<Stmt>>;

/// Statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// Variable declaration: `name :`
    Decl(String),

    /// Assignment: `name := expr`
    Assign { name: String, expr: Spanned<Expr> },

    /// Statement block: `{ stmt; ... }`
    Block(Vec<Spanned<Stmt>>),

    /// Unconditional loop: `loop stmt`
    Loop(Box<Spanned<Stmt>>),

    /// Exit the innermost loop when the operand is zero: `break_ifz expr`
    BreakIfz(Spanned<Expr>),

    /// Print the decimal rendering of the operand: `print expr`
    Print(Spanned<Expr>),
}
