//! Code generation
//!
//! One [`Backend`] interface with two implementations, selected once at
//! startup: [`RustBackend`] emits a Rust program driving the crate's
//! runtime types directly, [`LlvmBackend`] emits textual LLVM IR
//! calling the `brio_*` runtime symbols. Both lower assignments through
//! the shared in-place [`plan`]ner.

pub mod plan;

mod llvm_text;
mod rust_text;

pub use llvm_text::LlvmBackend;
pub use rust_text::RustBackend;

use crate::ast::{Expr, Program, Span, Spanned, Stmt};
use crate::ARG_COUNT;
use std::collections::BTreeSet;
use thiserror::Error;

/// Code generation error
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("break_ifz outside loop")]
    BreakOutsideLoop { span: Span },

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl CodegenError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::BreakOutsideLoop { span } => Some(*span),
            Self::Format(_) => None,
        }
    }
}

/// Result type for code generation
pub type CodegenResult<T> = Result<T, CodegenError>;

/// A code generation target
pub trait Backend {
    /// Generate the complete output artifact for a program.
    fn generate(&self, program: &Program) -> CodegenResult<String>;
}

/// Collect every variable the program names, in deterministic order.
/// The built-in `arg<N>` inputs are excluded; they are initialized from
/// the command line, not as ordinary zero variables.
pub fn collect_vars(program: &Program) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    for stmt in program {
        collect_stmt(stmt, &mut vars);
    }
    for i in 1..=ARG_COUNT {
        vars.remove(&format!("arg{i}"));
    }
    vars
}

fn collect_stmt(stmt: &Spanned<Stmt>, vars: &mut BTreeSet<String>) {
    match &stmt.node {
        Stmt::Decl(name) => {
            vars.insert(name.clone());
        }
        Stmt::Assign { name, expr } => {
            vars.insert(name.clone());
            collect_expr(expr, vars);
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                collect_stmt(stmt, vars);
            }
        }
        Stmt::Loop(body) => collect_stmt(body, vars),
        Stmt::BreakIfz(expr) | Stmt::Print(expr) => collect_expr(expr, vars),
    }
}

fn collect_expr(expr: &Spanned<Expr>, vars: &mut BTreeSet<String>) {
    match &expr.node {
        Expr::IntLit(_) => {}
        Expr::Var(name) => {
            vars.insert(name.clone());
        }
        Expr::Neg(inner) => collect_expr(inner, vars),
        Expr::Binary { left, right, .. } => {
            collect_expr(left, vars);
            collect_expr(right, vars);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn vars_of(source: &str) -> Vec<String> {
        let tokens = tokenize(source).unwrap();
        let program = parse("test.brio", source, tokens).unwrap();
        collect_vars(&program).into_iter().collect()
    }

    #[test]
    fn test_collect_vars_from_decl_and_assign() {
        assert_eq!(vars_of("b: a := 1"), vec!["a", "b"]);
    }

    #[test]
    fn test_collect_vars_from_expressions() {
        // variables only ever read still need storage
        assert_eq!(vars_of("print x + y"), vec!["x", "y"]);
    }

    #[test]
    fn test_collect_vars_excludes_args() {
        assert_eq!(vars_of("x := arg1 + arg2"), vec!["x"]);
    }

    #[test]
    fn test_collect_vars_walks_nested_statements() {
        assert_eq!(
            vars_of("loop { a := 1; { b := 2 } break_ifz c }"),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_collect_vars_deterministic_order() {
        assert_eq!(vars_of("z := 1 a := 2 m := 3"), vec!["a", "m", "z"]);
    }
}
