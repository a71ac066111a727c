//! Statement execution and expression evaluation

use super::env::Env;
use super::error::{InterpResult, RuntimeError};
use crate::ast::{Expr, Spanned, Stmt};
use crate::bigint::FixedInt;
use crate::ARG_COUNT;
use std::io::{self, Write};

/// Statement outcome: either control falls through, or an enclosing
/// loop was asked to exit. Checked at every statement boundary instead
/// of unwinding.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break,
}

/// The interpreter. Generic over its output sink so tests can capture
/// what `print` writes; [`Interpreter::new`] binds stdout.
pub struct Interpreter<W: Write> {
    env: Env,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            env: Env::new(),
            out,
        }
    }

    /// Bind `arg1..argN` from command-line text. Missing arguments
    /// default to zero; malformed ones abort with `MalformedInteger`.
    pub fn bind_args(&mut self, args: &[String]) -> InterpResult<()> {
        for i in 1..=ARG_COUNT {
            let value = match args.get(i - 1) {
                Some(text) => FixedInt::parse(text)?,
                None => FixedInt::zero(),
            };
            self.env.set(&format!("arg{i}"), value);
        }
        Ok(())
    }

    /// Execute a whole program.
    pub fn run(&mut self, program: &[Spanned<Stmt>]) -> InterpResult<()> {
        for stmt in program {
            if self.exec(stmt)? == Flow::Break {
                return Err(RuntimeError::BreakOutsideLoop);
            }
        }
        Ok(())
    }

    /// Consume the interpreter and hand back its output sink.
    pub fn into_writer(self) -> W {
        self.out
    }

    fn exec(&mut self, stmt: &Spanned<Stmt>) -> InterpResult<Flow> {
        match &stmt.node {
            Stmt::Decl(name) => {
                self.env.declare(name);
                Ok(Flow::Normal)
            }
            Stmt::Assign { name, expr } => {
                let value = self.eval(expr)?;
                self.env.set(name, value);
                Ok(Flow::Normal)
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    if self.exec(stmt)? == Flow::Break {
                        return Ok(Flow::Break);
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Loop(body) => {
                loop {
                    if self.exec(body)? == Flow::Break {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::BreakIfz(cond) => {
                if self.eval(cond)?.is_zero() {
                    Ok(Flow::Break)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::Print(expr) => {
                let value = self.eval(expr)?;
                writeln!(self.out, "{value}")?;
                Ok(Flow::Normal)
            }
        }
    }

    fn eval(&self, expr: &Spanned<Expr>) -> InterpResult<FixedInt> {
        match &expr.node {
            Expr::IntLit(v) => Ok(FixedInt::from_i64(*v)),
            Expr::Var(name) => Ok(self
                .env
                .get(name)
                .cloned()
                .unwrap_or_else(FixedInt::zero)),
            Expr::Neg(inner) => Ok(self.eval(inner)?.negated()),
            Expr::Binary { left, op, right } => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                match op {
                    crate::ast::BinOp::Add => Ok(l.add(&r)?),
                    crate::ast::BinOp::Sub => Ok(l.sub(&r)?),
                }
            }
        }
    }
}
