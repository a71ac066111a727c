//! Rust source backend
//!
//! Emits a standalone Rust program that drives the crate's runtime
//! types directly: one `GrowInt` per program variable, a `TempArena`
//! for expression temporaries, and an `ArenaScope` block per statement
//! so temporaries release in bulk when the statement completes. Loop
//! bodies need no extra bookkeeping — every statement inside them
//! already rewinds its own scope, which bounds arena growth to a single
//! statement's high-water mark.
//!
//! The emitted program depends on this crate as a library. Program
//! variables are prefixed `v_` so source identifiers can never collide
//! with the generated bindings.

use super::plan::{plan_assign, Step};
use super::{collect_vars, Backend, CodegenError, CodegenResult};
use crate::ast::{BinOp, Expr, Program, Spanned, Stmt};
use crate::ARG_COUNT;
use std::fmt::Write;

/// Direct backend: Rust source on stdout.
pub struct RustBackend;

impl Backend for RustBackend {
    fn generate(&self, program: &Program) -> CodegenResult<String> {
        let mut emitter = Emitter::default();
        emitter.generate(program)?;
        Ok(emitter.out)
    }
}

#[derive(Default)]
struct Emitter {
    out: String,
    /// counter shared by temp and scope bindings
    next_id: usize,
    /// loop nesting depth, to reject break_ifz outside a loop
    loop_depth: usize,
}

impl Emitter {
    fn generate(&mut self, program: &Program) -> CodegenResult<()> {
        writeln!(self.out, "// Generated by brio; build against the brio library crate.")?;
        writeln!(self.out, "#![allow(unused_imports, unused_mut, unused_variables)]")?;
        writeln!(self.out)?;
        writeln!(self.out, "use brio::bigint::{{GrowInt, NumError, TempArena}};")?;
        writeln!(self.out)?;
        writeln!(self.out, "fn run() -> Result<(), NumError> {{")?;
        writeln!(self.out, "    let mut tmp = TempArena::new();")?;
        for var in collect_vars(program) {
            writeln!(self.out, "    let mut v_{var} = GrowInt::new();")?;
        }
        writeln!(
            self.out,
            "    let args: Vec<String> = std::env::args().skip(1).collect();"
        )?;
        for i in 1..=ARG_COUNT {
            writeln!(
                self.out,
                "    let mut v_arg{i} = match args.get({}) {{",
                i - 1
            )?;
            writeln!(self.out, "        Some(text) => GrowInt::parse(text)?,")?;
            writeln!(self.out, "        None => GrowInt::new(),")?;
            writeln!(self.out, "    }};")?;
        }
        for stmt in program {
            self.emit_stmt(stmt, 1)?;
        }
        writeln!(self.out, "    Ok(())")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)?;
        writeln!(self.out, "fn main() {{")?;
        writeln!(self.out, "    if let Err(e) = run() {{")?;
        writeln!(self.out, "        eprintln!(\"error: {{e}}\");")?;
        writeln!(self.out, "        std::process::exit(1);")?;
        writeln!(self.out, "    }}")?;
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Spanned<Stmt>, depth: usize) -> CodegenResult<()> {
        let pad = indent(depth);
        match &stmt.node {
            // storage already exists, zero-initialized
            Stmt::Decl(_) => Ok(()),
            Stmt::Assign { name, expr } => {
                for step in plan_assign(name, expr) {
                    match step {
                        Step::LoadLit(value) => {
                            writeln!(self.out, "{pad}v_{name}.set_i64({value})?;")?;
                        }
                        Step::CopyVar(src) => {
                            writeln!(self.out, "{pad}v_{name}.assign(v_{src}.view())?;")?;
                        }
                        Step::Negate => {
                            writeln!(self.out, "{pad}v_{name}.negate();")?;
                        }
                        Step::Apply { op, rhs } => {
                            let method = match op {
                                BinOp::Add => "add_assign",
                                BinOp::Sub => "sub_assign",
                            };
                            let scope = self.fresh("s");
                            writeln!(self.out, "{pad}{{")?;
                            let inner = indent(depth + 1);
                            writeln!(self.out, "{inner}let mut {scope} = tmp.scope();")?;
                            let t = self.emit_expr(&scope, rhs, depth + 1)?;
                            writeln!(
                                self.out,
                                "{inner}v_{name}.{method}({scope}.view({t}))?;"
                            )?;
                            writeln!(self.out, "{pad}}}")?;
                        }
                        Step::Evaluate(expr) => {
                            let scope = self.fresh("s");
                            writeln!(self.out, "{pad}{{")?;
                            let inner = indent(depth + 1);
                            writeln!(self.out, "{inner}let mut {scope} = tmp.scope();")?;
                            let t = self.emit_expr(&scope, expr, depth + 1)?;
                            writeln!(self.out, "{inner}v_{name}.assign({scope}.view({t}))?;")?;
                            writeln!(self.out, "{pad}}}")?;
                        }
                    }
                }
                Ok(())
            }
            Stmt::Block(stmts) => {
                writeln!(self.out, "{pad}{{")?;
                for stmt in stmts {
                    self.emit_stmt(stmt, depth + 1)?;
                }
                writeln!(self.out, "{pad}}}")?;
                Ok(())
            }
            Stmt::Loop(body) => {
                writeln!(self.out, "{pad}loop {{")?;
                self.loop_depth += 1;
                self.emit_stmt(body, depth + 1)?;
                self.loop_depth -= 1;
                writeln!(self.out, "{pad}}}")?;
                Ok(())
            }
            Stmt::BreakIfz(cond) => {
                if self.loop_depth == 0 {
                    return Err(CodegenError::BreakOutsideLoop { span: stmt.span });
                }
                let scope = self.fresh("s");
                writeln!(self.out, "{pad}{{")?;
                let inner = indent(depth + 1);
                writeln!(self.out, "{inner}let mut {scope} = tmp.scope();")?;
                let t = self.emit_expr(&scope, cond, depth + 1)?;
                writeln!(self.out, "{inner}if {scope}.is_zero({t}) {{")?;
                writeln!(self.out, "{inner}    break;")?;
                writeln!(self.out, "{inner}}}")?;
                writeln!(self.out, "{pad}}}")?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let scope = self.fresh("s");
                writeln!(self.out, "{pad}{{")?;
                let inner = indent(depth + 1);
                writeln!(self.out, "{inner}let mut {scope} = tmp.scope();")?;
                let t = self.emit_expr(&scope, expr, depth + 1)?;
                writeln!(self.out, "{inner}println!(\"{{}}\", {scope}.render({t}));")?;
                writeln!(self.out, "{pad}}}")?;
                Ok(())
            }
        }
    }

    /// Evaluate an expression inside `scope`, returning the binding
    /// that holds the resulting temporary.
    fn emit_expr(
        &mut self,
        scope: &str,
        expr: &Spanned<Expr>,
        depth: usize,
    ) -> CodegenResult<String> {
        let pad = indent(depth);
        match &expr.node {
            Expr::IntLit(value) => {
                let t = self.fresh("t");
                writeln!(self.out, "{pad}let {t} = {scope}.lit({value})?;")?;
                Ok(t)
            }
            Expr::Var(name) => {
                let t = self.fresh("t");
                writeln!(self.out, "{pad}let {t} = {scope}.load(v_{name}.view())?;")?;
                Ok(t)
            }
            Expr::Neg(inner) => {
                let operand = self.emit_expr(scope, inner, depth)?;
                let t = self.fresh("t");
                writeln!(self.out, "{pad}let {t} = {scope}.neg({operand})?;")?;
                Ok(t)
            }
            Expr::Binary { left, op, right } => {
                let l = self.emit_expr(scope, left, depth)?;
                let r = self.emit_expr(scope, right, depth)?;
                let method = match op {
                    BinOp::Add => "add",
                    BinOp::Sub => "sub",
                };
                let t = self.fresh("t");
                writeln!(self.out, "{pad}let {t} = {scope}.{method}({l}, {r})?;")?;
                Ok(t)
            }
        }
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}{id}")
    }
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}
