//! Text-based LLVM IR generation
//!
//! Emits LLVM IR as text (.ll files) that can be compiled with clang or
//! llc and linked against this crate's staticlib, which provides the
//! `brio_*` runtime symbols. No LLVM API dependency; the output is
//! plain text, easy to inspect and diff.
//!
//! Expression temporaries are runtime arena handles carried in `i64`
//! SSA values. Around every loop the generator threads explicit
//! `@brio_mark`/`@brio_rewind` calls: mark before entry, rewind at each
//! iteration end and again on the break exit path (rewinding twice to
//! the same mark is harmless).

use super::plan::{plan_assign, Step};
use super::{collect_vars, Backend, CodegenError, CodegenResult};
use crate::ast::{BinOp, Expr, Program, Spanned, Stmt};
use crate::ARG_COUNT;
use std::fmt::Write;

/// Low-level backend: textual LLVM IR on stdout.
pub struct LlvmBackend {
    /// Target triple (overridable for cross-builds)
    target_triple: String,
}

impl LlvmBackend {
    pub fn new() -> Self {
        Self {
            target_triple: Self::default_target_triple(),
        }
    }

    /// Create with custom target triple
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target_triple: target.into(),
        }
    }

    /// Get default target triple based on platform
    fn default_target_triple() -> String {
        #[cfg(target_os = "windows")]
        {
            "x86_64-pc-windows-msvc".to_string()
        }
        #[cfg(target_os = "linux")]
        {
            "x86_64-unknown-linux-gnu".to_string()
        }
        #[cfg(target_os = "macos")]
        {
            "x86_64-apple-darwin".to_string()
        }
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        {
            "x86_64-unknown-linux-gnu".to_string()
        }
    }
}

impl Default for LlvmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for LlvmBackend {
    fn generate(&self, program: &Program) -> CodegenResult<String> {
        let mut emitter = Emitter::default();
        emitter.generate(program, &self.target_triple)?;
        Ok(emitter.out)
    }
}

const RUNTIME_DECLARATIONS: &str = "\
declare ptr @brio_var_new()
declare ptr @brio_var_arg(i32, ptr, i32)
declare i64 @brio_lit(i64)
declare i64 @brio_load(ptr)
declare i64 @brio_add(i64, i64)
declare i64 @brio_sub(i64, i64)
declare i64 @brio_neg(i64)
declare i32 @brio_is_zero(i64)
declare void @brio_print(i64)
declare void @brio_set_int(ptr, i64)
declare void @brio_copy(ptr, ptr)
declare void @brio_store(ptr, i64)
declare void @brio_add_assign(ptr, i64)
declare void @brio_sub_assign(ptr, i64)
declare void @brio_negate(ptr)
declare i64 @brio_mark()
declare void @brio_rewind(i64)";

#[derive(Default)]
struct Emitter {
    out: String,
    /// SSA temp counter (%t0, %t1, ...)
    tmp: usize,
    /// label counter (L0, L1, ...)
    lbl: usize,
    /// exit labels of enclosing loops, innermost last
    exits: Vec<usize>,
}

impl Emitter {
    fn generate(&mut self, program: &Program, target_triple: &str) -> CodegenResult<()> {
        writeln!(self.out, "; ModuleID = brio_program")?;
        writeln!(self.out, "target triple = \"{target_triple}\"")?;
        writeln!(self.out)?;
        writeln!(self.out, "; Runtime")?;
        writeln!(self.out, "{RUNTIME_DECLARATIONS}")?;
        writeln!(self.out)?;
        writeln!(self.out, "define i32 @main(i32 %argc, ptr %argv) {{")?;
        writeln!(self.out, "entry:")?;
        for var in collect_vars(program) {
            writeln!(self.out, "  %v_{var} = call ptr @brio_var_new()")?;
        }
        for i in 1..=ARG_COUNT {
            writeln!(
                self.out,
                "  %v_arg{i} = call ptr @brio_var_arg(i32 %argc, ptr %argv, i32 {i})"
            )?;
        }
        for stmt in program {
            self.emit_stmt(stmt)?;
        }
        writeln!(self.out, "  ret i32 0")?;
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Spanned<Stmt>) -> CodegenResult<()> {
        match &stmt.node {
            // storage already exists, zero-initialized
            Stmt::Decl(_) => Ok(()),
            Stmt::Assign { name, expr } => {
                for step in plan_assign(name, expr) {
                    match step {
                        Step::LoadLit(value) => {
                            writeln!(
                                self.out,
                                "  call void @brio_set_int(ptr %v_{name}, i64 {value})"
                            )?;
                        }
                        Step::CopyVar(src) => {
                            writeln!(
                                self.out,
                                "  call void @brio_copy(ptr %v_{name}, ptr %v_{src})"
                            )?;
                        }
                        Step::Negate => {
                            writeln!(self.out, "  call void @brio_negate(ptr %v_{name})")?;
                        }
                        Step::Apply { op, rhs } => {
                            let value = self.emit_expr(rhs)?;
                            let callee = match op {
                                BinOp::Add => "brio_add_assign",
                                BinOp::Sub => "brio_sub_assign",
                            };
                            writeln!(
                                self.out,
                                "  call void @{callee}(ptr %v_{name}, i64 {value})"
                            )?;
                        }
                        Step::Evaluate(expr) => {
                            let value = self.emit_expr(expr)?;
                            writeln!(
                                self.out,
                                "  call void @brio_store(ptr %v_{name}, i64 {value})"
                            )?;
                        }
                    }
                }
                Ok(())
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.emit_stmt(stmt)?;
                }
                Ok(())
            }
            Stmt::Loop(body) => {
                let mark = self.fresh_tmp();
                let head = self.fresh_label();
                let exit = self.fresh_label();
                writeln!(self.out, "  {mark} = call i64 @brio_mark()")?;
                writeln!(self.out, "  br label %L{head}")?;
                writeln!(self.out, "L{head}:")?;
                self.exits.push(exit);
                self.emit_stmt(body)?;
                self.exits.pop();
                writeln!(self.out, "  call void @brio_rewind(i64 {mark})")?;
                writeln!(self.out, "  br label %L{head}")?;
                writeln!(self.out, "L{exit}:")?;
                writeln!(self.out, "  call void @brio_rewind(i64 {mark})")?;
                Ok(())
            }
            Stmt::BreakIfz(cond) => {
                let Some(&exit) = self.exits.last() else {
                    return Err(CodegenError::BreakOutsideLoop { span: stmt.span });
                };
                let value = self.emit_expr(cond)?;
                let test = self.fresh_tmp();
                let next = self.fresh_label();
                writeln!(self.out, "  {test} = call i32 @brio_is_zero(i64 {value})")?;
                writeln!(self.out, "  %cmp{next} = icmp ne i32 {test}, 0")?;
                writeln!(
                    self.out,
                    "  br i1 %cmp{next}, label %L{exit}, label %L{next}"
                )?;
                writeln!(self.out, "L{next}:")?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.emit_expr(expr)?;
                writeln!(self.out, "  call void @brio_print(i64 {value})")?;
                Ok(())
            }
        }
    }

    /// Emit expression evaluation; returns the SSA value holding the
    /// runtime temp handle.
    fn emit_expr(&mut self, expr: &Spanned<Expr>) -> CodegenResult<String> {
        match &expr.node {
            Expr::IntLit(value) => {
                let t = self.fresh_tmp();
                writeln!(self.out, "  {t} = call i64 @brio_lit(i64 {value})")?;
                Ok(t)
            }
            Expr::Var(name) => {
                let t = self.fresh_tmp();
                writeln!(self.out, "  {t} = call i64 @brio_load(ptr %v_{name})")?;
                Ok(t)
            }
            Expr::Neg(inner) => {
                let operand = self.emit_expr(inner)?;
                let t = self.fresh_tmp();
                writeln!(self.out, "  {t} = call i64 @brio_neg(i64 {operand})")?;
                Ok(t)
            }
            Expr::Binary { left, op, right } => {
                let l = self.emit_expr(left)?;
                let r = self.emit_expr(right)?;
                let callee = match op {
                    BinOp::Add => "brio_add",
                    BinOp::Sub => "brio_sub",
                };
                let t = self.fresh_tmp();
                writeln!(self.out, "  {t} = call i64 @{callee}(i64 {l}, i64 {r})")?;
                Ok(t)
            }
        }
    }

    fn fresh_tmp(&mut self) -> String {
        let id = self.tmp;
        self.tmp += 1;
        format!("%t{id}")
    }

    fn fresh_label(&mut self) -> usize {
        let id = self.lbl;
        self.lbl += 1;
        id
    }
}
