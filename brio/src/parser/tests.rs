//! Parser tests

use crate::ast::{BinOp, Expr, Program, Spanned, Stmt};
use crate::lexer::tokenize;
use crate::parser::parse;

fn parse_src(source: &str) -> crate::Result<Program> {
    let tokens = tokenize(source)?;
    parse("test.brio", source, tokens)
}

fn parse_ok(source: &str) -> Program {
    parse_src(source).unwrap()
}

/// Unwrap a single-statement program
fn single_stmt(source: &str) -> Spanned<Stmt> {
    let mut prog = parse_ok(source);
    assert_eq!(prog.len(), 1, "expected exactly one statement");
    prog.remove(0)
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").is_empty());
}

#[test]
fn test_parse_declaration() {
    let stmt = single_stmt("x:");
    assert!(matches!(stmt.node, Stmt::Decl(name) if name == "x"));
}

#[test]
fn test_parse_assignment() {
    let stmt = single_stmt("x := 42");
    match stmt.node {
        Stmt::Assign { name, expr } => {
            assert_eq!(name, "x");
            assert!(matches!(expr.node, Expr::IntLit(42)));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_parse_sum_is_left_associative() {
    // a - b + c must parse as (a - b) + c
    let stmt = single_stmt("x := a - b + c");
    let Stmt::Assign { expr, .. } = stmt.node else {
        panic!("expected assignment");
    };
    let Expr::Binary { left, op, right } = expr.node else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(right.node, Expr::Var(ref n) if n == "c"));
    let Expr::Binary { op: inner_op, .. } = left.node else {
        panic!("expected nested binary expression");
    };
    assert_eq!(inner_op, BinOp::Sub);
}

#[test]
fn test_parse_parenthesized_grouping() {
    // a - (b + c) keeps the parenthesized sum on the right
    let stmt = single_stmt("x := a - (b + c)");
    let Stmt::Assign { expr, .. } = stmt.node else {
        panic!("expected assignment");
    };
    let Expr::Binary { op, right, .. } = expr.node else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinOp::Sub);
    assert!(matches!(right.node, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn test_parse_unary_negation() {
    let stmt = single_stmt("x := -y");
    let Stmt::Assign { expr, .. } = stmt.node else {
        panic!("expected assignment");
    };
    let Expr::Neg(inner) = expr.node else {
        panic!("expected negation");
    };
    assert!(matches!(inner.node, Expr::Var(ref n) if n == "y"));
}

#[test]
fn test_parse_negation_binds_to_atom() {
    // -a + b is (-a) + b, not -(a + b)
    let stmt = single_stmt("x := -a + b");
    let Stmt::Assign { expr, .. } = stmt.node else {
        panic!("expected assignment");
    };
    let Expr::Binary { left, op, .. } = expr.node else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(left.node, Expr::Neg(_)));
}

#[test]
fn test_parse_double_negation_rejected() {
    assert!(parse_src("x := --y").is_err());
}

#[test]
fn test_parse_loop_with_block_body() {
    let stmt = single_stmt("loop { x := x + 1; break_ifz x; }");
    let Stmt::Loop(body) = stmt.node else {
        panic!("expected loop");
    };
    let Stmt::Block(stmts) = body.node else {
        panic!("expected block body");
    };
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[1].node, Stmt::BreakIfz(_)));
}

#[test]
fn test_parse_loop_with_single_statement_body() {
    let stmt = single_stmt("loop x := x + 1");
    assert!(matches!(stmt.node, Stmt::Loop(_)));
}

#[test]
fn test_parse_print() {
    let stmt = single_stmt("print x + 1");
    let Stmt::Print(expr) = stmt.node else {
        panic!("expected print");
    };
    assert!(matches!(expr.node, Expr::Binary { .. }));
}

#[test]
fn test_parse_semicolons_are_optional() {
    let with = parse_ok("x := 1; y := 2;");
    let without = parse_ok("x := 1 y := 2");
    assert_eq!(with.len(), 2);
    assert_eq!(without.len(), 2);
}

#[test]
fn test_parse_empty_block() {
    let stmt = single_stmt("{}");
    assert!(matches!(stmt.node, Stmt::Block(ref stmts) if stmts.is_empty()));
}

#[test]
fn test_parse_nested_blocks() {
    let stmt = single_stmt("{ { x := 1 } y := 2 }");
    let Stmt::Block(stmts) = stmt.node else {
        panic!("expected block");
    };
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0].node, Stmt::Block(_)));
}

#[test]
fn test_parse_missing_close_paren_is_error() {
    assert!(parse_src("x := (a + b").is_err());
}

#[test]
fn test_parse_bare_expression_is_error() {
    // Expressions are not statements
    assert!(parse_src("1 + 2").is_err());
}

#[test]
fn test_parse_missing_assign_rhs_is_error() {
    assert!(parse_src("x :=").is_err());
}

#[test]
fn test_parse_error_carries_span() {
    let err = parse_src("x := )").unwrap_err();
    let span = err.span().expect("parser errors carry a span");
    assert_eq!(span.start, 5);
}

#[test]
fn test_parse_statement_spans_cover_source() {
    let prog = parse_ok("x := 1; y := 22");
    assert_eq!(prog[0].span.start, 0);
    assert_eq!(prog[0].span.end, 6);
    assert_eq!(prog[1].span.start, 8);
    assert_eq!(prog[1].span.end, 15);
}

#[test]
fn test_parse_keywords_not_usable_as_variables() {
    assert!(parse_src("loop := 1").is_err());
    assert!(parse_src("print := 1").is_err());
}
