//! Text rendering of trees and snapshots.
//!
//! Used by the command-line tool and handy in tests; the library itself
//! never prints.

use std::fmt::Write as _;

use crate::expr::Expr;
use crate::scanner::ScannerSnapshot;
use crate::trace::ParserSnapshot;

/// Render an expression in parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
///
/// Groupings print as `(group ...)` and placeholders as `??`.
#[must_use]
pub fn format(expr: &Expr) -> String {
    let mut out = String::new();
    format_prefix(&mut out, expr);
    out
}

fn format_prefix(out: &mut String, expr: &Expr) {
    let children = expr.children();
    if children.is_empty() {
        out.push_str(&expr.name());
        return;
    }

    out.push('(');
    if matches!(expr, Expr::Grouping { .. }) {
        out.push_str("group");
    } else {
        out.push_str(&expr.name());
    }
    for child in children {
        out.push(' ');
        format_prefix(out, child);
    }
    out.push(')');
}

/// Render an expression as an indented tree, one node name per line.
#[must_use]
pub fn format_tree(expr: &Expr) -> String {
    let mut out = String::new();
    format_node(&mut out, expr, 0);
    out
}

fn format_node(out: &mut String, expr: &Expr, depth: usize) {
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), expr.name());
    for child in expr.children() {
        format_node(out, child, depth + 1);
    }
}

/// Render a scanner snapshot on one line: cursor state, then the tokens
/// produced so far.
#[must_use]
pub fn format_scanner_snapshot(snapshot: &ScannerSnapshot) -> String {
    let mut out = format!(
        "line {} start {} current {} |",
        snapshot.line, snapshot.start, snapshot.current
    );
    for token in &snapshot.tokens {
        let _ = write!(out, " {}", token.kind);
        if !token.lexeme.is_empty() {
            let _ = write!(out, "({})", token.lexeme);
        }
    }
    out
}

/// Render a parser snapshot: the log stack, then each open expression in
/// prefix form.
#[must_use]
pub fn format_parser_snapshot(snapshot: &ParserSnapshot) -> String {
    let mut out = String::new();
    for (depth, entry) in snapshot.log.iter().enumerate() {
        let _ = writeln!(out, "{}{entry}", "  ".repeat(depth));
    }
    for (i, expr) in snapshot.expressions.iter().enumerate() {
        let _ = writeln!(out, "[{i}] {}", format(expr));
    }
    out
}
