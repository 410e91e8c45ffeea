#![allow(dead_code)]

use lox_trace::{Expr, Reporter, Token, parse, printer, scan};

/// Scan input that is expected to be free of lexical errors.
pub fn tokens(input: &str) -> Vec<Token> {
    let out = scan(input);
    assert!(
        !out.had_error(),
        "unexpected scan errors for {input:?}: {:?}",
        out.errors
    );
    out.tokens
}

/// Scan and parse, panicking on failure.
pub fn parse_source(input: &str) -> Expr {
    parse(&tokens(input)).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

/// Prefix form of the parsed input, e.g. `(+ 1 2)`.
pub fn shape(input: &str) -> String {
    printer::format(&parse_source(input))
}

/// Run `f` with a reporter and return every message it received.
pub fn collect_messages(f: impl FnOnce(&mut dyn Reporter)) -> Vec<String> {
    let mut messages = Vec::new();
    let mut reporter = |m: &str| messages.push(m.to_string());
    f(&mut reporter);
    messages
}
