//! Instrumented scanner and parser for Lox expressions.
//!
//! Both stages run either directly, producing tokens or a syntax tree, or
//! traced, producing the ordered snapshots a visualizer needs to replay the
//! scan or parse one step at a time.
//!
//! # Quick start
//!
//! ## Scan and parse
//!
//! ```
//! use lox_trace::{parse, printer, scan};
//!
//! let out = scan("1 + 2 * 3");
//! assert!(!out.had_error());
//! let expr = parse(&out.tokens).unwrap();
//! assert_eq!(printer::format(&expr), "(+ 1 (* 2 3))");
//! ```
//!
//! ## Replay a parse step by step
//!
//! ```
//! use lox_trace::{Silent, parse_with_trace, printer, scan};
//!
//! let tokens = scan("-1").tokens;
//! let trace = parse_with_trace(&tokens, &mut Silent);
//! for snapshot in &trace.snapshots {
//!     let _frame = printer::format_parser_snapshot(snapshot);
//! }
//! assert_eq!(printer::format(trace.expr().unwrap()), "(- 1)");
//! ```
//!
//! ## Collect error messages
//!
//! ```
//! use lox_trace::scan_with;
//!
//! let mut messages = Vec::new();
//! let out = scan_with("1 # 2", &mut |m: &str| messages.push(m.to_string()));
//! assert!(out.had_error());
//! assert_eq!(messages, ["unexpected character '#' on line 1"]);
//! ```

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod expr;
pub mod parser;
pub mod printer;
pub mod report;
pub mod scanner;
pub mod token;
pub mod trace;

pub use expr::{Expr, Value};
pub use parser::{ParseError, ParseErrorKind, parse, parse_with};
pub use report::{Reporter, Silent};
pub use scanner::{
    LexError, LexErrorKind, ScanOutput, ScanTrace, ScannerSnapshot, scan, scan_with,
    scan_with_trace,
};
pub use token::{Literal, Token, TokenKind};
pub use trace::{ParseTrace, ParserSnapshot, parse_with_trace};

/// Unified error type covering both scanning and parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A scanner error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Scan and parse a source string in one step.
///
/// Fails on the first lexical error instead of parsing a partial token
/// stream.
pub fn parse_str(source: &str) -> Result<Expr, Error> {
    let out = scan(source);
    if let Some(error) = out.errors.into_iter().next() {
        return Err(error.into());
    }
    Ok(parse(&out.tokens)?)
}
