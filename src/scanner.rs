use std::fmt;

use crate::report::{Reporter, Silent};
use crate::token::{Literal, Token, TokenKind};

/// Classifies a lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
    /// End of input reached inside a string literal.
    UnterminatedString,
    /// Digits that do not form a valid number.
    UnparsableNumber,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character '{ch}'")
            }
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::UnparsableNumber => write!(f, "couldn't parse number"),
        }
    }
}

/// Error produced during scanning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} on line {line}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}

/// Scanner state captured after one step of a traced scan.
///
/// `current` and `start` are columns relative to the start of `line`,
/// like token columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerSnapshot {
    pub tokens: Vec<Token>,
    pub current: usize,
    pub start: usize,
    pub line: usize,
}

/// Result of a direct scan.
///
/// The token sequence is always complete and ends with `Eof`, even when
/// errors were found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl ScanOutput {
    #[must_use]
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of a traced scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTrace {
    pub snapshots: Vec<ScannerSnapshot>,
    pub errors: Vec<LexError>,
}

impl ScanTrace {
    #[must_use]
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Token list of the final snapshot.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        self.snapshots
            .last()
            .map(|snapshot| snapshot.tokens.as_slice())
            .unwrap_or_default()
    }
}

/// Scan source text into tokens, collecting errors without reporting them.
#[must_use]
pub fn scan(source: &str) -> ScanOutput {
    scan_with(source, &mut Silent)
}

/// Scan source text into tokens, sending each error to `reporter`.
///
/// Scanning continues past errors; check [`ScanOutput::had_error`].
pub fn scan_with<R: Reporter + ?Sized>(source: &str, reporter: &mut R) -> ScanOutput {
    let mut scanner = Scanner::new(source, false);
    scanner.run(reporter);
    ScanOutput {
        tokens: scanner.tokens,
        errors: scanner.errors,
    }
}

/// Scan source text, recording a snapshot after every change of scanner
/// state: each outer iteration, each cursor advance, each two-character
/// match, and each emitted token.
pub fn scan_with_trace<R: Reporter + ?Sized>(source: &str, reporter: &mut R) -> ScanTrace {
    let mut scanner = Scanner::new(source, true);
    scanner.run(reporter);
    ScanTrace {
        snapshots: scanner.snapshots.unwrap_or_default(),
        errors: scanner.errors,
    }
}

struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    start: usize,
    current: usize,
    line: usize,
    line_start: usize,
    snapshots: Option<Vec<ScannerSnapshot>>,
}

impl Scanner {
    fn new(source: &str, traced: bool) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            line_start: 0,
            snapshots: traced.then(Vec::new),
        }
    }

    fn run<R: Reporter + ?Sized>(&mut self, reporter: &mut R) {
        while !self.is_at_end() {
            self.start = self.current;
            self.snapshot();
            if let Err(kind) = self.scan_token() {
                self.fail(kind, reporter);
            }
        }

        self.start = self.current;
        self.add_token(TokenKind::Eof, None);

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scan finished"
        );
    }

    fn scan_token(&mut self) -> Result<(), LexErrorKind> {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen, None),
            ')' => self.add_token(TokenKind::RightParen, None),
            '{' => self.add_token(TokenKind::LeftBrace, None),
            '}' => self.add_token(TokenKind::RightBrace, None),
            ',' => self.add_token(TokenKind::Comma, None),
            '.' => self.add_token(TokenKind::Dot, None),
            '-' => self.add_token(TokenKind::Minus, None),
            '+' => self.add_token(TokenKind::Plus, None),
            ';' => self.add_token(TokenKind::Semicolon, None),
            '*' => self.add_token(TokenKind::Star, None),
            '!' => self.add_either('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.add_either('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.add_either('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.add_either('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '/' => {
                if self.matches('/') {
                    // comment runs to end of line
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash, None);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.new_line(),
            '"' => self.string()?,
            c if c.is_ascii_digit() => self.number()?,
            c if is_alpha(c) => self.identifier(),
            other => return Err(LexErrorKind::UnexpectedCharacter(other)),
        }
        Ok(())
    }

    fn add_either(&mut self, expected: char, matched: TokenKind, single: TokenKind) {
        let kind = if self.matches(expected) {
            matched
        } else {
            single
        };
        self.add_token(kind, None);
    }

    fn string(&mut self) -> Result<(), LexErrorKind> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.advance();
            if c == '\n' {
                self.new_line();
            }
        }

        if self.is_at_end() {
            return Err(LexErrorKind::UnterminatedString);
        }

        self.advance(); // closing quote

        let value: String = self.source[self.start + 1..self.current - 1]
            .iter()
            .collect();
        self.add_token(TokenKind::StringLiteral, Some(Literal::Str(value)));
        Ok(())
    }

    fn number(&mut self) -> Result<(), LexErrorKind> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A trailing '.' belongs to the number only when a digit follows.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let value = self
            .lexeme()
            .parse::<f64>()
            .map_err(|_| LexErrorKind::UnparsableNumber)?;
        self.add_token(TokenKind::Number, Some(Literal::Number(value)));
        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(is_alphanumeric) {
            self.advance();
        }

        let kind = TokenKind::keyword(&self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, None);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.snapshot();
        c
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.current += 1;
        self.snapshot();
        true
    }

    const fn new_line(&mut self) {
        self.line += 1;
        self.line_start = self.current;
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    const fn column(&self, pos: usize) -> usize {
        // A string spanning lines starts before the current line.
        pos.saturating_sub(self.line_start)
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        self.tokens.push(Token {
            kind,
            lexeme: self.lexeme(),
            literal,
            line: self.line,
            start: self.column(self.start),
            end: self.column(self.current),
        });
        self.snapshot();
    }

    fn snapshot(&mut self) {
        let current = self.column(self.current);
        let start = self.column(self.start);
        if let Some(snapshots) = &mut self.snapshots {
            tracing::trace!(step = snapshots.len(), current, start, "scanner snapshot");
            snapshots.push(ScannerSnapshot {
                tokens: self.tokens.clone(),
                current,
                start,
                line: self.line,
            });
        }
    }

    fn fail<R: Reporter + ?Sized>(&mut self, kind: LexErrorKind, reporter: &mut R) {
        let error = LexError {
            kind,
            line: self.line,
        };
        tracing::debug!(line = error.line, %error, "lexical error");
        reporter.report(&error.to_string());
        self.errors.push(error);
    }
}

const fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}
