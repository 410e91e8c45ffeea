use std::fmt;

use crate::expr::{Expr, Value};
use crate::report::{Reporter, Silent};
use crate::token::{Literal, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No grammar alternative matches at the `primary` level.
    ExpectedExpression,
    /// A required token, such as a closing `)`, is missing.
    MissingToken {
        expected: TokenKind,
        message: String,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedExpression => write!(f, "expected expression"),
            Self::MissingToken { message, .. } => write!(f, "{message}"),
        }
    }
}

/// Error produced during parsing, located at the offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} {} on line {}", .token.location(), .token.line)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token: Token,
}

/// Parse a token stream into an expression tree without reporting errors.
///
/// # Errors
///
/// Returns `ParseError` when no expression can be built. A missing `)` is
/// not an error here: the grouping is closed as if it had been present.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    parse_with(tokens, &mut Silent)
}

/// Parse a token stream into an expression tree, sending every error
/// (including the recovered ones) to `reporter`.
///
/// Tokens after the first complete expression are ignored.
///
/// # Errors
///
/// Returns `ParseError` when no expression can be built.
pub fn parse_with<R: Reporter + ?Sized>(
    tokens: &[Token],
    reporter: &mut R,
) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        cursor: Cursor::new(tokens),
        reporter,
    };
    let expr = parser.tier(Tier::Expression)?;
    tracing::debug!(consumed = parser.cursor.current, "parse finished");
    Ok(expr)
}

/// One precedence level of the grammar, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Expression,
    Equality,
    Comparison,
    Addition,
    Multiplication,
    Unary,
    Primary,
}

impl Tier {
    /// The next tighter tier.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::Expression => Self::Equality,
            Self::Equality => Self::Comparison,
            Self::Comparison => Self::Addition,
            Self::Addition => Self::Multiplication,
            Self::Multiplication => Self::Unary,
            Self::Unary | Self::Primary => Self::Primary,
        }
    }

    /// Operators handled at this tier.
    pub(crate) const fn operators(self) -> &'static [TokenKind] {
        match self {
            Self::Equality => &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::Comparison => &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::Addition => &[TokenKind::Minus, TokenKind::Plus],
            Self::Multiplication => &[TokenKind::Slash, TokenKind::Star],
            Self::Unary => &[TokenKind::Bang, TokenKind::Minus],
            Self::Expression | Self::Primary => &[],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Expression => "expression",
            Self::Equality => "equality",
            Self::Comparison => "comparison",
            Self::Addition => "addition",
            Self::Multiplication => "multiplication",
            Self::Unary => "unary",
            Self::Primary => "primary",
        };
        f.write_str(name)
    }
}

/// Read position over a token slice.
///
/// Reading past the end yields a synthetic `Eof`, so a slice that lacks one
/// behaves as if it were terminated.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    current: usize,
    eof: Token,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            literal: None,
            line: tokens.last().map_or(1, |last| last.line),
            start: tokens.last().map_or(0, |last| last.end),
            end: tokens.last().map_or(0, |last| last.end),
        };
        Self {
            tokens,
            current: 0,
            eof,
        }
    }

    /// Index of the next token; becomes the `order` of a node built from it.
    pub(crate) const fn position(&self) -> usize {
        self.current
    }

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Consume the next token if it has one of `kinds`, returning it with
    /// its index.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<(usize, Token)> {
        let order = self.current;
        kinds
            .iter()
            .any(|&kind| self.check(kind))
            .then(|| (order, self.advance()))
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(ParseError {
            kind: ParseErrorKind::MissingToken {
                expected: kind,
                message: message.to_string(),
            },
            token: self.peek().clone(),
        })
    }

    pub(crate) fn expected_expression(&self) -> ParseError {
        ParseError {
            kind: ParseErrorKind::ExpectedExpression,
            token: self.peek().clone(),
        }
    }
}

/// Value of a `false`, `true`, `nil`, number, or string token.
pub(crate) fn literal_value(token: &Token) -> Option<Value> {
    match (token.kind, &token.literal) {
        (TokenKind::False, _) => Some(Value::Bool(false)),
        (TokenKind::True, _) => Some(Value::Bool(true)),
        (TokenKind::Nil, _) => Some(Value::Nil),
        (TokenKind::Number, Some(Literal::Number(n))) => Some(Value::Number(*n)),
        (TokenKind::StringLiteral, Some(Literal::Str(s))) => Some(Value::Str(s.clone())),
        _ => None,
    }
}

pub(crate) const CLOSING_PAREN_MESSAGE: &str = "expected ')' after expression";

pub(crate) fn report<R: Reporter + ?Sized>(reporter: &mut R, error: &ParseError) {
    tracing::debug!(line = error.token.line, %error, "syntax error");
    reporter.report(&error.to_string());
}

struct Parser<'a, 'r, R: ?Sized> {
    cursor: Cursor<'a>,
    reporter: &'r mut R,
}

impl<R: Reporter + ?Sized> Parser<'_, '_, R> {
    fn tier(&mut self, tier: Tier) -> Result<Expr, ParseError> {
        match tier {
            Tier::Expression => self.tier(tier.next()),
            Tier::Equality | Tier::Comparison | Tier::Addition | Tier::Multiplication => {
                self.left_associative(tier)
            }
            Tier::Unary => self.unary(),
            Tier::Primary => self.primary(),
        }
    }

    fn left_associative(&mut self, tier: Tier) -> Result<Expr, ParseError> {
        let mut expr = self.tier(tier.next())?;
        while let Some((order, operator)) = self.cursor.match_any(tier.operators()) {
            let right = self.tier(tier.next())?;
            expr = Expr::binary(expr, operator, right, order);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if let Some((order, operator)) = self.cursor.match_any(Tier::Unary.operators()) {
            let operand = self.tier(Tier::Unary)?;
            return Ok(Expr::unary(operator, operand, order));
        }
        self.tier(Tier::Primary)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let order = self.cursor.position();
        let token = self.cursor.peek().clone();

        if let Some(value) = literal_value(&token) {
            self.cursor.advance();
            return Ok(Expr::literal(value, token, order));
        }

        if token.kind == TokenKind::LeftParen {
            self.cursor.advance();
            let inner = self.tier(Tier::Expression)?;
            if let Err(error) = self
                .cursor
                .consume(TokenKind::RightParen, CLOSING_PAREN_MESSAGE)
            {
                report(&mut *self.reporter, &error);
            }
            return Ok(Expr::grouping(inner, token, order));
        }

        let error = self.cursor.expected_expression();
        report(&mut *self.reporter, &error);
        Err(error)
    }
}
