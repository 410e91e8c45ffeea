//! Step-by-step parsing for visualization.
//!
//! The traced parser builds the tree top-down. When it meets an operator it
//! pushes the new node with an [`Expr::Unresolved`] child onto an expression
//! stack, parses the missing operand on top of it, then pops that operand
//! into the pending slot. Each tier attempt also pushes a
//! `searching for <tier>` entry onto a log stack.
//!
//! A [`ParserSnapshot`] is taken after every push and pop of either stack.
//! Snapshots own deep copies, so later changes to the live stacks never
//! reach them.

use crate::expr::Expr;
use crate::parser::{CLOSING_PAREN_MESSAGE, Cursor, ParseError, Tier, literal_value, report};
use crate::report::Reporter;
use crate::token::{Token, TokenKind};

/// Parser state captured after one push or pop.
///
/// `expressions[0]` is the outermost node being built and the last entry is
/// the most deeply nested node still open. `log` lists the tiers currently
/// being searched, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserSnapshot {
    pub expressions: Vec<Expr>,
    pub log: Vec<String>,
}

/// Result of a traced parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTrace {
    pub snapshots: Vec<ParserSnapshot>,
    pub result: Result<Expr, ParseError>,
}

impl ParseTrace {
    /// The finished tree, if parsing succeeded.
    #[must_use]
    pub fn expr(&self) -> Option<&Expr> {
        self.result.as_ref().ok()
    }
}

/// Parse a token stream, recording a snapshot after every change to the
/// expression stack or the log stack.
///
/// Errors are reported exactly as [`parse_with`](crate::parse_with) reports
/// them. On failure the snapshots end with whatever partial tree had been
/// built.
pub fn parse_with_trace<R: Reporter + ?Sized>(
    tokens: &[Token],
    reporter: &mut R,
) -> ParseTrace {
    let mut tracer = Tracer {
        cursor: Cursor::new(tokens),
        reporter,
        stack: Vec::new(),
        log: Vec::new(),
        snapshots: Vec::new(),
    };

    let result = tracer.tier(Tier::Expression).map(|()| {
        // the root is left alone on the stack; take it without a snapshot
        tracer.stack.pop().unwrap_or(Expr::Unresolved)
    });

    tracing::debug!(
        snapshots = tracer.snapshots.len(),
        ok = result.is_ok(),
        "traced parse finished"
    );

    ParseTrace {
        snapshots: tracer.snapshots,
        result,
    }
}

struct Tracer<'a, 'r, R: ?Sized> {
    cursor: Cursor<'a>,
    reporter: &'r mut R,
    stack: Vec<Expr>,
    log: Vec<String>,
    snapshots: Vec<ParserSnapshot>,
}

impl<R: Reporter + ?Sized> Tracer<'_, '_, R> {
    /// Attempt one tier, leaving its finished node on top of the stack.
    fn tier(&mut self, tier: Tier) -> Result<(), ParseError> {
        self.log.push(format!("searching for {tier}"));
        self.snapshot();

        let result = match tier {
            Tier::Expression => self.tier(tier.next()),
            Tier::Equality | Tier::Comparison | Tier::Addition | Tier::Multiplication => {
                self.left_associative(tier)
            }
            Tier::Unary => self.unary(),
            Tier::Primary => self.primary(),
        };

        // popped on failure too
        self.log.pop();
        self.snapshot();
        result
    }

    fn left_associative(&mut self, tier: Tier) -> Result<(), ParseError> {
        self.tier(tier.next())?;
        while let Some((order, operator)) = self.cursor.match_any(tier.operators()) {
            let left = self.pop();
            self.push(Expr::binary(left, operator, Expr::Unresolved, order));
            self.tier(tier.next())?;
            self.attach();
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), ParseError> {
        if let Some((order, operator)) = self.cursor.match_any(Tier::Unary.operators()) {
            self.push(Expr::unary(operator, Expr::Unresolved, order));
            self.tier(Tier::Unary)?;
            self.attach();
            return Ok(());
        }
        self.tier(Tier::Primary)
    }

    fn primary(&mut self) -> Result<(), ParseError> {
        let order = self.cursor.position();
        let token = self.cursor.peek().clone();

        if let Some(value) = literal_value(&token) {
            self.cursor.advance();
            self.push(Expr::literal(value, token, order));
            return Ok(());
        }

        if token.kind == TokenKind::LeftParen {
            self.cursor.advance();
            self.push(Expr::grouping(Expr::Unresolved, token, order));
            self.tier(Tier::Expression)?;
            self.attach();
            if let Err(error) = self
                .cursor
                .consume(TokenKind::RightParen, CLOSING_PAREN_MESSAGE)
            {
                report(&mut *self.reporter, &error);
            }
            return Ok(());
        }

        let error = self.cursor.expected_expression();
        report(&mut *self.reporter, &error);
        Err(error)
    }

    fn push(&mut self, expr: Expr) {
        self.stack.push(expr);
        self.snapshot();
    }

    fn pop(&mut self) -> Expr {
        // every successful tier leaves exactly one node behind
        let expr = self.stack.pop().unwrap_or(Expr::Unresolved);
        self.snapshot();
        expr
    }

    /// Pop the finished node on top of the stack into the pending slot of
    /// the node beneath it.
    fn attach(&mut self) {
        let child = self.stack.pop();
        if let (Some(child), Some(parent)) = (child, self.stack.last_mut()) {
            let attached = parent.replace_pending(child);
            debug_assert!(attached.is_ok(), "parent has no pending slot");
        }
        self.snapshot();
    }

    fn snapshot(&mut self) {
        tracing::trace!(
            step = self.snapshots.len(),
            depth = self.stack.len(),
            "parser snapshot"
        );
        self.snapshots.push(ParserSnapshot {
            expressions: self.stack.clone(),
            log: self.log.clone(),
        });
    }
}
