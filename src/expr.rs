use std::fmt;

use crate::token::Token;

/// Expression tree node.
///
/// Every child is owned exclusively, so `clone` is a deep copy of the
/// whole subtree.
///
/// `order` is the index of the node's originating token in the parsed token
/// slice. It identifies a node across snapshots: copies keep it, and two
/// nodes of one tree never share it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `left operator right`.
    Binary {
        left: Box<Self>,
        operator: Token,
        right: Box<Self>,
        order: usize,
    },
    /// `operator operand`.
    Unary {
        operator: Token,
        operand: Box<Self>,
        order: usize,
    },
    /// `true`, `false`, `nil`, a number, or a string.
    Literal {
        value: Value,
        token: Token,
        order: usize,
    },
    /// `( inner )`; `token` is the opening parenthesis.
    Grouping {
        inner: Box<Self>,
        token: Token,
        order: usize,
    },
    /// Subtree that has not been parsed yet.
    Unresolved,
}

/// Value of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn binary(left: Self, operator: Token, right: Self, order: usize) -> Self {
        Self::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            order,
        }
    }

    #[must_use]
    pub fn unary(operator: Token, operand: Self, order: usize) -> Self {
        Self::Unary {
            operator,
            operand: Box::new(operand),
            order,
        }
    }

    #[must_use]
    pub fn grouping(inner: Self, token: Token, order: usize) -> Self {
        Self::Grouping {
            inner: Box::new(inner),
            token,
            order,
        }
    }

    #[must_use]
    pub const fn literal(value: Value, token: Token, order: usize) -> Self {
        Self::Literal {
            value,
            token,
            order,
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Binary { left, right, .. } => vec![&**left, &**right],
            Self::Unary { operand, .. } => vec![&**operand],
            Self::Grouping { inner, .. } => vec![&**inner],
            Self::Literal { .. } | Self::Unresolved => Vec::new(),
        }
    }

    /// Label shown for this node: the operator lexeme, `()` for a grouping,
    /// the value for a literal, `??` for an unresolved placeholder.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Binary { operator, .. } | Self::Unary { operator, .. } => operator.lexeme.clone(),
            Self::Grouping { .. } => "()".to_string(),
            Self::Literal { value, .. } => value.to_string(),
            Self::Unresolved => "??".to_string(),
        }
    }

    /// Stable identity of this node; `None` for a placeholder.
    #[must_use]
    pub const fn order(&self) -> Option<usize> {
        match self {
            Self::Binary { order, .. }
            | Self::Unary { order, .. }
            | Self::Literal { order, .. }
            | Self::Grouping { order, .. } => Some(*order),
            Self::Unresolved => None,
        }
    }

    /// Token this node was built from.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Binary { operator, .. } | Self::Unary { operator, .. } => Some(operator),
            Self::Literal { token, .. } | Self::Grouping { token, .. } => Some(token),
            Self::Unresolved => None,
        }
    }

    /// Fill the open child slot (right operand, unary operand, or grouped
    /// expression) while it still holds [`Expr::Unresolved`].
    ///
    /// # Errors
    ///
    /// Hands `child` back when this node has no open slot or the slot is
    /// already filled.
    pub fn replace_pending(&mut self, child: Self) -> Result<(), Self> {
        let slot = match self {
            Self::Binary { right, .. } => right,
            Self::Unary { operand, .. } => operand,
            Self::Grouping { inner, .. } => inner,
            Self::Literal { .. } | Self::Unresolved => return Err(child),
        };
        if !matches!(**slot, Self::Unresolved) {
            return Err(child);
        }
        **slot = child;
        Ok(())
    }

    /// Whether no [`Expr::Unresolved`] node is reachable from here.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Unresolved => false,
            _ => self.children().into_iter().all(Self::is_complete),
        }
    }
}
