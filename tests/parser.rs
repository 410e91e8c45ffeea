//! Parser precedence, associativity, and error tests.

mod common;

use common::{collect_messages, parse_source, shape, tokens};
use lox_trace::{Error, Expr, ParseErrorKind, TokenKind, Value, parse, parse_str, parse_with};

// -----------------------------------------------------------
// Precedence and associativity.
// -----------------------------------------------------------

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(shape("1+2*3"), "(+ 1 (* 2 3))");
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(shape("1-2-3"), "(- (- 1 2) 3)");
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(shape("(1+2)*3"), "(* (group (+ 1 2)) 3)");
}

#[test]
fn full_precedence_ladder() {
    assert_eq!(
        shape("1 == 2 < 3 + 4 * -5"),
        "(== 1 (< 2 (+ 3 (* 4 (- 5)))))"
    );
}

#[test]
fn comparison_chain_is_left_associative() {
    assert_eq!(shape("1 < 2 <= 3"), "(<= (< 1 2) 3)");
}

#[test]
fn equality_chain_is_left_associative() {
    assert_eq!(shape("true != false == nil"), "(== (!= true false) nil)");
}

#[test]
fn division_and_multiplication_share_a_tier() {
    assert_eq!(shape("8 / 4 * 2"), "(* (/ 8 4) 2)");
}

#[test]
fn nested_unary() {
    assert_eq!(shape("!-!true"), "(! (- (! true)))");
}

#[test]
fn nested_groupings() {
    assert_eq!(shape("((1))"), "(group (group 1))");
}

// -----------------------------------------------------------
// Literals and tokens.
// -----------------------------------------------------------

#[test]
fn literal_keeps_originating_token() {
    let expr = parse_source("42");
    let Expr::Literal { value, token, .. } = expr else {
        panic!("expected literal");
    };
    assert_eq!(value, Value::Number(42.0));
    assert_eq!(token.kind, TokenKind::Number);
    assert_eq!(token.lexeme, "42");
}

#[test]
fn grouping_token_is_opening_paren() {
    let expr = parse_source("(1)");
    assert_eq!(expr.token().map(|t| t.kind), Some(TokenKind::LeftParen));
}

#[test]
fn string_literal_value() {
    let expr = parse_source("\"lox\"");
    assert!(matches!(
        expr,
        Expr::Literal { value: Value::Str(ref s), .. } if s == "lox"
    ));
}

#[test]
fn parsed_tree_is_complete() {
    for input in ["1", "-(2 + 3) * 4", "\"a\" == \"b\" != false"] {
        assert!(parse_source(input).is_complete(), "{input}");
    }
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn identifier_is_not_an_expression() {
    let err = parse(&tokens("x")).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    assert_eq!(err.to_string(), "expected expression at 'x' on line 1");
}

#[test]
fn empty_input_expects_expression_at_end() {
    let err = parse(&tokens("")).unwrap_err();
    assert_eq!(err.token.kind, TokenKind::Eof);
    assert_eq!(err.to_string(), "expected expression at end on line 1");
}

#[test]
fn error_inside_grouping_aborts() {
    let messages = collect_messages(|r| {
        assert!(parse_with(&tokens("(1 + )"), r).is_err());
    });
    assert_eq!(messages, vec!["expected expression at ')' on line 1"]);
}

#[test]
fn missing_paren_reports_and_continues() {
    let messages = collect_messages(|r| {
        let expr = parse_with(&tokens("(1 + 2 * 3"), r).expect("should recover");
        assert_eq!(lox_trace::printer::format(&expr), "(group (+ 1 (* 2 3)))");
    });
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("expected ')' after expression"));
}

#[test]
fn missing_paren_error_names_the_expected_token() {
    let mut errors = Vec::new();
    let tokens = tokens("(1 2");
    let expr = parse_with(&tokens, &mut |m: &str| errors.push(m.to_string()));
    assert!(expr.is_ok());
    assert_eq!(errors, vec!["expected ')' after expression at '2' on line 1"]);
}

#[test]
fn parse_str_lex_error() {
    let err = parse_str("1 + @").unwrap_err();
    assert!(matches!(err, Error::Lex(_)));
}

#[test]
fn parse_str_parse_error() {
    let err = parse_str("1 +").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.to_string(), "expected expression at end on line 1");
}

#[test]
fn error_on_later_line() {
    let err = parse_str("1 +\n\n*").unwrap_err();
    assert_eq!(err.to_string(), "expected expression at '*' on line 3");
}

#[test]
fn missing_token_kind_carries_expected() {
    let tokens = tokens("(1");
    let messages = collect_messages(|r| {
        parse_with(&tokens, r).expect("should recover");
    });
    assert_eq!(messages, vec!["expected ')' after expression at end on line 1"]);
    let kind = ParseErrorKind::MissingToken {
        expected: TokenKind::RightParen,
        message: "expected ')' after expression".to_string(),
    };
    assert_eq!(kind.to_string(), "expected ')' after expression");
}
