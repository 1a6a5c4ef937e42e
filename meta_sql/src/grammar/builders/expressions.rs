//! Expression and embedded-query rules
//!
//! Precedence, loosest first:
//! ```text
//! expression     ::= and_expr (OR and_expr)*
//! and_expr       ::= not_expr (AND not_expr)*
//! not_expr       ::= NOT not_expr | comparison
//! comparison     ::= additive [cmp_op additive | [NOT] LIKE additive | IS [NOT] NULL]
//! additive       ::= multiplicative (("+" | "-" | "||") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= ("-" | "+") unary | primary
//! ```
//! Every recursive descent goes through [`Parser::enter_nested`], so input
//! such as `NOT NOT NOT ...` fails cleanly at the configured depth.

use super::atomic::{is_identifier_token, parse_compound_identifier, Parser};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::ParseResult;
use crate::tokens::Token;
use crate::utils::Span;

fn nested<T>(
    parser: &mut dyn Parser,
    rule: impl FnOnce(&mut dyn Parser) -> ParseResult<T>,
) -> ParseResult<T> {
    parser.enter_nested()?;
    let result = rule(parser);
    parser.exit_nested();
    result
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let position = left.position().merge(right.position());
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        position,
    }
}

pub fn parse_expression(parser: &mut dyn Parser) -> ParseResult<Expr> {
    nested(parser, parse_or)
}

fn parse_or(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let mut left = parse_and(parser)?;
    while parser.consume_keyword(Keyword::Or).is_some() {
        let right = parse_and(parser)?;
        left = binary(BinaryOp::Or, left, right);
    }
    Ok(left)
}

fn parse_and(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let mut left = parse_not(parser)?;
    while parser.consume_keyword(Keyword::And).is_some() {
        let right = parse_not(parser)?;
        left = binary(BinaryOp::And, left, right);
    }
    Ok(left)
}

fn parse_not(parser: &mut dyn Parser) -> ParseResult<Expr> {
    match parser.consume_keyword(Keyword::Not) {
        Some(span) => {
            let operand = nested(parser, parse_not)?;
            Ok(Expr::Unary {
                op: UnaryOp::Not,
                position: span.merge(operand.position()),
                operand: Box::new(operand),
            })
        }
        None => parse_comparison(parser),
    }
}

fn parse_comparison(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let left = parse_additive(parser)?;

    if let Some(op) = BinaryOp::comparison(parser.current_token()) {
        parser.advance();
        let right = parse_additive(parser)?;
        return Ok(binary(op, left, right));
    }

    if parser.consume_keyword(Keyword::Like).is_some() {
        let right = parse_additive(parser)?;
        return Ok(binary(BinaryOp::Like, left, right));
    }

    if parser.check_keyword(Keyword::Not) && parser.peek_keyword(1) == Some(Keyword::Like) {
        parser.advance();
        parser.advance();
        let right = parse_additive(parser)?;
        return Ok(binary(BinaryOp::NotLike, left, right));
    }

    if parser.consume_keyword(Keyword::Is).is_some() {
        let negated = parser.consume_keyword(Keyword::Not).is_some();
        let null_span = parser.expect_keyword(Keyword::Null)?;
        return Ok(Expr::IsNull {
            position: left.position().merge(null_span),
            operand: Box::new(left),
            negated,
        });
    }

    Ok(left)
}

fn parse_additive(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let mut left = parse_multiplicative(parser)?;
    loop {
        let op = match parser.current_token() {
            Token::Plus => BinaryOp::Plus,
            Token::Minus => BinaryOp::Minus,
            Token::Concat => BinaryOp::Concat,
            _ => return Ok(left),
        };
        parser.advance();
        let right = parse_multiplicative(parser)?;
        left = binary(op, left, right);
    }
}

fn parse_multiplicative(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let mut left = parse_unary(parser)?;
    loop {
        let op = match parser.current_token() {
            Token::Star => BinaryOp::Multiply,
            Token::Slash => BinaryOp::Divide,
            Token::Percent => BinaryOp::Modulo,
            _ => return Ok(left),
        };
        parser.advance();
        let right = parse_unary(parser)?;
        left = binary(op, left, right);
    }
}

fn parse_unary(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let op = match parser.current_token() {
        Token::Minus => UnaryOp::Minus,
        Token::Plus => UnaryOp::Plus,
        _ => return parse_primary(parser),
    };
    let span = parser.advance().span;
    let operand = nested(parser, parse_unary)?;
    Ok(Expr::Unary {
        op,
        position: span.merge(operand.position()),
        operand: Box::new(operand),
    })
}

fn parse_primary(parser: &mut dyn Parser) -> ParseResult<Expr> {
    let span = parser.current_span();
    let literal = match parser.current_token() {
        Token::Number(text) => Some(Expr::Number {
            text: text.clone(),
            position: span,
        }),
        Token::StringLiteral(value) => Some(Expr::String(StringLiteral::new(value.clone(), span))),
        Token::Keyword(Keyword::True) => Some(Expr::Boolean {
            value: true,
            position: span,
        }),
        Token::Keyword(Keyword::False) => Some(Expr::Boolean {
            value: false,
            position: span,
        }),
        Token::Keyword(Keyword::Null) => Some(Expr::Null { position: span }),
        _ => None,
    };
    if let Some(expr) = literal {
        parser.advance();
        return Ok(expr);
    }

    if parser.consume_token(&Token::LeftParen).is_some() {
        let inner = parse_expression(parser)?;
        parser.expect_token(Token::RightParen)?;
        return Ok(inner);
    }

    if is_identifier_token(parser.current_token()) {
        let name = parse_compound_identifier(parser)?;
        if !name.is_star() && parser.check_token(&Token::LeftParen) {
            return parse_function_call(parser, name);
        }
        return Ok(Expr::Identifier(name));
    }

    Err(parser.unexpected(&["expression"]).into())
}

/// Arguments after `name`; `*` is accepted as the sole argument, as in `count(*)`
fn parse_function_call(parser: &mut dyn Parser, name: CompoundIdentifier) -> ParseResult<Expr> {
    parser.expect_token(Token::LeftParen)?;
    let mut args = Vec::new();

    if parser.check_token(&Token::Star) && parser.peek(1).token == Token::RightParen {
        let span = parser.advance().span;
        args.push(Expr::Identifier(CompoundIdentifier::star(Vec::new(), span)));
    } else if !parser.check_token(&Token::RightParen) {
        loop {
            args.push(parse_expression(parser)?);
            if parser.consume_token(&Token::Comma).is_none() {
                break;
            }
        }
    }

    let close = parser.expect_token(Token::RightParen)?;
    Ok(Expr::Function {
        position: name.position.merge(close),
        name,
        args,
    })
}

// === EMBEDDED QUERIES ===

const QUERY_START: [&str; 4] = ["SELECT", "VALUES", "WITH", "'('"];

/// Capture the query body of `CREATE VIEW ... AS` / `CREATE TABLE ... AS`
///
/// The query runs until `;`, end of input, or a `)` that closes nothing.
/// Parentheses inside it must balance.
pub fn parse_query(parser: &mut dyn Parser) -> ParseResult<QueryExpr> {
    let starts_query = match parser.current_token() {
        Token::Keyword(keyword) => keyword.starts_query(),
        Token::LeftParen => true,
        _ => false,
    };
    if !starts_query {
        return Err(parser.unexpected(&QUERY_START).into());
    }

    let first = parser.current_span();
    let mut last = first;
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    loop {
        match parser.current_token() {
            Token::Eof | Token::Semicolon => break,
            Token::RightParen if depth == 0 => break,
            Token::LeftParen => depth += 1,
            Token::RightParen => depth -= 1,
            _ => {}
        }
        let consumed = parser.advance();
        last = consumed.span;
        tokens.push(consumed.token);
    }

    if depth > 0 {
        return Err(parser.unexpected(&["')'"]).into());
    }

    Ok(QueryExpr {
        tokens,
        position: Span::new(first.start, last.end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builders::atomic::test_support::Cursor;
    use crate::syntax::error::{ParseError, SyntaxError};
    use assert_matches::assert_matches;

    fn expr(sql: &str) -> Expr {
        parse_expression(&mut Cursor::new(sql)).unwrap()
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let parsed = expr("a = 1 OR b = 2 AND c = 3");
        assert_matches!(parsed, Expr::Binary { op: BinaryOp::Or, ref right, .. }
            if matches!(right.as_ref(), Expr::Binary { op: BinaryOp::And, .. }));
        assert_eq!(parsed.to_string(), "a = 1 OR b = 2 AND c = 3");
    }

    #[test]
    fn parentheses_survive_rendering() {
        assert_eq!(expr("(a OR b) AND c").to_string(), "(a OR b) AND c");
        assert_eq!(expr("x - (y - z)").to_string(), "x - (y - z)");
        assert_eq!(expr("-(-a)").to_string(), "-(-a)");
    }

    #[test]
    fn like_and_null_predicates() {
        assert_matches!(expr("name NOT LIKE 'tmp%'"), Expr::Binary { op: BinaryOp::NotLike, .. });
        assert_matches!(expr("owner IS NOT NULL"), Expr::IsNull { negated: true, .. });
        assert_matches!(
            expr("NOT schema_name LIKE 'dfs%'"),
            Expr::Unary { op: UnaryOp::Not, .. }
        );
    }

    #[test]
    fn function_calls() {
        let parsed = expr("upper(TABLE_NAME) = 'T' AND count(*) > 0");
        assert_eq!(parsed.to_string(), "upper(TABLE_NAME) = 'T' AND count(*) > 0");
    }

    #[test]
    fn arithmetic_precedence() {
        let parsed = expr("1 + 2 * 3 || 'x'");
        assert_matches!(parsed, Expr::Binary { op: BinaryOp::Concat, .. });
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}a{}", "(".repeat(40), ")".repeat(40));
        let error = parse_expression(&mut Cursor::new(&deep)).unwrap_err();
        assert_matches!(error, ParseError::Syntax(SyntaxError::MaxRecursionDepth { .. }));
    }

    #[test]
    fn query_stops_at_semicolon() {
        let mut cursor = Cursor::new("SELECT a, (b + 1) FROM s WHERE c = 'x'; SHOW FILES");
        let query = parse_query(&mut cursor).unwrap();
        assert_eq!(query.sql(), "SELECT a, (b + 1) FROM s WHERE c = 'x'");
        assert!(cursor.check_token(&Token::Semicolon));
    }

    #[test]
    fn query_stops_at_unbalanced_paren() {
        let mut cursor = Cursor::new("SELECT 1) tail");
        let query = parse_query(&mut cursor).unwrap();
        assert_eq!(query.tokens.len(), 2);
        assert!(cursor.check_token(&Token::RightParen));
    }

    #[test]
    fn query_must_start_with_select() {
        let error = parse_query(&mut Cursor::new("DROP TABLE t")).unwrap_err();
        assert_eq!(
            error.as_syntax().map(|e| e.expected().to_vec()),
            Some(vec!["SELECT".into(), "VALUES".into(), "WITH".into(), "'('".into()])
        );
    }

    #[test]
    fn unclosed_query_paren() {
        let error = parse_query(&mut Cursor::new("(SELECT 1")).unwrap_err();
        assert_matches!(error, ParseError::Syntax(SyntaxError::UnexpectedEndOfInput { .. }));
    }
}
