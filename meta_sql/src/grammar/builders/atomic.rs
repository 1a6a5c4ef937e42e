//! Parser interface and primitive rules
//!
//! Every builder takes `&mut dyn Parser`, so rules can be driven by the
//! full [`SqlParser`](crate::syntax::SqlParser) or by a bare cursor in tests.

use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{ParseResult, SyntaxError};
use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;

/// Cursor operations the grammar builders rely on
pub trait Parser {
    // === NAVIGATION ===
    fn current(&self) -> &SpannedToken;

    /// Significant token `n` positions ahead; 0 is the current token
    fn peek(&self, n: usize) -> &SpannedToken;

    /// Consume and return the current token; never moves past end of input
    fn advance(&mut self) -> SpannedToken;

    // === NESTING ===
    /// Called before descending into a nested expression
    fn enter_nested(&mut self) -> Result<(), SyntaxError>;
    fn exit_nested(&mut self);

    // === PROVIDED ===
    fn current_token(&self) -> &Token {
        &self.current().token
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_token().is_keyword(keyword)
    }

    fn peek_keyword(&self, n: usize) -> Option<Keyword> {
        self.peek(n).token.as_keyword()
    }

    fn check_token(&self, token: &Token) -> bool {
        self.current_token() == token
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Option<Span> {
        if self.check_keyword(keyword) {
            Some(self.advance().span)
        } else {
            None
        }
    }

    fn consume_token(&mut self, token: &Token) -> Option<Span> {
        if self.check_token(token) {
            Some(self.advance().span)
        } else {
            None
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Span, SyntaxError> {
        self.consume_keyword(keyword)
            .ok_or_else(|| self.unexpected(&[keyword.as_str()]))
    }

    /// Consume whichever of `keywords` is current
    fn expect_any_keyword(&mut self, keywords: &[Keyword]) -> Result<(Keyword, Span), SyntaxError> {
        match self.current_token().as_keyword() {
            Some(keyword) if keywords.contains(&keyword) => Ok((keyword, self.advance().span)),
            _ => {
                let expected: Vec<&str> = keywords.iter().map(|k| k.as_str()).collect();
                Err(self.unexpected(&expected))
            }
        }
    }

    fn expect_token(&mut self, token: Token) -> Result<Span, SyntaxError> {
        match self.consume_token(&token) {
            Some(span) => Ok(span),
            None => {
                let description = token.describe();
                Err(self.unexpected(&[description.as_str()]))
            }
        }
    }

    /// Mismatch error at the current token
    fn unexpected(&self, expected: &[&str]) -> SyntaxError {
        let current = self.current();
        SyntaxError::unexpected(
            expected.iter().map(|e| e.to_string()).collect(),
            &current.token,
            current.span,
        )
    }
}

/// Whether `token` can start a name
pub fn is_identifier_token(token: &Token) -> bool {
    match token {
        Token::Identifier(_) | Token::QuotedIdentifier(_) => true,
        Token::Keyword(keyword) => !keyword.is_reserved(),
        _ => false,
    }
}

// === NAMES ===

/// identifier ::= IDENTIFIER | QUOTED_IDENTIFIER | non-reserved keyword
pub fn parse_identifier(parser: &mut dyn Parser) -> ParseResult<Identifier> {
    let current = parser.current();
    let name = match &current.token {
        Token::Identifier(name) => name.clone(),
        Token::QuotedIdentifier(name) if !name.is_empty() => name.clone(),
        // Category words such as `metadata` stay usable as names
        Token::Keyword(keyword) if !keyword.is_reserved() => current.text.clone(),
        Token::QuotedIdentifier(_) => return Err(parser.unexpected(&["non-empty identifier"]).into()),
        _ => return Err(parser.unexpected(&["identifier"]).into()),
    };
    let span = parser.advance().span;
    Ok(Identifier::new(name, span))
}

/// compound_identifier ::= identifier ("." identifier)* ["." "*"] | "*"
pub fn parse_compound_identifier(parser: &mut dyn Parser) -> ParseResult<CompoundIdentifier> {
    if let Some(span) = parser.consume_token(&Token::Star) {
        return Ok(CompoundIdentifier::star(Vec::new(), span));
    }

    let first = parse_identifier(parser)?;
    let mut span = first.position;
    let mut names = vec![first.name];

    while parser.check_token(&Token::Dot) {
        parser.advance();
        if let Some(star) = parser.consume_token(&Token::Star) {
            return Ok(CompoundIdentifier::star(names, span.merge(star)));
        }
        let next = parse_identifier(parser)?;
        span = span.merge(next.position);
        names.push(next.name);
    }

    Ok(CompoundIdentifier::new(names, span))
}

/// object_name ::= identifier ("." identifier)*
///
/// Tables, views, schemas and columns must be named; `*` is rejected here.
pub fn parse_object_name(parser: &mut dyn Parser) -> ParseResult<CompoundIdentifier> {
    let first = parse_identifier(parser)?;
    let mut span = first.position;
    let mut names = vec![first.name];

    while parser.consume_token(&Token::Dot).is_some() {
        let next = parse_identifier(parser)?;
        span = span.merge(next.position);
        names.push(next.name);
    }

    Ok(CompoundIdentifier::new(names, span))
}

// === LITERALS ===

pub fn parse_string_literal(parser: &mut dyn Parser) -> ParseResult<StringLiteral> {
    match parser.current_token() {
        Token::StringLiteral(value) => {
            let value = value.clone();
            let span = parser.advance().span;
            Ok(StringLiteral::new(value, span))
        }
        _ => Err(parser.unexpected(&["string literal"]).into()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::lexical::tokenize;
    use crate::tokens::TokenStream;

    /// Minimal cursor over a token stream with a fixed nesting limit
    pub struct Cursor {
        pub tokens: TokenStream,
        pub depth: usize,
        pub max_depth: usize,
    }

    impl Cursor {
        pub fn new(sql: &str) -> Self {
            Self {
                tokens: tokenize(sql).unwrap(),
                depth: 0,
                max_depth: 16,
            }
        }
    }

    impl Parser for Cursor {
        fn current(&self) -> &SpannedToken {
            self.tokens.current()
        }

        fn peek(&self, n: usize) -> &SpannedToken {
            self.tokens.peek_ahead(n)
        }

        fn advance(&mut self) -> SpannedToken {
            self.tokens.advance()
        }

        fn enter_nested(&mut self) -> Result<(), SyntaxError> {
            if self.depth >= self.max_depth {
                return Err(SyntaxError::MaxRecursionDepth {
                    limit: self.max_depth,
                    span: self.current_span(),
                });
            }
            self.depth += 1;
            Ok(())
        }

        fn exit_nested(&mut self) {
            self.depth = self.depth.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Cursor;
    use super::*;
    use crate::syntax::error::ParseError;
    use assert_matches::assert_matches;

    #[test]
    fn compound_identifier_with_schema() {
        let mut cursor = Cursor::new("dfs.tmp.`my orders` rest");
        let id = parse_compound_identifier(&mut cursor).unwrap();
        assert_eq!(id.names, vec!["dfs", "tmp", "my orders"]);
        assert!(!id.is_star());
        assert_eq!(id.position.start.offset, 0);
        assert_eq!(id.position.end.offset, 19);
        assert_eq!(cursor.current_token(), &Token::Identifier("rest".into()));
    }

    #[test]
    fn wildcards() {
        let bare = parse_compound_identifier(&mut Cursor::new("*")).unwrap();
        assert!(bare.is_star());
        assert!(bare.names.is_empty());

        let qualified = parse_compound_identifier(&mut Cursor::new("t.*")).unwrap();
        assert!(qualified.is_star());
        assert_eq!(qualified.names, vec!["t"]);
    }

    #[test]
    fn object_names_reject_wildcards() {
        let name = parse_object_name(&mut Cursor::new("dfs.tmp.t")).unwrap();
        assert_eq!(name.names, vec!["dfs", "tmp", "t"]);

        for source in ["*", "dfs.*"] {
            let error = parse_object_name(&mut Cursor::new(source)).unwrap_err();
            assert_matches!(
                error,
                ParseError::Syntax(SyntaxError::UnexpectedToken { ref expected, .. })
                    if expected == &vec!["identifier".to_string()]
            );
        }
    }

    #[test]
    fn non_reserved_keyword_keeps_spelling() {
        let id = parse_identifier(&mut Cursor::new("Metadata")).unwrap();
        assert_eq!(id.name, "Metadata");
    }

    #[test]
    fn reserved_keyword_is_not_a_name() {
        let error = parse_identifier(&mut Cursor::new("WHERE")).unwrap_err();
        assert_matches!(
            error,
            ParseError::Syntax(SyntaxError::UnexpectedToken { ref expected, .. })
                if expected == &vec!["identifier".to_string()]
        );
    }

    #[test]
    fn string_literal_value() {
        let literal = parse_string_literal(&mut Cursor::new("'it''s'")).unwrap();
        assert_eq!(literal.value, "it's");
        assert!(parse_string_literal(&mut Cursor::new("name")).is_err());
    }

    #[test]
    fn expect_any_keyword_reports_all_choices() {
        let mut cursor = Cursor::new("SHOW");
        let error = cursor
            .expect_any_keyword(&[Keyword::Describe, Keyword::Desc])
            .unwrap_err();
        assert_eq!(error.expected(), ["DESCRIBE", "DESC"]);
    }
}
