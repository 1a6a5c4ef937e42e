//! Clause helpers shared by several statement rules

use super::atomic::{parse_compound_identifier, parse_object_name, parse_string_literal, Parser};
use super::expressions::parse_expression;
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{ParseResult, SemanticError};
use crate::tokens::Token;

// === FIELD LISTS ===

/// field_list ::= "(" compound_identifier ("," compound_identifier)* ")"
///
/// `label` names the list owner in the wildcard error ("View", "Table", "Partition").
pub fn parse_required_field_list(
    parser: &mut dyn Parser,
    label: &str,
) -> ParseResult<Vec<CompoundIdentifier>> {
    parser.expect_token(Token::LeftParen)?;

    let mut fields = Vec::new();
    loop {
        let field = parse_compound_identifier(parser)?;
        if field.is_star() {
            return Err(SemanticError::wildcard_in_field_list(label, field.position).into());
        }
        fields.push(field);

        if parser.consume_token(&Token::Comma).is_none() {
            break;
        }
    }

    if parser.consume_token(&Token::RightParen).is_none() {
        return Err(parser.unexpected(&["','", "')'"]).into());
    }
    Ok(fields)
}

/// Field list when the next token is `(`, otherwise empty
pub fn parse_optional_field_list(
    parser: &mut dyn Parser,
    label: &str,
) -> ParseResult<Vec<CompoundIdentifier>> {
    if parser.check_token(&Token::LeftParen) {
        parse_required_field_list(parser, label)
    } else {
        Ok(Vec::new())
    }
}

// === EXISTENCE CHECKS ===

/// `IF EXISTS`
pub fn parse_if_exists(parser: &mut dyn Parser) -> ParseResult<bool> {
    if parser.consume_keyword(Keyword::If).is_none() {
        return Ok(false);
    }
    parser.expect_keyword(Keyword::Exists)?;
    Ok(true)
}

/// `IF NOT EXISTS`
pub fn parse_if_not_exists(parser: &mut dyn Parser) -> ParseResult<bool> {
    if parser.consume_keyword(Keyword::If).is_none() {
        return Ok(false);
    }
    parser.expect_keyword(Keyword::Not)?;
    parser.expect_keyword(Keyword::Exists)?;
    Ok(true)
}

/// `[OR REPLACE]` after CREATE, then the object keyword, then `[IF NOT EXISTS]`
///
/// `object` is the lower-case object word used in the conflict message.
pub fn parse_create_mode(
    parser: &mut dyn Parser,
    keyword: Keyword,
    object: &str,
) -> ParseResult<CreateMode> {
    let or_replace = match parser.consume_keyword(Keyword::Or) {
        Some(_) => {
            parser.expect_keyword(Keyword::Replace)?;
            true
        }
        None => false,
    };

    parser.expect_keyword(keyword)?;

    let if_span = parser.current_span();
    let if_not_exists = parse_if_not_exists(parser)?;

    match (or_replace, if_not_exists) {
        (true, true) => Err(SemanticError::conflicting_create_modifiers(object, if_span).into()),
        (true, false) => Ok(CreateMode::OrReplace),
        (false, true) => Ok(CreateMode::IfNotExists),
        (false, false) => Ok(CreateMode::Simple),
    }
}

// === SHOW CLAUSES ===

/// `[(FROM | IN) object_name]`
pub fn parse_schema_clause(parser: &mut dyn Parser) -> ParseResult<Option<CompoundIdentifier>> {
    if parser.consume_keyword(Keyword::From).is_some()
        || parser.consume_keyword(Keyword::In).is_some()
    {
        Ok(Some(parse_object_name(parser)?))
    } else {
        Ok(None)
    }
}

/// `[LIKE string | WHERE expression]`
pub fn parse_show_filter(parser: &mut dyn Parser) -> ParseResult<ShowFilter> {
    if parser.consume_keyword(Keyword::Like).is_some() {
        Ok(ShowFilter::Like(parse_string_literal(parser)?))
    } else if parser.consume_keyword(Keyword::Where).is_some() {
        Ok(ShowFilter::Where(parse_expression(parser)?))
    } else {
        Ok(ShowFilter::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builders::atomic::test_support::Cursor;
    use crate::syntax::error::{ParseError, SemanticErrorKind, SyntaxError};
    use assert_matches::assert_matches;

    #[test]
    fn field_list_collects_names() {
        let fields = parse_required_field_list(&mut Cursor::new("(a, s.b, `c d`)"), "Table").unwrap();
        let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["a", "s.b", "`c d`"]);
    }

    #[test]
    fn optional_field_list_without_paren_is_empty() {
        let mut cursor = Cursor::new("AS SELECT 1");
        assert!(parse_optional_field_list(&mut cursor, "View").unwrap().is_empty());
        assert!(cursor.check_keyword(Keyword::As));
    }

    #[test]
    fn wildcard_in_field_list_is_rejected() {
        let error = parse_required_field_list(&mut Cursor::new("(a, *)"), "Partition").unwrap_err();
        assert_matches!(
            error,
            ParseError::Semantic(SemanticError { kind: SemanticErrorKind::WildcardInFieldList, ref message, .. })
                if message == "Partition's field list has a '*', which is invalid."
        );

        let error = parse_required_field_list(&mut Cursor::new("(t.*)"), "Table").unwrap_err();
        assert_matches!(error, ParseError::Semantic(_));
    }

    #[test]
    fn unclosed_field_list() {
        let error = parse_required_field_list(&mut Cursor::new("(a b)"), "View").unwrap_err();
        assert_matches!(error, ParseError::Syntax(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn if_exists_requires_exists() {
        assert!(parse_if_exists(&mut Cursor::new("IF EXISTS")).unwrap());
        assert!(!parse_if_exists(&mut Cursor::new("s1")).unwrap());
        assert!(parse_if_exists(&mut Cursor::new("IF s1")).is_err());
    }

    #[test]
    fn create_mode_conflict() {
        let error =
            parse_create_mode(&mut Cursor::new("OR REPLACE VIEW IF NOT EXISTS v"), Keyword::View, "view")
                .unwrap_err();
        assert_matches!(
            error,
            ParseError::Semantic(SemanticError { kind: SemanticErrorKind::ConflictingCreateModifiers, .. })
        );

        let mode = parse_create_mode(&mut Cursor::new("STORAGE IF NOT EXISTS s"), Keyword::Storage, "storage")
            .unwrap();
        assert_eq!(mode, CreateMode::IfNotExists);
    }
}
