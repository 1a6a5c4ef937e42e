//! Parse-time error types
//!
//! A statement rule fails with either a [`SyntaxError`] (the token sequence
//! does not match) or a [`SemanticError`] (it matches, but violates a guard
//! such as the no-wildcard field list). Both abort the statement.

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type ParseResult<T> = Result<T, ParseError>;

fn expected_list(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [single] => single.clone(),
        [init @ .., last] => format!("one of {} or {}", init.join(", "), last),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected {found} at {span}: expected {}", expected_list(.expected))]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input at {span}: expected {}", expected_list(.expected))]
    UnexpectedEndOfInput { expected: Vec<String>, span: Span },

    #[error("Empty token stream - no statement to parse")]
    EmptyTokenStream,

    #[error("Unexpected {found} after end of statement at {span}")]
    TrailingInput { found: String, span: Span },

    #[error("Script contains more than {limit} statements")]
    TooManyStatements { limit: usize, span: Span },

    #[error("Maximum nesting depth {limit} exceeded at {span}")]
    MaxRecursionDepth { limit: usize, span: Span },
}

impl SyntaxError {
    /// Mismatch at `span`; end of input gets its own variant
    pub fn unexpected(expected: Vec<String>, found: &crate::tokens::Token, span: Span) -> Self {
        if matches!(found, crate::tokens::Token::Eof) {
            Self::UnexpectedEndOfInput { expected, span }
        } else {
            Self::UnexpectedToken {
                expected,
                found: found.describe(),
                span,
            }
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::EmptyTokenStream => codes::syntax::EMPTY_TOKEN_STREAM,
            Self::TrailingInput { .. } => codes::syntax::TRAILING_INPUT,
            Self::TooManyStatements { .. } => codes::syntax::TOO_MANY_STATEMENTS,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::TrailingInput { span, .. }
            | Self::TooManyStatements { span, .. }
            | Self::MaxRecursionDepth { span, .. } => Some(*span),
            Self::EmptyTokenStream => None,
        }
    }

    /// Expected-token set, empty for errors that are not mismatches
    pub fn expected(&self) -> &[String] {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEndOfInput { expected, .. } => {
                expected
            }
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    ConflictingCreateModifiers,
    WildcardInFieldList,
}

/// Guard violation detected while a rule was matching
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {span}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
    pub span: Span,
}

impl SemanticError {
    pub fn wildcard_in_field_list(label: &str, span: Span) -> Self {
        Self {
            kind: SemanticErrorKind::WildcardInFieldList,
            message: format!("{}'s field list has a '*', which is invalid.", label),
            span,
        }
    }

    /// `object` is the lower-case statement object, e.g. "view"
    pub fn conflicting_create_modifiers(object: &str, span: Span) -> Self {
        Self {
            kind: SemanticErrorKind::ConflictingCreateModifiers,
            message: format!(
                "Create {} statement cannot have both <OR REPLACE> and <IF NOT EXISTS> clause",
                object
            ),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self.kind {
            SemanticErrorKind::ConflictingCreateModifiers => {
                codes::semantic::CONFLICTING_CREATE_MODIFIERS
            }
            SemanticErrorKind::WildcardInFieldList => codes::semantic::WILDCARD_IN_FIELD_LIST,
        }
    }
}

/// Any failure turning statement text into an AST
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl ParseError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(e) => e.error_code(),
            Self::Syntax(e) => e.error_code(),
            Self::Semantic(e) => e.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical(e) => Some(e.span()),
            Self::Syntax(e) => e.span(),
            Self::Semantic(e) => Some(e.span),
        }
    }

    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            Self::Semantic(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;
    use assert_matches::assert_matches;

    #[test]
    fn expected_set_is_listed() {
        let error = SyntaxError::unexpected(
            vec!["TABLES".into(), "FILES".into(), "SCHEMAS".into()],
            &Token::Identifier("foo".into()),
            Span::dummy(),
        );
        assert_eq!(
            error.to_string(),
            format!(
                "Unexpected identifier 'foo' at {}: expected one of TABLES, FILES or SCHEMAS",
                Span::dummy()
            )
        );
        assert_eq!(error.expected().len(), 3);
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_TOKEN);
    }

    #[test]
    fn eof_becomes_end_of_input() {
        let error = SyntaxError::unexpected(vec!["AS".into()], &Token::Eof, Span::dummy());
        assert_matches!(error, SyntaxError::UnexpectedEndOfInput { .. });
        assert!(error.to_string().ends_with("expected AS"));
    }

    #[test]
    fn semantic_messages() {
        let error = SemanticError::wildcard_in_field_list("Partition", Span::dummy());
        assert_eq!(error.message, "Partition's field list has a '*', which is invalid.");

        let error = SemanticError::conflicting_create_modifiers("storage", Span::dummy());
        assert_eq!(
            error.message,
            "Create storage statement cannot have both <OR REPLACE> and <IF NOT EXISTS> clause"
        );
        assert_eq!(error.error_code(), codes::semantic::CONFLICTING_CREATE_MODIFIERS);
    }

    #[test]
    fn parse_error_wraps_stages() {
        let error: ParseError = SemanticError::wildcard_in_field_list("View", Span::dummy()).into();
        assert_matches!(error.as_semantic(), Some(_));
        assert_eq!(error.error_code(), codes::semantic::WILDCARD_IN_FIELD_LIST);
        assert_eq!(error.span(), Some(Span::dummy()));
    }
}
