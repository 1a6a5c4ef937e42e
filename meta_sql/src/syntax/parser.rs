//! Statement parser over a token stream
//!
//! [`SqlParser`] drives the grammar builders and adds what a single rule does
//! not know about: the `;` terminator, trailing input, statement counts,
//! nesting limits and a bounded error history for diagnostics.

use crate::config::compile_time::syntax::*;
use crate::config::runtime::ParserPreferences;
use crate::grammar::ast::nodes::SqlStatement;
use crate::grammar::builders::{dispatch, Parser};
use crate::logging::codes;
use crate::syntax::error::{ParseError, ParseResult, SyntaxError};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::VecDeque;

pub struct SqlParser {
    tokens: TokenStream,
    context_stack: Vec<String>,
    error_history: VecDeque<ParseError>,
    parse_depth: usize,
    preferences: ParserPreferences,
}

impl SqlParser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_preferences(tokens, ParserPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream, preferences: ParserPreferences) -> Self {
        log_debug!("Creating SQL parser",
            "tokens" => tokens.len(),
            "max_depth" => preferences.max_parse_depth
        );

        Self {
            tokens,
            context_stack: Vec::new(),
            error_history: VecDeque::new(),
            parse_depth: 0,
            preferences,
        }
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    fn max_depth(&self) -> usize {
        self.preferences.max_parse_depth.min(MAX_PARSE_DEPTH)
    }

    // === STATEMENTS ===

    /// Parse one statement at the cursor; the terminator is left in place
    pub fn parse_statement(&mut self) -> ParseResult<SqlStatement> {
        let leader = self.tokens.current().text.clone();
        self.push_context(&leader);

        let start = self.tokens.save_position();
        let result = dispatch::parse_statement(self);
        self.parse_depth = 0;

        match &result {
            Ok(statement) => {
                log_success!(codes::success::STATEMENT_PARSED, "Statement parsed",
                    "kind" => statement.kind(),
                    "position" => statement.position(),
                    "tokens" => self.tokens.save_position() - start
                );
            }
            Err(error) => {
                log_error!(error.error_code(), "Statement parsing failed",
                    span = error.span().unwrap_or_else(|| self.tokens.current_span()),
                    "context" => self.current_context(),
                    "error" => error
                );
                self.record_error(error.clone());
            }
        }

        self.pop_context();
        result
    }

    /// Exactly one statement, an optional `;`, then end of input
    pub fn parse_single_statement(&mut self) -> ParseResult<SqlStatement> {
        if self.tokens.is_empty() {
            let error: ParseError = SyntaxError::EmptyTokenStream.into();
            log_error!(error.error_code(), "Cannot parse empty token stream");
            self.record_error(error.clone());
            return Err(error);
        }

        let statement = self.parse_statement()?;
        self.tokens.consume_if(|t| *t == Token::Semicolon);

        if !self.tokens.is_at_end() {
            let current = self.tokens.current();
            let error: ParseError = SyntaxError::TrailingInput {
                found: current.token.describe(),
                span: current.span,
            }
            .into();
            log_error!(error.error_code(), "Input continues after statement",
                span = current.span
            );
            self.record_error(error.clone());
            return Err(error);
        }

        Ok(statement)
    }

    /// `;`-separated statements; empty statements are skipped
    pub fn parse_script(&mut self) -> ParseResult<Vec<SqlStatement>> {
        let mut statements = Vec::new();

        loop {
            while self.tokens.consume_if(|t| *t == Token::Semicolon).is_some() {}
            if self.tokens.is_at_end() {
                break;
            }

            if statements.len() >= MAX_STATEMENTS_PER_SCRIPT {
                let error: ParseError = SyntaxError::TooManyStatements {
                    limit: MAX_STATEMENTS_PER_SCRIPT,
                    span: self.tokens.current_span(),
                }
                .into();
                log_error!(error.error_code(), "Statement limit exceeded",
                    "limit" => MAX_STATEMENTS_PER_SCRIPT
                );
                self.record_error(error.clone());
                return Err(error);
            }

            statements.push(self.parse_statement()?);

            if self.tokens.consume_if(|t| *t == Token::Semicolon).is_none()
                && !self.tokens.is_at_end()
            {
                let error: ParseError = self.unexpected(&["';'"]).into();
                log_error!(error.error_code(), "Missing statement terminator",
                    span = self.tokens.current_span()
                );
                self.record_error(error.clone());
                return Err(error);
            }
        }

        log_debug!("Script parsed", "statements" => statements.len());
        Ok(statements)
    }

    // === CONTEXT TRACKING ===

    pub fn push_context(&mut self, context: &str) {
        if self.context_stack.len() >= MAX_CONTEXT_STACK_DEPTH {
            log_warning!("Context stack depth limit reached, dropping oldest context");
            self.context_stack.remove(0);
        }
        self.context_stack.push(context.to_string());
    }

    pub fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    pub fn current_context(&self) -> String {
        if self.context_stack.is_empty() {
            "top-level".to_string()
        } else {
            self.context_stack.join(" -> ")
        }
    }

    // === ERROR HISTORY ===

    fn record_error(&mut self, error: ParseError) {
        if !self.preferences.record_error_history {
            return;
        }
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    pub fn error_history(&self) -> Vec<&ParseError> {
        self.error_history.iter().collect()
    }

    // === DIAGNOSTICS ===

    /// Source-mapped rendering of `error`
    pub fn format_error(&self, error: &ParseError) -> String {
        let span = error.span().unwrap_or_else(|| self.tokens.current_span());
        self.tokens.format_error(span, &error.to_string())
    }

    pub fn diagnostic_info(&self) -> String {
        format!(
            "Parser State:\n  {}\n  Context: {}\n  Depth: {}/{}\n  Errors: {}",
            self.tokens.diagnostic(),
            self.current_context(),
            self.parse_depth,
            self.max_depth(),
            self.error_history.len()
        )
    }
}

impl Parser for SqlParser {
    fn current(&self) -> &SpannedToken {
        self.tokens.current()
    }

    fn peek(&self, n: usize) -> &SpannedToken {
        self.tokens.peek_ahead(n.min(MAX_LOOKAHEAD_TOKENS))
    }

    fn advance(&mut self) -> SpannedToken {
        self.tokens.advance()
    }

    fn enter_nested(&mut self) -> Result<(), SyntaxError> {
        let limit = self.max_depth();
        if self.parse_depth >= limit {
            let span: Span = self.tokens.current_span();
            log_error!(codes::syntax::MAX_RECURSION_DEPTH, "Maximum nesting depth exceeded",
                span = span,
                "depth" => self.parse_depth,
                "max_depth" => limit
            );
            return Err(SyntaxError::MaxRecursionDepth { limit, span });
        }
        self.parse_depth += 1;
        Ok(())
    }

    fn exit_nested(&mut self) {
        self.parse_depth = self.parse_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::StatementKind;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn parser(sql: &str) -> SqlParser {
        SqlParser::new(tokenize(sql).unwrap())
    }

    #[test]
    fn single_statement_allows_terminator() {
        let statement = parser("SHOW FILES FROM dfs.tmp;").parse_single_statement().unwrap();
        assert_eq!(statement.kind(), StatementKind::ShowFiles);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let mut parser = parser("USE dfs; USE cp");
        let error = parser.parse_single_statement().unwrap_err();
        assert_matches!(error, ParseError::Syntax(SyntaxError::TrailingInput { .. }));
        assert_eq!(parser.error_history().len(), 1);
    }

    #[test]
    fn empty_stream() {
        let error = parser("-- nothing here").parse_single_statement().unwrap_err();
        assert_matches!(error, ParseError::Syntax(SyntaxError::EmptyTokenStream));
    }

    #[test]
    fn script_skips_empty_statements() {
        let statements = parser(";; USE dfs ;; SHOW TABLES; DROP VIEW v")
            .parse_script()
            .unwrap();
        let kinds: Vec<StatementKind> = statements.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StatementKind::UseSchema,
                StatementKind::ShowTables,
                StatementKind::DropView
            ]
        );
    }

    #[test]
    fn script_requires_separator() {
        let error = parser("USE dfs SHOW TABLES").parse_script().unwrap_err();
        assert_eq!(error.as_syntax().unwrap().expected(), ["';'"]);
    }

    #[test]
    fn nesting_limit_from_preferences() {
        let preferences = ParserPreferences {
            max_parse_depth: 4,
            record_error_history: false,
        };
        let tokens = tokenize("SHOW TABLES WHERE ((((((a = 1))))))").unwrap();
        let mut parser = SqlParser::with_preferences(tokens, preferences);
        let error = parser.parse_single_statement().unwrap_err();
        assert_matches!(
            error,
            ParseError::Syntax(SyntaxError::MaxRecursionDepth { limit: 4, .. })
        );
        assert!(parser.error_history().is_empty());
    }

    #[test]
    fn format_error_points_at_source() {
        let mut parser = parser("SHOW TABLES LIKE 42");
        let error = parser.parse_single_statement().unwrap_err();
        let rendered = parser.format_error(&error);
        assert!(rendered.contains("1:18"));
        assert!(rendered.contains("SHOW TABLES LIKE 42"));
    }

    #[test]
    fn diagnostic_info_reports_context() {
        let parser = parser("USE dfs");
        let info = parser.diagnostic_info();
        assert!(info.contains("Context: top-level"));
    }
}
