//! Cursor over significant tokens
//!
//! Whitespace and comments stay in the stream so spans and source text remain
//! exact, but navigation only ever lands on significant tokens. The stream
//! always ends in an `Eof` token and the cursor never moves past it.

use crate::tokens::token::Token;
use crate::utils::{Position, SourceMap, Span};
use serde::{Deserialize, Serialize};

/// A token, its source span and the exact source text it was lexed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span, text: impl Into<String>) -> Self {
        Self {
            token,
            span,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenStream {
    all_tokens: Vec<SpannedToken>,
    /// Indices into `all_tokens` of significant tokens; the last one is `Eof`
    significant_indices: Vec<usize>,
    position: usize,
    source_map: SourceMap,
}

impl TokenStream {
    pub fn with_source_map(mut all_tokens: Vec<SpannedToken>, source_map: SourceMap) -> Self {
        if !matches!(all_tokens.last(), Some(t) if t.token == Token::Eof) {
            let end = all_tokens
                .last()
                .map(|t| t.span.end)
                .unwrap_or_else(Position::start);
            all_tokens.push(SpannedToken::new(Token::Eof, Span::point(end), ""));
        }

        let significant_indices: Vec<usize> = all_tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.token.is_significant())
            .map(|(i, _)| i)
            .collect();

        crate::log_debug!("Token stream built",
            "total_tokens" => all_tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        Self {
            all_tokens,
            significant_indices,
            position: 0,
            source_map,
        }
    }

    fn at(&self, position: usize) -> &SpannedToken {
        let last = self.significant_indices.len() - 1;
        &self.all_tokens[self.significant_indices[position.min(last)]]
    }

    /// Current significant token (`Eof` once input is exhausted)
    pub fn current(&self) -> &SpannedToken {
        self.at(self.position)
    }

    pub fn current_token(&self) -> &Token {
        &self.current().token
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Significant token `n` positions ahead of the cursor (0 is current)
    pub fn peek_ahead(&self, n: usize) -> &SpannedToken {
        self.at(self.position + n)
    }

    /// Move to the next significant token and return the one just consumed
    pub fn advance(&mut self) -> SpannedToken {
        let consumed = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        consumed
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token() == &Token::Eof
    }

    /// Number of significant tokens, including `Eof`
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    /// True when the stream holds nothing but `Eof`
    pub fn is_empty(&self) -> bool {
        self.significant_indices.len() <= 1
    }

    pub fn check_token(&self, expected: &Token) -> bool {
        self.current_token() == expected
    }

    /// Consume the current token if it satisfies `predicate`
    pub fn consume_if<F>(&mut self, predicate: F) -> Option<SpannedToken>
    where
        F: FnOnce(&Token) -> bool,
    {
        if predicate(self.current_token()) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn save_position(&self) -> usize {
        self.position
    }

    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }

    /// Render an error against the source text
    pub fn format_error(&self, span: Span, message: &str) -> String {
        self.source_map.format_error(&span, message)
    }

    pub fn diagnostic(&self) -> String {
        let current = self.current();
        format!(
            "TokenStream(pos: {}/{}, current: {} at {})",
            self.position,
            self.significant_indices.len(),
            current.token.describe(),
            current.span
        )
    }
}
