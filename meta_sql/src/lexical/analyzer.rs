//! SQL lexical analyzer
//!
//! Converts statement text into a [`TokenStream`]. Words are classified as
//! keywords case-insensitively; everything else that looks like a name is an
//! identifier. Limits come from the compile-time configuration.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token, TokenClass, TokenStream};
use crate::utils::{Position, SourceMap, Span};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' at {span}")]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    #[error("Unterminated quoted identifier starting at {span}")]
    UnterminatedIdentifier { span: Span },

    #[error("Unterminated block comment starting at {span}")]
    UnterminatedComment { span: Span },

    #[error("Invalid number '{text}' at {span}")]
    InvalidNumber { text: String, span: Span },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, span: Span },

    #[error("String literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, span: Span },

    #[error("Comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, span: Span },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnterminatedIdentifier { .. } => codes::lexical::UNTERMINATED_IDENTIFIER,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidCharacter { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedIdentifier { span }
            | LexerError::UnterminatedComment { span }
            | LexerError::InvalidNumber { span, .. }
            | LexerError::IdentifierTooLong { span, .. }
            | LexerError::StringTooLarge { span, .. }
            | LexerError::CommentTooLong { span, .. }
            | LexerError::TooManyTokens { span, .. } => *span,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    pub comment_count: usize,
    pub max_string_length: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.class() {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Literal => self.literal_tokens += 1,
            TokenClass::Operator => self.operator_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Trivia if matches!(token, Token::Comment(_)) => self.comment_count += 1,
            TokenClass::Trivia | TokenClass::End => {}
        }

        if let Token::StringLiteral(value) = token {
            self.max_string_length = self.max_string_length.max(value.len());
        }
    }
}

/// Character cursor that tracks line and column
struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    pos: Position,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            pos: Position::start(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    /// Character after the next one
    fn peek_second(&self) -> Option<char> {
        self.source[self.pos.offset..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn bump_while<F: Fn(char) -> bool>(&mut self, predicate: F) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn text_from(&self, start: Position) -> &'a str {
        &self.source[start.offset..self.pos.offset]
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos)
    }
}

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize the contents of a processed script file
    pub fn tokenize_file_result(
        &mut self,
        file_result: &FileProcessingResult,
    ) -> Result<TokenStream, LexerError> {
        log_debug!("Starting lexical analysis",
            "file" => file_result.metadata.path.display(),
            "line_count" => file_result.metadata.line_count
        );
        self.tokenize(&file_result.source)
    }

    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        let mut scanner = Scanner::new(source);
        let mut tokens: Vec<SpannedToken> = Vec::new();

        while let Some(ch) = scanner.peek() {
            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len(),
                    span: Span::point(scanner.pos),
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = error.span(),
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            let start = scanner.pos;
            let token = match self.scan_token(&mut scanner, ch) {
                Ok(token) => token,
                Err(error) => {
                    log_error!(error.error_code(), &error.to_string(), span = error.span());
                    return Err(error);
                }
            };

            self.metrics.record_token(&token, &self.preferences);
            tokens.push(SpannedToken::new(
                token,
                scanner.span_from(start),
                scanner.text_from(start),
            ));
        }

        tokens.push(SpannedToken::new(Token::Eof, Span::point(scanner.pos), ""));

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens
        );

        Ok(TokenStream::with_source_map(tokens, SourceMap::new(source)))
    }

    fn scan_token(&self, scanner: &mut Scanner<'_>, ch: char) -> Result<Token, LexerError> {
        let start = scanner.pos;

        if ch.is_whitespace() {
            scanner.bump_while(char::is_whitespace);
            return Ok(Token::Whitespace);
        }

        if is_identifier_start(ch) {
            return self.scan_word(scanner, start);
        }

        if ch.is_ascii_digit() {
            return self.scan_number(scanner, start);
        }

        match ch {
            '\'' => self.scan_string(scanner, start),
            '`' | '"' => self.scan_quoted_identifier(scanner, start, ch),
            '-' if scanner.peek_second() == Some('-') => {
                scanner.bump_while(|c| c != '\n');
                self.check_comment(scanner, start)
            }
            '/' if scanner.peek_second() == Some('*') => self.scan_block_comment(scanner, start),
            _ => self.scan_symbol(scanner, start, ch),
        }
    }

    fn scan_word(&self, scanner: &mut Scanner<'_>, start: Position) -> Result<Token, LexerError> {
        scanner.bump_while(is_identifier_char);
        let text = scanner.text_from(start);

        let length = text.chars().count();
        if length > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length,
                span: scanner.span_from(start),
            });
        }

        Ok(match Keyword::from_str(text) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(text.to_string()),
        })
    }

    fn scan_number(&self, scanner: &mut Scanner<'_>, start: Position) -> Result<Token, LexerError> {
        scanner.bump_while(|c| c.is_ascii_digit());

        if scanner.peek() == Some('.') && scanner.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            scanner.bump();
            scanner.bump_while(|c| c.is_ascii_digit());
        }

        if matches!(scanner.peek(), Some('e' | 'E')) {
            scanner.bump();
            if matches!(scanner.peek(), Some('+' | '-')) {
                scanner.bump();
            }
            if !scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
                scanner.bump_while(is_identifier_char);
                return Err(LexerError::InvalidNumber {
                    text: scanner.text_from(start).to_string(),
                    span: scanner.span_from(start),
                });
            }
            scanner.bump_while(|c| c.is_ascii_digit());
        }

        if scanner.peek().is_some_and(is_identifier_char) {
            scanner.bump_while(is_identifier_char);
            return Err(LexerError::InvalidNumber {
                text: scanner.text_from(start).to_string(),
                span: scanner.span_from(start),
            });
        }

        Ok(Token::Number(scanner.text_from(start).to_string()))
    }

    /// `'...'` with `''` as an escaped quote
    fn scan_string(&self, scanner: &mut Scanner<'_>, start: Position) -> Result<Token, LexerError> {
        let content = scan_delimited(scanner, '\'')
            .ok_or_else(|| LexerError::UnterminatedString { span: scanner.span_from(start) })?;

        if content.len() > MAX_STRING_SIZE {
            return Err(LexerError::StringTooLarge {
                size: content.len(),
                span: scanner.span_from(start),
            });
        }

        Ok(Token::StringLiteral(content))
    }

    fn scan_quoted_identifier(
        &self,
        scanner: &mut Scanner<'_>,
        start: Position,
        quote: char,
    ) -> Result<Token, LexerError> {
        let name = scan_delimited(scanner, quote).ok_or_else(|| {
            LexerError::UnterminatedIdentifier {
                span: scanner.span_from(start),
            }
        })?;

        let length = name.chars().count();
        if length > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length,
                span: scanner.span_from(start),
            });
        }

        Ok(Token::QuotedIdentifier(name))
    }

    fn scan_block_comment(
        &self,
        scanner: &mut Scanner<'_>,
        start: Position,
    ) -> Result<Token, LexerError> {
        scanner.bump();
        scanner.bump();

        loop {
            match scanner.bump() {
                Some('*') if scanner.peek() == Some('/') => {
                    scanner.bump();
                    return self.check_comment(scanner, start);
                }
                Some(_) => {}
                None => {
                    return Err(LexerError::UnterminatedComment {
                        span: scanner.span_from(start),
                    })
                }
            }
        }
    }

    fn check_comment(&self, scanner: &Scanner<'_>, start: Position) -> Result<Token, LexerError> {
        let text = scanner.text_from(start);
        let length = text.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(LexerError::CommentTooLong {
                length,
                span: scanner.span_from(start),
            });
        }
        Ok(Token::Comment(text.to_string()))
    }

    fn scan_symbol(
        &self,
        scanner: &mut Scanner<'_>,
        start: Position,
        ch: char,
    ) -> Result<Token, LexerError> {
        scanner.bump();
        let next = scanner.peek();

        let (token, extra) = match (ch, next) {
            ('<', Some('=')) => (Token::LessThanOrEqual, true),
            ('<', Some('>')) => (Token::NotEquals, true),
            ('>', Some('=')) => (Token::GreaterThanOrEqual, true),
            ('!', Some('=')) => (Token::NotEquals, true),
            ('|', Some('|')) => (Token::Concat, true),
            ('<', _) => (Token::LessThan, false),
            ('>', _) => (Token::GreaterThan, false),
            ('=', _) => (Token::Equals, false),
            (',', _) => (Token::Comma, false),
            ('.', _) => (Token::Dot, false),
            ('(', _) => (Token::LeftParen, false),
            (')', _) => (Token::RightParen, false),
            (';', _) => (Token::Semicolon, false),
            ('*', _) => (Token::Star, false),
            ('+', _) => (Token::Plus, false),
            ('-', _) => (Token::Minus, false),
            ('/', _) => (Token::Slash, false),
            ('%', _) => (Token::Percent, false),
            _ => {
                return Err(LexerError::InvalidCharacter {
                    character: ch,
                    span: scanner.span_from(start),
                })
            }
        };

        if extra {
            scanner.bump();
        }
        Ok(token)
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume a `quote`-delimited run where a doubled quote stands for itself.
/// Returns `None` if input ends before the closing quote.
fn scan_delimited(scanner: &mut Scanner<'_>, quote: char) -> Option<String> {
    scanner.bump();
    let mut content = String::new();

    loop {
        let ch = scanner.bump()?;
        if ch == quote {
            if scanner.peek() == Some(quote) {
                scanner.bump();
                content.push(quote);
            } else {
                return Some(content);
            }
        } else {
            content.push(ch);
        }
    }
}
