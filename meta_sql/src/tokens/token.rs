//! SQL token definitions
//!
//! Operators and punctuation get dedicated variants. Keywords carry a
//! [`Keyword`]; every other word is an identifier.
use crate::grammar::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Keyword(Keyword),

    /// Unquoted name, original case preserved
    Identifier(String),
    /// Backtick or double-quoted name with quotes removed and escapes resolved
    QuotedIdentifier(String),

    // Literals
    /// Single-quoted string, quotes removed and `''` unescaped
    StringLiteral(String),
    /// Numeric literal kept as written
    Number(String),

    // Punctuation
    Comma,
    Dot,
    LeftParen,
    RightParen,
    Semicolon,
    Star,

    // Operators
    Equals,             // =
    NotEquals,          // <> or !=
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    Plus,               // +
    Minus,              // -
    Slash,              // /
    Percent,            // %
    Concat,             // ||

    // Trivia
    Whitespace,
    /// `-- line` or `/* block */` comment, delimiters included
    Comment(String),

    Eof,
}

/// Coarse token categories used for metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Punctuation,
    Operator,
    Trivia,
    End,
}

impl Token {
    pub fn class(&self) -> TokenClass {
        match self {
            Self::Keyword(_) => TokenClass::Keyword,
            Self::Identifier(_) | Self::QuotedIdentifier(_) => TokenClass::Identifier,
            Self::StringLiteral(_) | Self::Number(_) => TokenClass::Literal,
            Self::Comma
            | Self::Dot
            | Self::LeftParen
            | Self::RightParen
            | Self::Semicolon
            | Self::Star => TokenClass::Punctuation,
            Self::Equals
            | Self::NotEquals
            | Self::LessThan
            | Self::LessThanOrEqual
            | Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::Plus
            | Self::Minus
            | Self::Slash
            | Self::Percent
            | Self::Concat => TokenClass::Operator,
            Self::Whitespace | Self::Comment(_) => TokenClass::Trivia,
            Self::Eof => TokenClass::End,
        }
    }

    /// Everything except whitespace and comments
    pub fn is_significant(&self) -> bool {
        self.class() != TokenClass::Trivia
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    /// SQL text of this token; quoting is re-applied to literals and quoted names
    pub fn to_sql(&self) -> String {
        match self {
            Self::Keyword(k) => k.as_str().to_string(),
            Self::Identifier(name) => name.clone(),
            Self::QuotedIdentifier(name) => quote_identifier(name),
            Self::StringLiteral(value) => quote_string(value),
            Self::Number(text) => text.clone(),
            Self::Comment(text) => text.clone(),
            Self::Whitespace => " ".to_string(),
            Self::Eof => String::new(),
            other => other.symbol().to_string(),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Dot => ".",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Semicolon => ";",
            Self::Star => "*",
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Concat => "||",
            _ => "",
        }
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Keyword(k) => k.as_str().to_string(),
            Self::Identifier(name) => format!("identifier '{}'", name),
            Self::QuotedIdentifier(name) => format!("identifier {}", quote_identifier(name)),
            Self::StringLiteral(value) => format!("string literal {}", quote_string(value)),
            Self::Number(text) => format!("number {}", text),
            Self::Whitespace => "whitespace".to_string(),
            Self::Comment(_) => "comment".to_string(),
            Self::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Single-quote a string literal, doubling embedded quotes
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Backtick-quote an identifier, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
