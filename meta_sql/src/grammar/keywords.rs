//! SQL keywords recognized by the lexer
//!
//! Keywords are matched case-insensitively. Non-reserved keywords (the category
//! words such as `TABLES` or `STORAGE`) are still valid identifiers wherever the
//! grammar expects a name.
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! keywords {
    ($($variant:ident => $text:literal, reserved = $reserved:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Keyword {
            $($variant,)+
        }

        impl Keyword {
            /// Every keyword, in declaration order
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)+];

            /// Canonical upper-case spelling
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)+
                }
            }

            /// Reserved keywords can never be used as bare identifiers
            pub const fn is_reserved(self) -> bool {
                match self {
                    $(Keyword::$variant => $reserved,)+
                }
            }
        }
    };
}

keywords! {
    // Statement leaders
    Show => "SHOW", reserved = true;
    Describe => "DESCRIBE", reserved = true;
    Desc => "DESC", reserved = true;
    Use => "USE", reserved = true;
    Create => "CREATE", reserved = true;
    Drop => "DROP", reserved = true;
    Refresh => "REFRESH", reserved = false;

    // Object categories
    Tables => "TABLES", reserved = false;
    Files => "FILES", reserved = false;
    Databases => "DATABASES", reserved = false;
    Schemas => "SCHEMAS", reserved = false;
    Schema => "SCHEMA", reserved = false;
    Database => "DATABASE", reserved = false;
    Table => "TABLE", reserved = true;
    View => "VIEW", reserved = false;
    Storage => "STORAGE", reserved = false;
    Function => "FUNCTION", reserved = false;
    Metadata => "METADATA", reserved = false;
    Jar => "JAR", reserved = false;

    // Clauses and modifiers
    From => "FROM", reserved = true;
    In => "IN", reserved = true;
    Like => "LIKE", reserved = true;
    Where => "WHERE", reserved = true;
    Or => "OR", reserved = true;
    And => "AND", reserved = true;
    Not => "NOT", reserved = true;
    Replace => "REPLACE", reserved = false;
    If => "IF", reserved = true;
    Exists => "EXISTS", reserved = true;
    As => "AS", reserved = true;
    Using => "USING", reserved = true;
    Temporary => "TEMPORARY", reserved = false;
    Partition => "PARTITION", reserved = false;
    By => "BY", reserved = true;

    // Expression literals and operators
    Is => "IS", reserved = true;
    Null => "NULL", reserved = true;
    True => "TRUE", reserved = true;
    False => "FALSE", reserved = true;

    // Query leaders
    Select => "SELECT", reserved = true;
    Values => "VALUES", reserved = true;
    With => "WITH", reserved = true;
}

impl Keyword {
    /// Case-insensitive lookup
    pub fn from_str(word: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(word))
    }

    /// Keywords that may begin an embedded query
    pub const fn starts_query(self) -> bool {
        matches!(self, Keyword::Select | Keyword::Values | Keyword::With)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_reserved_keyword(word: &str) -> bool {
    Keyword::from_str(word).is_some_and(Keyword::is_reserved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Keyword::from_str("show"), Some(Keyword::Show));
        assert_eq!(Keyword::from_str("Tables"), Some(Keyword::Tables));
        assert_eq!(Keyword::from_str("DESC"), Some(Keyword::Desc));
        assert_eq!(Keyword::from_str("mydb"), None);
    }

    #[test]
    fn spellings_round_trip() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(*keyword));
        }
    }

    #[test]
    fn category_words_are_not_reserved() {
        assert!(!is_reserved_keyword("storage"));
        assert!(!is_reserved_keyword("metadata"));
        assert!(is_reserved_keyword("where"));
        assert!(!is_reserved_keyword("customers"));
    }
}
