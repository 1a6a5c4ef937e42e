//! Syntax analysis - statement text or tokens to AST
//!
//! [`parse_sql`] handles one statement, [`parse_script`] a `;`-separated
//! sequence. Both tokenize first, so lexical failures surface as
//! [`ParseError::Lexical`].

pub mod error;
mod parser;

pub use crate::grammar::ast::nodes::SqlStatement;
pub use error::{ParseError, ParseResult, SemanticError, SemanticErrorKind, SyntaxError};
pub use parser::SqlParser;

use crate::lexical::tokenize;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_success};

/// Parse exactly one statement; a trailing `;` is allowed
pub fn parse_sql(text: &str) -> ParseResult<SqlStatement> {
    let tokens = tokenize(text)?;
    parse_statement_tokens(tokens)
}

/// Parse every statement of a script
pub fn parse_script(text: &str) -> ParseResult<Vec<SqlStatement>> {
    let tokens = tokenize(text)?;
    parse_script_tokens(tokens)
}

pub fn parse_statement_tokens(tokens: TokenStream) -> ParseResult<SqlStatement> {
    log_debug!("Starting syntax analysis", "tokens" => tokens.len());
    SqlParser::new(tokens).parse_single_statement()
}

pub fn parse_script_tokens(tokens: TokenStream) -> ParseResult<Vec<SqlStatement>> {
    log_debug!("Starting script analysis", "tokens" => tokens.len());

    let statements = SqlParser::new(tokens).parse_script()?;
    log_success!(codes::success::SCRIPT_PARSED, "Script parsed",
        "statements" => statements.len()
    );
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::*;
    use crate::lexical::LexerError;
    use assert_matches::assert_matches;

    /// Serialized tree with every `position` removed; spans move when text is reprinted
    fn shape(statement: &SqlStatement) -> serde_json::Value {
        fn strip(value: &mut serde_json::Value) {
            match value {
                serde_json::Value::Object(map) => {
                    map.remove("position");
                    map.values_mut().for_each(strip);
                }
                serde_json::Value::Array(items) => items.iter_mut().for_each(strip),
                _ => {}
            }
        }

        let mut value = serde_json::to_value(statement).unwrap();
        strip(&mut value);
        value
    }

    /// print → parse → print must be stable, and the reparsed tree equal
    fn assert_round_trip(sql: &str) {
        let first = parse_sql(sql).unwrap();
        let printed = first.to_string();
        let second = parse_sql(&printed).unwrap_or_else(|e| panic!("{}: {}", printed, e));
        assert_eq!(printed, second.to_string(), "{}", sql);
        assert_eq!(shape(&first), shape(&second), "{}", sql);
    }

    #[test]
    fn canonical_text_reparses() {
        let statements = [
            "show tables in dfs.tmp where table_name like 'o%' and not (x is null or y <> 2)",
            "SHOW FILES",
            "show databases like 'd%'",
            "desc dfs.`my table` 'col%'",
            "DESCRIBE t `storage`",
            "describe database dfs",
            "use dfs.tmp",
            "create or replace view dfs.tmp.v (a, b) as select a, count(*) from s group by a",
            "CREATE VIEW IF NOT EXISTS v AS (SELECT 1)",
            "create storage if not exists s3 using '{\"type\": \"file\"}'",
            "drop view if exists v",
            "create temporary table if not exists t (a, b) partition by (a) as select a, b from s",
            "DROP TABLE dfs.tmp.t",
            "refresh table metadata dfs.`/data/orders`",
            "show storage dfs",
            "drop storage if exists s1",
            "create function using jar 'udf''s.jar'",
            "drop function using jar 'udf.jar'",
            "SHOW TABLES WHERE -(-a) - (b - c) * 2 >= 1 || 'x'",
        ];

        for sql in statements {
            assert_round_trip(sql);
        }
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(
            parse_sql("show databases").unwrap().to_string(),
            "SHOW SCHEMAS"
        );
        assert_eq!(
            parse_sql("desc `t` col1;").unwrap().to_string(),
            "DESCRIBE t col1"
        );
        assert_eq!(
            parse_sql("create table t (a,b) partition by (a) as select a,b from s")
                .unwrap()
                .to_string(),
            "CREATE TABLE t (a, b) PARTITION BY (a) AS SELECT a, b FROM s"
        );
    }

    #[test]
    fn show_tables_from_mydb_like() {
        let statement = parse_sql("SHOW TABLES FROM mydb LIKE '%abc%'").unwrap();
        assert_matches!(
            statement,
            SqlStatement::ShowTables(ShowTables {
                schema: Some(ref schema),
                filter: ShowFilter::Like(ref pattern),
                ..
            }) if schema.names == vec!["mydb"] && pattern.value == "%abc%"
        );
    }

    #[test]
    fn conflicting_modifiers_for_both_create_forms() {
        for (sql, object) in [
            ("CREATE OR REPLACE VIEW IF NOT EXISTS v AS SELECT 1", "view"),
            ("CREATE OR REPLACE STORAGE IF NOT EXISTS s USING '{}'", "storage"),
        ] {
            let error = parse_sql(sql).unwrap_err();
            let semantic = error.as_semantic().unwrap();
            assert_eq!(semantic.kind, SemanticErrorKind::ConflictingCreateModifiers);
            assert_eq!(
                semantic.message,
                format!(
                    "Create {} statement cannot have both <OR REPLACE> and <IF NOT EXISTS> clause",
                    object
                )
            );
        }
    }

    #[test]
    fn reprinted_tree_keeps_names_and_operators() {
        let first = parse_sql("show  tables from dfs.tmp where a - (b - c) > 1").unwrap();
        let second = parse_sql(&first.to_string()).unwrap();
        assert_ne!(first, second);
        assert_eq!(shape(&first), shape(&second));
        assert_eq!(shape(&first)["filter"]["Where"]["Binary"]["op"], "GreaterThan");
    }

    #[test]
    fn filter_and_column_forms_are_exclusive() {
        for sql in [
            "SHOW TABLES LIKE 'a' WHERE x = 1",
            "SHOW SCHEMAS WHERE x = 1 LIKE 'a'",
            "DESCRIBE t col1 'c%'",
            "DESCRIBE t 'c%' col1",
        ] {
            let error = parse_sql(sql).unwrap_err();
            assert_matches!(
                error,
                ParseError::Syntax(SyntaxError::TrailingInput { .. }),
                "{}",
                sql
            );
        }
    }

    #[test]
    fn object_names_cannot_be_wildcards() {
        for sql in [
            "USE *",
            "DROP TABLE *",
            "CREATE VIEW t.* AS SELECT 1",
            "REFRESH TABLE METADATA *",
            "DESCRIBE SCHEMA *",
            "SHOW TABLES FROM dfs.*",
        ] {
            let error = parse_sql(sql).unwrap_err();
            let syntax = error.as_syntax().unwrap_or_else(|| panic!("{}: {}", sql, error));
            assert_eq!(syntax.expected(), ["identifier"], "{}", sql);
        }
    }

    #[test]
    fn view_wildcard_field() {
        let error = parse_sql("CREATE VIEW v (a, *) AS SELECT 1, 2").unwrap_err();
        assert_eq!(
            error.as_semantic().map(|e| e.message.as_str()),
            Some("View's field list has a '*', which is invalid.")
        );
    }

    #[test]
    fn position_is_leading_keyword_span() {
        let sources = [
            "\n  SHOW TABLES",
            "\n  DESC SCHEMA s",
            "\n  CREATE OR REPLACE VIEW v AS SELECT 1",
            "\n  DROP STORAGE s",
            "\n  REFRESH TABLE METADATA t",
        ];
        for source in sources {
            let statement = parse_sql(source).unwrap();
            let position = statement.position();
            assert_eq!(position.start.line, 2, "{}", source);
            assert_eq!(position.start.column, 3, "{}", source);
            let leader = source.trim_start().split(' ').next().unwrap();
            assert_eq!(position.slice(source), Some(leader));
        }
    }

    #[test]
    fn lexical_errors_surface() {
        let error = parse_sql("SHOW TABLES LIKE 'unterminated").unwrap_err();
        assert_matches!(error, ParseError::Lexical(LexerError::UnterminatedString { .. }));
    }

    #[test]
    fn script_parsing() {
        let statements = parse_script(
            "USE dfs.tmp;\n-- refresh first\nREFRESH TABLE METADATA t;\n\nSHOW FILES;",
        )
        .unwrap();
        assert_eq!(statements.len(), 3);
        assert!(parse_script("").unwrap().is_empty());
    }
}
