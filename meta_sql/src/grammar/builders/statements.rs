//! Statement rules
//!
//! Each rule consumes its statement from the leading keyword up to, but not
//! including, a trailing `;`. The node position is the leading keyword span.

use super::atomic::{
    is_identifier_token, parse_identifier, parse_object_name, parse_string_literal, Parser,
};
use super::expressions::parse_query;
use super::helpers::{
    parse_create_mode, parse_if_exists, parse_if_not_exists, parse_optional_field_list,
    parse_required_field_list, parse_schema_clause, parse_show_filter,
};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::ParseResult;
use crate::tokens::Token;

const DESCRIBE_KEYWORDS: [Keyword; 2] = [Keyword::Describe, Keyword::Desc];

// === SHOW ===

/// SHOW TABLES [(FROM | IN) name] [LIKE string | WHERE expression]
pub fn parse_show_tables(parser: &mut dyn Parser) -> ParseResult<ShowTables> {
    let position = parser.expect_keyword(Keyword::Show)?;
    parser.expect_keyword(Keyword::Tables)?;
    let schema = parse_schema_clause(parser)?;
    let filter = parse_show_filter(parser)?;

    Ok(ShowTables {
        schema,
        filter,
        position,
    })
}

/// SHOW FILES [(FROM | IN) name]
pub fn parse_show_files(parser: &mut dyn Parser) -> ParseResult<ShowFiles> {
    let position = parser.expect_keyword(Keyword::Show)?;
    parser.expect_keyword(Keyword::Files)?;
    let schema = parse_schema_clause(parser)?;

    Ok(ShowFiles { schema, position })
}

/// SHOW (DATABASES | SCHEMAS) [LIKE string | WHERE expression]
pub fn parse_show_schemas(parser: &mut dyn Parser) -> ParseResult<ShowSchemas> {
    let position = parser.expect_keyword(Keyword::Show)?;
    parser.expect_any_keyword(&[Keyword::Databases, Keyword::Schemas])?;
    let filter = parse_show_filter(parser)?;

    Ok(ShowSchemas { filter, position })
}

/// SHOW STORAGE name
pub fn parse_show_storage(parser: &mut dyn Parser) -> ParseResult<ShowStorage> {
    let position = parser.expect_keyword(Keyword::Show)?;
    parser.expect_keyword(Keyword::Storage)?;
    let name = parse_identifier(parser)?;

    Ok(ShowStorage { name, position })
}

// === DESCRIBE / USE ===

/// (DESCRIBE | DESC) name [name | string]
pub fn parse_describe_table(parser: &mut dyn Parser) -> ParseResult<DescribeTable> {
    let (_, position) = parser.expect_any_keyword(&DESCRIBE_KEYWORDS)?;
    let table = parse_object_name(parser)?;

    let column = if matches!(parser.current_token(), Token::StringLiteral(_)) {
        DescribeColumn::Pattern(parse_string_literal(parser)?)
    } else if is_identifier_token(parser.current_token()) {
        DescribeColumn::Column(parse_object_name(parser)?)
    } else {
        DescribeColumn::All
    };

    Ok(DescribeTable {
        table,
        column,
        position,
    })
}

/// (DESCRIBE | DESC) (SCHEMA | DATABASE) name
pub fn parse_describe_schema(parser: &mut dyn Parser) -> ParseResult<DescribeSchema> {
    let (_, position) = parser.expect_any_keyword(&DESCRIBE_KEYWORDS)?;
    parser.expect_any_keyword(&[Keyword::Schema, Keyword::Database])?;
    let schema = parse_object_name(parser)?;

    Ok(DescribeSchema { schema, position })
}

/// USE name
pub fn parse_use_schema(parser: &mut dyn Parser) -> ParseResult<UseSchema> {
    let position = parser.expect_keyword(Keyword::Use)?;
    let schema = parse_object_name(parser)?;

    Ok(UseSchema { schema, position })
}

/// REFRESH TABLE METADATA name
pub fn parse_refresh_metadata(parser: &mut dyn Parser) -> ParseResult<RefreshMetadata> {
    let position = parser.expect_keyword(Keyword::Refresh)?;
    parser.expect_keyword(Keyword::Table)?;
    parser.expect_keyword(Keyword::Metadata)?;
    let table = parse_object_name(parser)?;

    Ok(RefreshMetadata { table, position })
}

// === CREATE ===

/// CREATE [OR REPLACE] VIEW [IF NOT EXISTS] name [field_list] AS query
pub fn parse_create_view(parser: &mut dyn Parser) -> ParseResult<CreateView> {
    let position = parser.expect_keyword(Keyword::Create)?;
    let mode = parse_create_mode(parser, Keyword::View, "view")?;
    let name = parse_object_name(parser)?;
    let fields = parse_optional_field_list(parser, "View")?;
    parser.expect_keyword(Keyword::As)?;
    let query = parse_query(parser)?;

    Ok(CreateView {
        name,
        fields,
        query,
        mode,
        position,
    })
}

/// CREATE [OR REPLACE] STORAGE [IF NOT EXISTS] name USING string
pub fn parse_create_storage(parser: &mut dyn Parser) -> ParseResult<CreateStorage> {
    let position = parser.expect_keyword(Keyword::Create)?;
    let mode = parse_create_mode(parser, Keyword::Storage, "storage")?;
    let name = parse_identifier(parser)?;
    parser.expect_keyword(Keyword::Using)?;
    let config = parse_string_literal(parser)?;

    Ok(CreateStorage {
        name,
        mode,
        config,
        position,
    })
}

/// CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name [field_list]
/// [PARTITION BY field_list] AS query
pub fn parse_create_table(parser: &mut dyn Parser) -> ParseResult<CreateTable> {
    let position = parser.expect_keyword(Keyword::Create)?;
    let temporary = parser.consume_keyword(Keyword::Temporary).is_some();
    parser.expect_keyword(Keyword::Table)?;
    let if_not_exists = parse_if_not_exists(parser)?;
    let name = parse_object_name(parser)?;
    let fields = parse_optional_field_list(parser, "Table")?;

    let partition_fields = if parser.consume_keyword(Keyword::Partition).is_some() {
        parser.expect_keyword(Keyword::By)?;
        parse_required_field_list(parser, "Partition")?
    } else {
        Vec::new()
    };

    parser.expect_keyword(Keyword::As)?;
    let query = parse_query(parser)?;

    Ok(CreateTable {
        name,
        fields,
        partition_fields,
        query,
        temporary,
        if_not_exists,
        position,
    })
}

/// CREATE FUNCTION USING JAR string
pub fn parse_create_function(parser: &mut dyn Parser) -> ParseResult<CreateFunction> {
    let position = parser.expect_keyword(Keyword::Create)?;
    parser.expect_keyword(Keyword::Function)?;
    parser.expect_keyword(Keyword::Using)?;
    parser.expect_keyword(Keyword::Jar)?;
    let jar = parse_string_literal(parser)?;

    Ok(CreateFunction { jar, position })
}

// === DROP ===

/// DROP VIEW [IF EXISTS] name
pub fn parse_drop_view(parser: &mut dyn Parser) -> ParseResult<DropView> {
    let position = parser.expect_keyword(Keyword::Drop)?;
    parser.expect_keyword(Keyword::View)?;
    let if_exists = parse_if_exists(parser)?;
    let name = parse_object_name(parser)?;

    Ok(DropView {
        name,
        if_exists,
        position,
    })
}

/// DROP TABLE [IF EXISTS] name
pub fn parse_drop_table(parser: &mut dyn Parser) -> ParseResult<DropTable> {
    let position = parser.expect_keyword(Keyword::Drop)?;
    parser.expect_keyword(Keyword::Table)?;
    let if_exists = parse_if_exists(parser)?;
    let name = parse_object_name(parser)?;

    Ok(DropTable {
        name,
        if_exists,
        position,
    })
}

/// DROP STORAGE [IF EXISTS] name
pub fn parse_drop_storage(parser: &mut dyn Parser) -> ParseResult<DropStorage> {
    let position = parser.expect_keyword(Keyword::Drop)?;
    parser.expect_keyword(Keyword::Storage)?;
    let if_exists = parse_if_exists(parser)?;
    let name = parse_identifier(parser)?;

    Ok(DropStorage {
        name,
        if_exists,
        position,
    })
}

/// DROP FUNCTION USING JAR string
pub fn parse_drop_function(parser: &mut dyn Parser) -> ParseResult<DropFunction> {
    let position = parser.expect_keyword(Keyword::Drop)?;
    parser.expect_keyword(Keyword::Function)?;
    parser.expect_keyword(Keyword::Using)?;
    parser.expect_keyword(Keyword::Jar)?;
    let jar = parse_string_literal(parser)?;

    Ok(DropFunction { jar, position })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builders::atomic::test_support::Cursor;
    use crate::syntax::error::{ParseError, SemanticError, SemanticErrorKind, SyntaxError};
    use assert_matches::assert_matches;

    #[test]
    fn show_tables_with_schema_and_like() {
        let statement =
            parse_show_tables(&mut Cursor::new("SHOW TABLES FROM mydb LIKE '%abc%'")).unwrap();
        assert_eq!(statement.schema.as_ref().map(|s| s.to_string()), Some("mydb".into()));
        assert_matches!(statement.filter, ShowFilter::Like(ref p) if p.value == "%abc%");
    }

    #[test]
    fn show_tables_where_filter() {
        let statement = parse_show_tables(&mut Cursor::new(
            "SHOW TABLES IN dfs.tmp WHERE TABLE_NAME LIKE 'o%'",
        ))
        .unwrap();
        assert_eq!(statement.schema.unwrap().names, vec!["dfs", "tmp"]);
        assert!(statement.filter.where_expr().is_some());
    }

    #[test]
    fn describe_column_choices() {
        let column = parse_describe_table(&mut Cursor::new("DESCRIBE t col1")).unwrap();
        assert_matches!(column.column, DescribeColumn::Column(ref c) if c.names == vec!["col1"]);

        let pattern = parse_describe_table(&mut Cursor::new("DESC t 'col%'")).unwrap();
        assert_matches!(pattern.column, DescribeColumn::Pattern(ref p) if p.value == "col%");

        let all = parse_describe_table(&mut Cursor::new("DESCRIBE dfs.t")).unwrap();
        assert_eq!(all.column, DescribeColumn::All);
    }

    #[test]
    fn create_table_with_partition() {
        let statement = parse_create_table(&mut Cursor::new(
            "CREATE TABLE t (a,b) PARTITION BY (a) AS SELECT a,b FROM s",
        ))
        .unwrap();
        assert_eq!(statement.name.names, vec!["t"]);
        assert_eq!(statement.fields.len(), 2);
        assert_eq!(statement.partition_fields.len(), 1);
        assert_eq!(statement.partition_fields[0].names, vec!["a"]);
        assert!(!statement.temporary);
        assert!(!statement.if_not_exists);
        assert_eq!(statement.query.sql(), "SELECT a, b FROM s");
    }

    #[test]
    fn create_temporary_table_if_not_exists() {
        let statement = parse_create_table(&mut Cursor::new(
            "CREATE TEMPORARY TABLE IF NOT EXISTS dfs.tmp.t AS VALUES (1)",
        ))
        .unwrap();
        assert!(statement.temporary);
        assert!(statement.if_not_exists);
        assert!(statement.fields.is_empty());
    }

    #[test]
    fn partition_wildcard_is_rejected() {
        let error = parse_create_table(&mut Cursor::new(
            "CREATE TABLE t PARTITION BY (*) AS SELECT 1",
        ))
        .unwrap_err();
        assert_matches!(
            error,
            ParseError::Semantic(SemanticError { ref message, .. })
                if message == "Partition's field list has a '*', which is invalid."
        );
    }

    #[test]
    fn create_view_modes() {
        let view = parse_create_view(&mut Cursor::new(
            "CREATE OR REPLACE VIEW v (x, y) AS SELECT a, b FROM t",
        ))
        .unwrap();
        assert_eq!(view.mode, CreateMode::OrReplace);
        assert_eq!(view.fields.len(), 2);

        let error = parse_create_view(&mut Cursor::new(
            "CREATE OR REPLACE VIEW IF NOT EXISTS v AS SELECT 1",
        ))
        .unwrap_err();
        assert_matches!(
            error,
            ParseError::Semantic(SemanticError {
                kind: SemanticErrorKind::ConflictingCreateModifiers,
                ref message,
                ..
            }) if message == "Create view statement cannot have both <OR REPLACE> and <IF NOT EXISTS> clause"
        );
    }

    #[test]
    fn create_view_wildcard_field() {
        let error =
            parse_create_view(&mut Cursor::new("CREATE VIEW v (a, *) AS SELECT 1, 2")).unwrap_err();
        assert_matches!(
            error,
            ParseError::Semantic(SemanticError { ref message, .. })
                if message == "View's field list has a '*', which is invalid."
        );
    }

    #[test]
    fn create_storage_carries_config() {
        let statement = parse_create_storage(&mut Cursor::new(
            r#"CREATE STORAGE IF NOT EXISTS s3 USING '{"type": "file"}'"#,
        ))
        .unwrap();
        assert_eq!(statement.mode, CreateMode::IfNotExists);
        assert_eq!(statement.name.name, "s3");
        assert_eq!(statement.config.value, r#"{"type": "file"}"#);
    }

    #[test]
    fn drop_storage_if_exists_flag() {
        let with = parse_drop_storage(&mut Cursor::new("DROP STORAGE IF EXISTS s1")).unwrap();
        assert!(with.if_exists);
        let without = parse_drop_storage(&mut Cursor::new("DROP STORAGE s1")).unwrap();
        assert!(!without.if_exists);
        assert_eq!(without.name.name, "s1");
    }

    #[test]
    fn functions_keep_jar_literal() {
        let create =
            parse_create_function(&mut Cursor::new("CREATE FUNCTION USING JAR 'udfs-1.0.jar'"))
                .unwrap();
        assert_eq!(create.jar.value, "udfs-1.0.jar");

        let error = parse_drop_function(&mut Cursor::new("DROP FUNCTION USING 'x.jar'")).unwrap_err();
        assert_matches!(
            error,
            ParseError::Syntax(SyntaxError::UnexpectedToken { ref expected, .. })
                if expected == &vec!["JAR".to_string()]
        );
    }

    #[test]
    fn refresh_requires_metadata_keyword() {
        let statement =
            parse_refresh_metadata(&mut Cursor::new("REFRESH TABLE METADATA dfs.`/data/t`")).unwrap();
        assert_eq!(statement.table.names, vec!["dfs", "/data/t"]);
        assert!(parse_refresh_metadata(&mut Cursor::new("REFRESH TABLE t")).is_err());
    }

    #[test]
    fn position_is_leading_keyword() {
        let statement = parse_use_schema(&mut Cursor::new("  USE dfs.tmp")).unwrap();
        assert_eq!(statement.position.start.offset, 2);
        assert_eq!(statement.position.end.offset, 5);
    }

    #[test]
    fn rules_do_not_consume_terminator() {
        let mut cursor = Cursor::new("DROP VIEW IF EXISTS v1;");
        let statement = parse_drop_view(&mut cursor).unwrap();
        assert!(statement.if_exists);
        assert!(cursor.check_token(&Token::Semicolon));
    }
}
