//! Statement dispatch
//!
//! Looks at the statement keyword and at most three tokens after it, then
//! hands the whole statement to exactly one rule. Rules never backtrack into
//! the dispatcher.

use super::atomic::Parser;
use super::statements::*;
use crate::grammar::ast::nodes::SqlStatement;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{ParseResult, SyntaxError};

/// Keywords that can begin a statement, in the order reported in errors
pub const STATEMENT_LEADERS: [Keyword; 7] = [
    Keyword::Show,
    Keyword::Describe,
    Keyword::Desc,
    Keyword::Use,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Refresh,
];

fn unexpected_at(parser: &dyn Parser, offset: usize, expected: &[Keyword]) -> SyntaxError {
    let token = parser.peek(offset);
    SyntaxError::unexpected(
        expected.iter().map(|k| k.as_str().to_string()).collect(),
        &token.token,
        token.span,
    )
}

pub fn parse_statement(parser: &mut dyn Parser) -> ParseResult<SqlStatement> {
    let Some(leader) = parser.peek_keyword(0) else {
        return Err(unexpected_at(parser, 0, &STATEMENT_LEADERS).into());
    };

    match leader {
        Keyword::Show => dispatch_show(parser),
        Keyword::Describe | Keyword::Desc => match parser.peek_keyword(1) {
            Some(Keyword::Schema | Keyword::Database) => {
                parse_describe_schema(parser).map(SqlStatement::DescribeSchema)
            }
            _ => parse_describe_table(parser).map(SqlStatement::DescribeTable),
        },
        Keyword::Use => parse_use_schema(parser).map(SqlStatement::UseSchema),
        Keyword::Create => dispatch_create(parser),
        Keyword::Drop => dispatch_drop(parser),
        Keyword::Refresh => parse_refresh_metadata(parser).map(SqlStatement::RefreshMetadata),
        _ => Err(unexpected_at(parser, 0, &STATEMENT_LEADERS).into()),
    }
}

fn dispatch_show(parser: &mut dyn Parser) -> ParseResult<SqlStatement> {
    match parser.peek_keyword(1) {
        Some(Keyword::Tables) => parse_show_tables(parser).map(SqlStatement::ShowTables),
        Some(Keyword::Files) => parse_show_files(parser).map(SqlStatement::ShowFiles),
        Some(Keyword::Databases | Keyword::Schemas) => {
            parse_show_schemas(parser).map(SqlStatement::ShowSchemas)
        }
        Some(Keyword::Storage) => parse_show_storage(parser).map(SqlStatement::ShowStorage),
        _ => Err(unexpected_at(
            parser,
            1,
            &[
                Keyword::Tables,
                Keyword::Files,
                Keyword::Databases,
                Keyword::Schemas,
                Keyword::Storage,
            ],
        )
        .into()),
    }
}

fn dispatch_create(parser: &mut dyn Parser) -> ParseResult<SqlStatement> {
    match parser.peek_keyword(1) {
        // CREATE OR REPLACE (VIEW | STORAGE)
        Some(Keyword::Or) => {
            if parser.peek_keyword(2) != Some(Keyword::Replace) {
                return Err(unexpected_at(parser, 2, &[Keyword::Replace]).into());
            }
            match parser.peek_keyword(3) {
                Some(Keyword::View) => parse_create_view(parser).map(SqlStatement::CreateView),
                Some(Keyword::Storage) => {
                    parse_create_storage(parser).map(SqlStatement::CreateStorage)
                }
                _ => Err(unexpected_at(parser, 3, &[Keyword::View, Keyword::Storage]).into()),
            }
        }
        Some(Keyword::View) => parse_create_view(parser).map(SqlStatement::CreateView),
        Some(Keyword::Storage) => parse_create_storage(parser).map(SqlStatement::CreateStorage),
        Some(Keyword::Temporary | Keyword::Table) => {
            parse_create_table(parser).map(SqlStatement::CreateTable)
        }
        Some(Keyword::Function) => parse_create_function(parser).map(SqlStatement::CreateFunction),
        _ => Err(unexpected_at(
            parser,
            1,
            &[
                Keyword::Or,
                Keyword::View,
                Keyword::Storage,
                Keyword::Temporary,
                Keyword::Table,
                Keyword::Function,
            ],
        )
        .into()),
    }
}

fn dispatch_drop(parser: &mut dyn Parser) -> ParseResult<SqlStatement> {
    match parser.peek_keyword(1) {
        Some(Keyword::Table) => parse_drop_table(parser).map(SqlStatement::DropTable),
        Some(Keyword::View) => parse_drop_view(parser).map(SqlStatement::DropView),
        Some(Keyword::Storage) => parse_drop_storage(parser).map(SqlStatement::DropStorage),
        Some(Keyword::Function) => parse_drop_function(parser).map(SqlStatement::DropFunction),
        _ => Err(unexpected_at(
            parser,
            1,
            &[
                Keyword::Table,
                Keyword::View,
                Keyword::Storage,
                Keyword::Function,
            ],
        )
        .into()),
    }
}
