//! Builder functions for statement grammar productions
//!
//! Dependency order: atomic → expressions → helpers → statements → dispatch.

pub mod atomic;
pub mod dispatch;
pub mod expressions;
pub mod helpers;
pub mod statements;

pub use atomic::{
    is_identifier_token, parse_compound_identifier, parse_identifier, parse_object_name,
    parse_string_literal, Parser,
};
pub use dispatch::{parse_statement, STATEMENT_LEADERS};
pub use expressions::{parse_expression, parse_query};
pub use helpers::{parse_optional_field_list, parse_required_field_list};
pub use statements::*;
