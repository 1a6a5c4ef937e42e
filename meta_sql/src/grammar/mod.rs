//! Grammar for administrative and metadata SQL statements

pub mod ast;
pub mod builders;
pub mod keywords;

// Re-export AST types
pub use ast::nodes::*;

pub use keywords::{is_reserved_keyword, Keyword};

pub use builders::{parse_statement, Parser};
