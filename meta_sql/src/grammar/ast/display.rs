//! Canonical SQL rendering of AST nodes
//!
//! Output is a single line with upper-case keywords. Names are backtick-quoted
//! whenever the bare spelling would lex as something else (any keyword, or a
//! word with characters outside the identifier alphabet), so rendered text
//! always parses back to an equal tree.

use super::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::lexical::analyzer::{is_identifier_char, is_identifier_start};
use crate::tokens::{quote_identifier, quote_string};
use std::fmt::{self, Display, Formatter, Write};

fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {}
        _ => return true,
    }
    !chars.all(is_identifier_char) || Keyword::from_str(name).is_some()
}

fn write_name(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    if needs_quoting(name) {
        f.write_str(&quote_identifier(name))
    } else {
        f.write_str(name)
    }
}

fn write_field_list(f: &mut Formatter<'_>, fields: &[CompoundIdentifier]) -> fmt::Result {
    f.write_char('(')?;
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", field)?;
    }
    f.write_char(')')
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_name(f, &self.name)
    }
}

impl Display for CompoundIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, name) in self.names.iter().enumerate() {
            if index > 0 {
                f.write_char('.')?;
            }
            write_name(f, name)?;
        }
        if self.wildcard {
            if !self.names.is_empty() {
                f.write_char('.')?;
            }
            f.write_char('*')?;
        }
        Ok(())
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_string(&self.value))
    }
}

impl Display for QueryExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

// === EXPRESSIONS ===

const COMPARISON_PRECEDENCE: u8 = 4;

fn write_operand(f: &mut Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(id) => write!(f, "{}", id),
            Expr::String(lit) => write!(f, "{}", lit),
            Expr::Number { text, .. } => f.write_str(text),
            Expr::Boolean { value, .. } => f.write_str(if *value { "TRUE" } else { "FALSE" }),
            Expr::Null { .. } => f.write_str("NULL"),
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Not => {
                    f.write_str("NOT ")?;
                    write_operand(f, operand, operand.precedence() < NOT_PRECEDENCE)
                }
                UnaryOp::Minus | UnaryOp::Plus => {
                    f.write_str(op.as_str())?;
                    // nested signs are parenthesized so `--` never appears
                    let parenthesize = operand.precedence() != u8::MAX
                        || matches!(operand.as_ref(), Expr::Unary { .. });
                    write_operand(f, operand, parenthesize)
                }
            },
            Expr::Binary {
                op, left, right, ..
            } => {
                let precedence = op.precedence();
                let left_parens = left.precedence() < precedence
                    || (precedence == COMPARISON_PRECEDENCE && left.precedence() == precedence);
                write_operand(f, left, left_parens)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, right, right.precedence() <= precedence)
            }
            Expr::IsNull {
                operand, negated, ..
            } => {
                write_operand(f, operand, operand.precedence() <= IS_NULL_PRECEDENCE)?;
                f.write_str(if *negated { " IS NOT NULL" } else { " IS NULL" })
            }
            Expr::Function { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_char(')')
            }
        }
    }
}

// === STATEMENTS ===

impl Display for ShowFilter {
    /// Renders with a leading space, or nothing for `None`
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ShowFilter::None => Ok(()),
            ShowFilter::Like(pattern) => write!(f, " LIKE {}", pattern),
            ShowFilter::Where(expr) => write!(f, " WHERE {}", expr),
        }
    }
}

fn write_create_mode_prefix(f: &mut Formatter<'_>, mode: CreateMode) -> fmt::Result {
    if mode == CreateMode::OrReplace {
        f.write_str("OR REPLACE ")?;
    }
    Ok(())
}

fn write_create_mode_suffix(f: &mut Formatter<'_>, mode: CreateMode) -> fmt::Result {
    if mode == CreateMode::IfNotExists {
        f.write_str("IF NOT EXISTS ")?;
    }
    Ok(())
}

fn if_exists(flag: bool) -> &'static str {
    if flag {
        "IF EXISTS "
    } else {
        ""
    }
}

impl Display for ShowTables {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SHOW TABLES")?;
        if let Some(schema) = &self.schema {
            write!(f, " FROM {}", schema)?;
        }
        write!(f, "{}", self.filter)
    }
}

impl Display for ShowFiles {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SHOW FILES")?;
        if let Some(schema) = &self.schema {
            write!(f, " FROM {}", schema)?;
        }
        Ok(())
    }
}

impl Display for ShowSchemas {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW SCHEMAS{}", self.filter)
    }
}

impl Display for DescribeTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DESCRIBE {}", self.table)?;
        match &self.column {
            DescribeColumn::All => Ok(()),
            DescribeColumn::Column(column) => write!(f, " {}", column),
            DescribeColumn::Pattern(pattern) => write!(f, " {}", pattern),
        }
    }
}

impl Display for UseSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "USE {}", self.schema)
    }
}

impl Display for CreateView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        write_create_mode_prefix(f, self.mode)?;
        f.write_str("VIEW ")?;
        write_create_mode_suffix(f, self.mode)?;
        write!(f, "{}", self.name)?;
        if !self.fields.is_empty() {
            f.write_char(' ')?;
            write_field_list(f, &self.fields)?;
        }
        write!(f, " AS {}", self.query)
    }
}

impl Display for CreateStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        write_create_mode_prefix(f, self.mode)?;
        f.write_str("STORAGE ")?;
        write_create_mode_suffix(f, self.mode)?;
        write!(f, "{} USING {}", self.name, self.config)
    }
}

impl Display for DropView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DROP VIEW {}{}", if_exists(self.if_exists), self.name)
    }
}

impl Display for CreateTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMPORARY ")?;
        }
        f.write_str("TABLE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.fields.is_empty() {
            f.write_char(' ')?;
            write_field_list(f, &self.fields)?;
        }
        if !self.partition_fields.is_empty() {
            f.write_str(" PARTITION BY ")?;
            write_field_list(f, &self.partition_fields)?;
        }
        write!(f, " AS {}", self.query)
    }
}

impl Display for DropTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE {}{}", if_exists(self.if_exists), self.name)
    }
}

impl Display for RefreshMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "REFRESH TABLE METADATA {}", self.table)
    }
}

impl Display for DescribeSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DESCRIBE SCHEMA {}", self.schema)
    }
}

impl Display for ShowStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW STORAGE {}", self.name)
    }
}

impl Display for DropStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DROP STORAGE {}{}", if_exists(self.if_exists), self.name)
    }
}

impl Display for CreateFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE FUNCTION USING JAR {}", self.jar)
    }
}

impl Display for DropFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DROP FUNCTION USING JAR {}", self.jar)
    }
}

impl Display for SqlStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SqlStatement::ShowTables(s) => s.fmt(f),
            SqlStatement::ShowFiles(s) => s.fmt(f),
            SqlStatement::ShowSchemas(s) => s.fmt(f),
            SqlStatement::DescribeTable(s) => s.fmt(f),
            SqlStatement::UseSchema(s) => s.fmt(f),
            SqlStatement::CreateView(s) => s.fmt(f),
            SqlStatement::CreateStorage(s) => s.fmt(f),
            SqlStatement::DropView(s) => s.fmt(f),
            SqlStatement::CreateTable(s) => s.fmt(f),
            SqlStatement::DropTable(s) => s.fmt(f),
            SqlStatement::RefreshMetadata(s) => s.fmt(f),
            SqlStatement::DescribeSchema(s) => s.fmt(f),
            SqlStatement::ShowStorage(s) => s.fmt(f),
            SqlStatement::DropStorage(s) => s.fmt(f),
            SqlStatement::CreateFunction(s) => s.fmt(f),
            SqlStatement::DropFunction(s) => s.fmt(f),
        }
    }
}
