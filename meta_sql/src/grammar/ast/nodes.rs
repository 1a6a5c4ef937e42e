//! AST nodes for administrative and metadata SQL statements
//!
//! Design principles:
//! - One node type per statement form, each with a `position` copied from the
//!   leading statement keyword
//! - Mutually exclusive clauses are a single enum with an explicit "neither"
//!   variant, so an impossible combination cannot be represented
//! - Serde compatible for handing the tree to other processes

use crate::grammar::keywords::Keyword;
use crate::tokens::Token;
use crate::utils::Span;
use serde::{Deserialize, Serialize};

// === NAMES AND LITERALS ===

/// Unqualified name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub position: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, position: Span) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Possibly dot-qualified name such as `dfs.tmp.orders`, optionally ending in `*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundIdentifier {
    /// Name components, empty for a bare `*`
    pub names: Vec<String>,
    /// Set when the last component is `*`
    pub wildcard: bool,
    pub position: Span,
}

impl CompoundIdentifier {
    pub fn new(names: Vec<String>, position: Span) -> Self {
        Self {
            names,
            wildcard: false,
            position,
        }
    }

    pub fn star(qualifier: Vec<String>, position: Span) -> Self {
        Self {
            names: qualifier,
            wildcard: true,
            position,
        }
    }

    /// True for `*` and `qualifier.*`
    pub fn is_star(&self) -> bool {
        self.wildcard
    }
}

/// Single-quoted string with quotes removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub position: Span,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>, position: Span) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }
}

// === EXPRESSIONS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Minus => "-",
            Self::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    NotLike,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Concat => "||",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equals
            | Self::NotEquals
            | Self::LessThan
            | Self::LessThanOrEqual
            | Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::Like
            | Self::NotLike => 4,
            Self::Plus | Self::Minus | Self::Concat => 5,
            Self::Multiply | Self::Divide | Self::Modulo => 6,
        }
    }

    /// Comparison operator for a token, if it is one
    pub fn comparison(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Equals => Self::Equals,
            Token::NotEquals => Self::NotEquals,
            Token::LessThan => Self::LessThan,
            Token::LessThanOrEqual => Self::LessThanOrEqual,
            Token::GreaterThan => Self::GreaterThan,
            Token::GreaterThanOrEqual => Self::GreaterThanOrEqual,
            _ => return None,
        })
    }
}

/// Precedence of `IS [NOT] NULL` and unary `NOT`
pub const IS_NULL_PRECEDENCE: u8 = 4;
pub const NOT_PRECEDENCE: u8 = 3;

/// Boolean/scalar expression used by `WHERE` filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(CompoundIdentifier),
    String(StringLiteral),
    Number {
        text: String,
        position: Span,
    },
    Boolean {
        value: bool,
        position: Span,
    },
    Null {
        position: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        position: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        position: Span,
    },
    IsNull {
        operand: Box<Expr>,
        negated: bool,
        position: Span,
    },
    Function {
        name: CompoundIdentifier,
        args: Vec<Expr>,
        position: Span,
    },
}

impl Expr {
    pub fn position(&self) -> Span {
        match self {
            Expr::Identifier(id) => id.position,
            Expr::String(lit) => lit.position,
            Expr::Number { position, .. }
            | Expr::Boolean { position, .. }
            | Expr::Null { position }
            | Expr::Unary { position, .. }
            | Expr::Binary { position, .. }
            | Expr::IsNull { position, .. }
            | Expr::Function { position, .. } => *position,
        }
    }

    /// Precedence used when deciding whether to parenthesize
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::IsNull { .. } => IS_NULL_PRECEDENCE,
            Expr::Unary {
                op: UnaryOp::Not, ..
            } => NOT_PRECEDENCE,
            _ => u8::MAX,
        }
    }
}

/// Defining query of a view or table, kept as its token sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExpr {
    pub tokens: Vec<Token>,
    pub position: Span,
}

impl QueryExpr {
    /// Canonical single-line SQL for the query
    pub fn sql(&self) -> String {
        let mut out = String::new();
        let mut previous: Option<&Token> = None;

        for token in &self.tokens {
            let spaced = match (previous, token) {
                (None, _) => false,
                (Some(Token::LeftParen | Token::Dot), _) => false,
                (_, Token::Comma | Token::Dot | Token::RightParen) => false,
                (Some(Token::Identifier(_) | Token::QuotedIdentifier(_)), Token::LeftParen) => {
                    false
                }
                _ => true,
            };
            if spaced {
                out.push(' ');
            }
            out.push_str(&token.to_sql());
            previous = Some(token);
        }

        out
    }

    /// Leading keyword of the query (`SELECT`, `VALUES`, `WITH`), if any
    pub fn leading_keyword(&self) -> Option<Keyword> {
        self.tokens.iter().find_map(Token::as_keyword)
    }
}

// === CLAUSE CHOICES ===

/// Existence-check mode of `CREATE VIEW` / `CREATE STORAGE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreateMode {
    #[default]
    Simple,
    OrReplace,
    IfNotExists,
}

impl CreateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::OrReplace => "OR_REPLACE",
            Self::IfNotExists => "IF_NOT_EXISTS",
        }
    }
}

/// Optional filter of `SHOW TABLES` / `SHOW SCHEMAS`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ShowFilter {
    #[default]
    None,
    Like(StringLiteral),
    Where(Expr),
}

impl ShowFilter {
    pub fn like_pattern(&self) -> Option<&StringLiteral> {
        match self {
            Self::Like(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn where_expr(&self) -> Option<&Expr> {
        match self {
            Self::Where(expr) => Some(expr),
            _ => None,
        }
    }
}

/// Column selection of `DESCRIBE <table>`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DescribeColumn {
    /// No column clause: describe every column
    #[default]
    All,
    Column(CompoundIdentifier),
    Pattern(StringLiteral),
}

impl DescribeColumn {
    pub fn column(&self) -> Option<&CompoundIdentifier> {
        match self {
            Self::Column(id) => Some(id),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&StringLiteral> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }
}

// === STATEMENTS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowTables {
    pub schema: Option<CompoundIdentifier>,
    pub filter: ShowFilter,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowFiles {
    pub schema: Option<CompoundIdentifier>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSchemas {
    pub filter: ShowFilter,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeTable {
    pub table: CompoundIdentifier,
    pub column: DescribeColumn,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseSchema {
    pub schema: CompoundIdentifier,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateView {
    pub name: CompoundIdentifier,
    /// Column aliases; empty when the statement has none
    pub fields: Vec<CompoundIdentifier>,
    pub query: QueryExpr,
    pub mode: CreateMode,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStorage {
    pub name: Identifier,
    pub mode: CreateMode,
    /// Plugin configuration, usually JSON, carried verbatim
    pub config: StringLiteral,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropView {
    pub name: CompoundIdentifier,
    pub if_exists: bool,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: CompoundIdentifier,
    pub fields: Vec<CompoundIdentifier>,
    pub partition_fields: Vec<CompoundIdentifier>,
    pub query: QueryExpr,
    pub temporary: bool,
    pub if_not_exists: bool,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    pub name: CompoundIdentifier,
    pub if_exists: bool,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshMetadata {
    pub table: CompoundIdentifier,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeSchema {
    pub schema: CompoundIdentifier,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowStorage {
    pub name: Identifier,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropStorage {
    pub name: Identifier,
    pub if_exists: bool,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFunction {
    pub jar: StringLiteral,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropFunction {
    pub jar: StringLiteral,
    pub position: Span,
}

/// Any statement produced by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statement")]
pub enum SqlStatement {
    ShowTables(ShowTables),
    ShowFiles(ShowFiles),
    ShowSchemas(ShowSchemas),
    DescribeTable(DescribeTable),
    UseSchema(UseSchema),
    CreateView(CreateView),
    CreateStorage(CreateStorage),
    DropView(DropView),
    CreateTable(CreateTable),
    DropTable(DropTable),
    RefreshMetadata(RefreshMetadata),
    DescribeSchema(DescribeSchema),
    ShowStorage(ShowStorage),
    DropStorage(DropStorage),
    CreateFunction(CreateFunction),
    DropFunction(DropFunction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    ShowTables,
    ShowFiles,
    ShowSchemas,
    DescribeTable,
    UseSchema,
    CreateView,
    CreateStorage,
    DropView,
    CreateTable,
    DropTable,
    RefreshMetadata,
    DescribeSchema,
    ShowStorage,
    DropStorage,
    CreateFunction,
    DropFunction,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowTables => "SHOW TABLES",
            Self::ShowFiles => "SHOW FILES",
            Self::ShowSchemas => "SHOW SCHEMAS",
            Self::DescribeTable => "DESCRIBE TABLE",
            Self::UseSchema => "USE",
            Self::CreateView => "CREATE VIEW",
            Self::CreateStorage => "CREATE STORAGE",
            Self::DropView => "DROP VIEW",
            Self::CreateTable => "CREATE TABLE",
            Self::DropTable => "DROP TABLE",
            Self::RefreshMetadata => "REFRESH TABLE METADATA",
            Self::DescribeSchema => "DESCRIBE SCHEMA",
            Self::ShowStorage => "SHOW STORAGE",
            Self::DropStorage => "DROP STORAGE",
            Self::CreateFunction => "CREATE FUNCTION",
            Self::DropFunction => "DROP FUNCTION",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SqlStatement {
    /// Span of the leading statement keyword
    pub fn position(&self) -> Span {
        match self {
            Self::ShowTables(s) => s.position,
            Self::ShowFiles(s) => s.position,
            Self::ShowSchemas(s) => s.position,
            Self::DescribeTable(s) => s.position,
            Self::UseSchema(s) => s.position,
            Self::CreateView(s) => s.position,
            Self::CreateStorage(s) => s.position,
            Self::DropView(s) => s.position,
            Self::CreateTable(s) => s.position,
            Self::DropTable(s) => s.position,
            Self::RefreshMetadata(s) => s.position,
            Self::DescribeSchema(s) => s.position,
            Self::ShowStorage(s) => s.position,
            Self::DropStorage(s) => s.position,
            Self::CreateFunction(s) => s.position,
            Self::DropFunction(s) => s.position,
        }
    }

    pub fn kind(&self) -> StatementKind {
        match self {
            Self::ShowTables(_) => StatementKind::ShowTables,
            Self::ShowFiles(_) => StatementKind::ShowFiles,
            Self::ShowSchemas(_) => StatementKind::ShowSchemas,
            Self::DescribeTable(_) => StatementKind::DescribeTable,
            Self::UseSchema(_) => StatementKind::UseSchema,
            Self::CreateView(_) => StatementKind::CreateView,
            Self::CreateStorage(_) => StatementKind::CreateStorage,
            Self::DropView(_) => StatementKind::DropView,
            Self::CreateTable(_) => StatementKind::CreateTable,
            Self::DropTable(_) => StatementKind::DropTable,
            Self::RefreshMetadata(_) => StatementKind::RefreshMetadata,
            Self::DescribeSchema(_) => StatementKind::DescribeSchema,
            Self::ShowStorage(_) => StatementKind::ShowStorage,
            Self::DropStorage(_) => StatementKind::DropStorage,
            Self::CreateFunction(_) => StatementKind::CreateFunction,
            Self::DropFunction(_) => StatementKind::DropFunction,
        }
    }
}
