//! Error and success codes with their classification metadata
//!
//! Every code emitted by the parser lives here together with the metadata the
//! logging service uses to classify events (severity, category, halt policy).

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code wrapper shared by error and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata attached to an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Script file error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const UNTERMINATED_IDENTIFIER: Code = Code::new("E025");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E028");
}

/// Syntax error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E040");
    pub const EMPTY_TOKEN_STREAM: Code = Code::new("E041");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const TRAILING_INPUT: Code = Code::new("E051");
    pub const TOO_MANY_STATEMENTS: Code = Code::new("E052");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Grammar-level semantic guard codes
pub mod semantic {
    use super::Code;

    pub const CONFLICTING_CREATE_MODIFIERS: Code = Code::new("E060");
    pub const WILDCARD_IN_FIELD_LIST: Code = Code::new("E061");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const PIPELINE_COMPLETE: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const STATEMENT_PARSED: Code = Code::new("I040");
    pub const SCRIPT_PARSED: Code = Code::new("I041");
}

const fn meta(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable,
        requires_halt,
        description,
        recommended_action,
    }
}

#[rustfmt::skip]
const METADATA: &[ErrorMetadata] = &[
    meta("ERR001", "System", Severity::Critical, false, true,
        "Internal parser failure", "File a bug report with the failing statement"),
    meta("ERR002", "System", Severity::Critical, false, true,
        "Logging or configuration initialization failed", "Check META_SQL_* environment variables"),

    meta("E005", "FileProcessing", Severity::High, false, true,
        "Script file not found", "Verify the file path"),
    meta("E006", "FileProcessing", Severity::Medium, true, false,
        "Script file does not have a .sql extension", "Rename the file or disable the extension check"),
    meta("E007", "FileProcessing", Severity::High, false, true,
        "Script file exceeds the configured size limit", "Split the script into smaller files"),
    meta("E008", "FileProcessing", Severity::Medium, false, true,
        "Script file is empty", "Provide at least one statement"),
    meta("E009", "FileProcessing", Severity::High, false, true,
        "Permission denied reading script file", "Check file permissions"),
    meta("E010", "FileProcessing", Severity::High, false, true,
        "Script file is not valid UTF-8", "Re-encode the file as UTF-8"),
    meta("E011", "FileProcessing", Severity::High, false, true,
        "I/O error reading script file", "Retry or check the file system"),
    meta("E012", "FileProcessing", Severity::High, false, true,
        "Invalid script path", "Pass a path to a regular file"),
    meta("E013", "FileProcessing", Severity::High, false, true,
        "Script file exceeds the configured line limit", "Split the script into smaller files"),

    meta("E020", "Lexical", Severity::High, false, true,
        "Character is not valid in SQL text", "Remove or quote the character"),
    meta("E021", "Lexical", Severity::High, false, true,
        "String literal is missing its closing quote", "Close the literal with a single quote"),
    meta("E022", "Lexical", Severity::High, false, true,
        "Malformed numeric literal", "Check the exponent and decimal point"),
    meta("E023", "Lexical", Severity::High, false, true,
        "Identifier exceeds the configured length limit", "Use a shorter identifier"),
    meta("E024", "Lexical", Severity::High, false, true,
        "String literal exceeds the configured size limit", "Shorten the literal"),
    meta("E025", "Lexical", Severity::High, false, true,
        "Quoted identifier is missing its closing quote", "Close the identifier with a matching quote"),
    meta("E026", "Lexical", Severity::Medium, false, true,
        "Comment exceeds the configured length limit", "Shorten the comment"),
    meta("E027", "Lexical", Severity::High, false, true,
        "Input produced too many tokens", "Split the script"),
    meta("E028", "Lexical", Severity::High, false, true,
        "Block comment is missing its closing */", "Close the comment"),

    meta("E040", "Syntax", Severity::High, false, true,
        "Statement ended before it was complete", "Finish the statement"),
    meta("E041", "Syntax", Severity::High, false, true,
        "No statement to parse", "Provide a statement"),
    meta("E050", "Syntax", Severity::High, false, true,
        "Token does not match any accepted continuation", "Use one of the expected tokens"),
    meta("E051", "Syntax", Severity::High, false, true,
        "Unexpected input after the end of the statement", "Separate statements with ';'"),
    meta("E052", "Syntax", Severity::High, false, true,
        "Script contains too many statements", "Split the script"),
    meta("E087", "Syntax", Severity::High, false, true,
        "Expression nesting exceeds the configured depth", "Simplify the expression"),

    meta("E060", "Semantic", Severity::High, false, true,
        "OR REPLACE and IF NOT EXISTS used together", "Keep only one of the two modifiers"),
    meta("E061", "Semantic", Severity::High, false, true,
        "Field list contains a '*' entry", "List the columns explicitly"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.category)
        .unwrap_or("Unknown")
}
