// RUNTIME PREFERENCES
//
// Defaults come from META_SQL_* environment variables. A TOML file with the
// same layout as `RuntimeConfig` may override them; numeric limits are always
// clamped to the compile-time maxima.

use crate::config::compile_time;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Reject script files without a `.sql` extension
    pub require_sql_extension: bool,

    /// Upper bound on script size, never above the compile-time limit
    pub max_file_size: u64,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_sql_extension: env_or(env_vars::REQUIRE_SQL_EXTENSION, false),
            max_file_size: env_or(
                env_vars::MAX_FILE_SIZE,
                compile_time::file_processing::MAX_FILE_SIZE,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Count tokens per category while scanning
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Expression nesting limit, never above the compile-time limit
    pub max_parse_depth: usize,

    /// Keep a bounded history of parse errors for diagnostics
    pub record_error_history: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            max_parse_depth: env_or(
                env_vars::PARSER_MAX_DEPTH,
                compile_time::syntax::MAX_PARSE_DEPTH,
            ),
            record_error_history: env_or(env_vars::PARSER_RECORD_ERRORS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// JSON lines instead of plain text
    pub use_structured_logging: bool,

    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(text).map(Self::clamped)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&text).map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))
    }

    /// Apply compile-time maxima to user supplied limits
    pub fn clamped(mut self) -> Self {
        self.file_processor.max_file_size = self
            .file_processor
            .max_file_size
            .min(compile_time::file_processing::MAX_FILE_SIZE);
        self.parser.max_parse_depth = self
            .parser
            .max_parse_depth
            .clamp(1, compile_time::syntax::MAX_PARSE_DEPTH);
        self
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const REQUIRE_SQL_EXTENSION: &str = "META_SQL_REQUIRE_SQL_EXTENSION";
    pub const MAX_FILE_SIZE: &str = "META_SQL_MAX_FILE_SIZE";

    pub const LEXICAL_DETAILED_METRICS: &str = "META_SQL_LEXICAL_DETAILED_METRICS";

    pub const PARSER_MAX_DEPTH: &str = "META_SQL_PARSER_MAX_DEPTH";
    pub const PARSER_RECORD_ERRORS: &str = "META_SQL_PARSER_RECORD_ERRORS";

    pub const LOGGING_USE_STRUCTURED: &str = "META_SQL_LOG_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "META_SQL_LOG_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "META_SQL_LOG_LEVEL";
}
