//! Global logging for the SQL parser
//!
//! A process-wide [`LoggingService`] is installed once with [`init_global_logging`].
//! Until then every macro is a no-op, so library callers that never initialize
//! logging pay nothing beyond a `OnceLock` read.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Span;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Initialize the global logger from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let service = Arc::new(LoggingService::with_config());
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    service.log_event(
        LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        )
        .with_context("profile", crate::config::build_info::profile()),
    );

    Ok(())
}

/// Initialize with a caller-supplied service (tests, embedding applications)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether a debug event would reach a logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

fn dispatch(event: LogEvent, context: Vec<(&str, String)>) {
    if let Some(logger) = try_get_global_logger() {
        if !logger.should_log(event.level) {
            return;
        }
        let event = context
            .into_iter()
            .fold(event, |event, (key, value)| event.with_context(key, &value));
        logger.log_event(event);
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<Span>,
    context: Vec<(&str, String)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(span) = span {
        event = event.with_span(span);
    }
    dispatch(event, context);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    dispatch(LogEvent::success(code, message), context);
}

/// Used by `log_info!`, `log_warning!` and `log_debug!`
pub fn log_with_level(level: LogLevel, message: &str, context: Vec<(&str, String)>) {
    let event = match level {
        LogLevel::Warning => LogEvent::warning(message),
        LogLevel::Debug => LogEvent::debug(message),
        _ => LogEvent::info(message),
    };
    dispatch(event, context);
}

/// Error logging that falls back to stderr when logging was never initialized
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_error(code, message),
        None => eprintln!("[ERROR] {} - {}", code, message),
    }
}

pub fn get_system_diagnostics() -> String {
    format!(
        "=== Logging System Diagnostics ===\nInitialized: {}\n\n{}",
        is_initialized(),
        config::get_config_summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_are_silent_without_logger() {
        // Must not panic whether or not another test installed a logger
        crate::log_error!(codes::syntax::UNEXPECTED_TOKEN, "unexpected", "found" => "TABLE");
        crate::log_success!(codes::success::STATEMENT_PARSED, "parsed", "kind" => "USE");
        crate::log_info!("info", "count" => 3);
        crate::log_warning!("warning");
        crate::log_debug!("debug", "depth" => 1usize);
        safe_log_error(codes::system::INTERNAL_ERROR, "fallback");
    }

    #[test]
    fn diagnostics_report_state() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
