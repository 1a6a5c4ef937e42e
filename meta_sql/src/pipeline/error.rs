use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::ParseError;
use crate::utils::{SourceMap, Span};

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Configuration { .. } => codes::system::INITIALIZATION_FAILURE,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::LexicalAnalysis(e) => Some(e.span()),
            Self::Parse(e) => e.span(),
            Self::FileProcessing(_) | Self::Configuration { .. } => None,
        }
    }

    /// Diagnostic with a caret under the offending text when a span is known
    pub fn render(&self, source: &str) -> String {
        let message = format!("[{}] {}", self.error_code(), self);
        match self.span() {
            Some(span) => SourceMap::new(source).format_error(&span, &message),
            None => format!("error: {}\n", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_sql;

    #[test]
    fn render_points_at_span() {
        let source = "DROP STORAGE IF s1";
        let error: PipelineError = parse_sql(source).unwrap_err().into();
        let rendered = error.render(source);
        assert!(rendered.starts_with("error: [E050]"));
        assert!(rendered.contains(source));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn render_without_span() {
        let error = PipelineError::configuration("bad flag");
        assert_eq!(error.render(""), "error: [ERR002] Configuration error: bad flag\n");
    }
}
