//! End-to-end processing: script file -> tokens -> statements

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::{FileMetadata, FileProcessingResult, FileProcessor};
use crate::lexical::LexicalAnalyzer;
use crate::syntax::SqlParser;
use std::time::Instant;

/// Process a script file with preferences taken from the environment
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    crate::log_info!("Starting SQL file processing pipeline", "file" => file_path);

    // Stage 1: File processing
    let file_result =
        FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;

    process_file_result(&file_result, config)
}

/// Run the remaining stages over a file that was already read.
///
/// Callers that render diagnostics keep `file_result.source`, the exact text
/// the spans refer to.
pub fn process_file_result(
    file_result: &FileProcessingResult,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let source_name = file_result.metadata.path.display().to_string();

    let mut result = run_stages(
        &source_name,
        &file_result.source,
        Some(file_result.metadata.clone()),
        config,
        start_time,
    )?;
    result.processing_duration += file_result.processing_duration;
    result.log_success();
    Ok(result)
}

/// Process inline script text; `source_name` labels it in logs and output
pub fn process_text(source_name: &str, text: &str) -> Result<PipelineResult, PipelineError> {
    process_text_with_config(source_name, text, &RuntimeConfig::default())
}

pub fn process_text_with_config(
    source_name: &str,
    text: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    crate::log_info!("Starting SQL text processing pipeline", "source" => source_name);

    let result = run_stages(source_name, text, None, config, start_time)?;
    result.log_success();
    Ok(result)
}

fn run_stages(
    source_name: &str,
    text: &str,
    file_metadata: Option<FileMetadata>,
    config: &RuntimeConfig,
    start_time: Instant,
) -> Result<PipelineResult, PipelineError> {
    // Stage 2: Lexical analysis
    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let tokens = analyzer.tokenize(text)?;
    let token_count = tokens.len();

    // Stage 3: Syntax analysis
    let statements = SqlParser::with_preferences(tokens, config.parser.clone()).parse_script()?;

    Ok(PipelineResult {
        statements,
        source_name: source_name.to_string(),
        file_metadata,
        lexical_metrics: analyzer.metrics().clone(),
        token_count,
        processing_duration: start_time.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_processor::FileProcessorError;
    use crate::grammar::ast::nodes::StatementKind;
    use crate::syntax::ParseError;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_pipeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("setup.sql");
        fs::write(
            &path,
            "CREATE STORAGE IF NOT EXISTS s3 USING '{}';\nUSE s3.tmp;\nSHOW FILES;\n",
        )
        .unwrap();

        let result = process_file(path.to_str().unwrap()).unwrap();
        let kinds: Vec<StatementKind> = result.statements.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StatementKind::CreateStorage,
                StatementKind::UseSchema,
                StatementKind::ShowFiles
            ]
        );
        assert_eq!(result.file_metadata.as_ref().map(|m| m.line_count), Some(3));
        assert!(result.token_count > 0);
    }

    #[test]
    fn diagnostics_render_against_the_text_that_was_parsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.sql");
        fs::write(&path, "USE dfs;\nDROP TABLE *;\n").unwrap();

        let config = RuntimeConfig::default();
        let file_result = FileProcessor::from_preferences(&config.file_processor)
            .process_file(path.to_str().unwrap())
            .unwrap();
        let error = process_file_result(&file_result, &config).unwrap_err();

        let rendered = error.render(&file_result.source);
        assert!(rendered.contains("2 | DROP TABLE *;"));
        assert!(rendered.contains("--> 2:12"));
    }

    #[test]
    fn file_errors_pass_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.sql");
        let error = process_file(path.to_str().unwrap()).unwrap_err();
        assert_matches!(
            error,
            PipelineError::FileProcessing(FileProcessorError::FileNotFound { .. })
        );
        assert!(error.span().is_none());
    }

    #[test]
    fn text_pipeline_reports_parse_errors() {
        let error = process_text("inline", "CREATE VIEW v (*) AS SELECT 1").unwrap_err();
        assert_matches!(error, PipelineError::Parse(ParseError::Semantic(_)));
        assert_eq!(error.error_code().as_str(), "E061");
    }

    #[test]
    fn lexical_errors_are_their_own_stage() {
        let error = process_text("inline", "USE `dfs").unwrap_err();
        assert_matches!(error, PipelineError::LexicalAnalysis(_));
    }

    #[test]
    fn config_reaches_the_parser() {
        let config = RuntimeConfig::from_toml_str("[parser]\nmax_parse_depth = 2\n").unwrap();
        assert!(process_text_with_config("inline", "SHOW TABLES WHERE (((a)))", &config).is_err());
        assert!(process_text_with_config("inline", "SHOW TABLES WHERE a = 1", &config).is_ok());
    }
}
