use crate::file_processor::FileMetadata;
use crate::grammar::ast::nodes::SqlStatement;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use std::time::Duration;

/// Everything produced by one run of the pipeline
#[derive(Debug)]
pub struct PipelineResult {
    pub statements: Vec<SqlStatement>,
    /// File path, or a caller-chosen label for inline text
    pub source_name: String,
    /// Present only when the input came from disk
    pub file_metadata: Option<FileMetadata>,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn log_success(&self) {
        let seconds = self.processing_duration.as_secs_f64().max(f64::EPSILON);
        crate::log_success!(
            codes::success::PIPELINE_COMPLETE,
            "SQL processing pipeline succeeded",
            "source" => &self.source_name,
            "statements" => self.statement_count(),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", self.token_count as f64 / seconds)
        );
    }

    /// Canonical SQL, one statement per line with its terminator
    pub fn to_sql(&self) -> String {
        self.statements
            .iter()
            .map(|statement| format!("{};\n", statement))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source_name,
            "file": self.file_metadata,
            "statements": self.statements,
            "metrics": {
                "tokens": self.token_count,
                "lexical": self.lexical_metrics,
                "duration_ms": self.processing_duration.as_secs_f64() * 1000.0,
            },
        })
    }
}
