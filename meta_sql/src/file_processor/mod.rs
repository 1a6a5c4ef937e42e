//! Reading SQL script files from disk

mod processor;

use crate::config::runtime::FileProcessorPreferences;
pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Process a file with preferences taken from the environment
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    create_processor_from_preferences(&FileProcessorPreferences::default()).process_file(file_path)
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("admin.sql");
        fs::write(&file_path, "SHOW SCHEMAS;\n").unwrap();

        let result = process_file(file_path.to_str().unwrap()).unwrap();
        assert_eq!(result.source, "SHOW SCHEMAS;\n");
    }

    #[test]
    fn preferences_never_raise_the_build_limit() {
        let prefs = FileProcessorPreferences {
            require_sql_extension: true,
            max_file_size: u64::MAX,
        };
        let processor = create_processor_from_preferences(&prefs);
        assert!(processor.require_sql_extension);
        assert_eq!(processor.max_file_size(), MAX_FILE_SIZE);
    }
}
