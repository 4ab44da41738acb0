//! Typed error hierarchy for the funnel tool.
//!
//! The pipeline stages themselves are infallible. Errors only arise at the
//! edges:
//! - `IngestError`: reading and decoding the record payload
//! - `ExportError`: writing delimited-text output

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading analytics records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read records file at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in records payload: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Records payload must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("Record at index {index} is not a JSON object")]
    RecordNotObject { index: usize },
}

/// Errors from writing exported rows.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create export file at {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV output: {0}")]
    Flush(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_error_read_failed_carries_path() {
        let path = PathBuf::from("/data/records.json");
        let err = IngestError::ReadFailed {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        match &err {
            IngestError::ReadFailed { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected ReadFailed"),
        }
        assert!(err.to_string().contains("/data/records.json"));
    }

    #[test]
    fn ingest_error_record_not_object_carries_index() {
        let err = IngestError::RecordNotObject { index: 7 };
        assert!(matches!(err, IngestError::RecordNotObject { index: 7 }));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn ingest_error_not_an_array_names_found_type() {
        let err = IngestError::NotAnArray { found: "object" };
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&IngestError::RecordNotObject { index: 0 });
        assert_std_error(&ExportError::Flush(std::io::Error::other("closed")));
    }
}
