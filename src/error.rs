// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

pub const EXTRACTION_FAILURE_MESSAGE: &str =
    "Failed to process PDF. Please ensure the file is a valid PDF document.";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input rejected: {0}")]
    InputRejected(#[from] RejectReason),

    #[error("{message} ({0})", message = EXTRACTION_FAILURE_MESSAGE)]
    Extraction(String),

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Ingestion timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// True for failures that happen before any ingestion work starts.
    pub fn is_input_rejection(&self) -> bool {
        matches!(self, PipelineError::InputRejected(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectReason {
    #[error("no file selected")]
    NoFile,

    #[error("only one file can be ingested at a time ({0} given)")]
    TooManyFiles(usize),

    #[error("{0} is not a PDF document")]
    NotPdf(String),

    #[error("{name} is {size} bytes, the limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
}
