//! Error handling for the job hunter pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobHunterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Tracker error: {0}")]
    Tracker(String),

    #[error("Notification error: {0}")]
    Notifier(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Pipeline initialization failed: {0}")]
    Initialization(String),
}

pub type Result<T> = std::result::Result<T, JobHunterError>;

/// The embedding model library reports failures through anyhow
impl From<anyhow::Error> for JobHunterError {
    fn from(err: anyhow::Error) -> Self {
        JobHunterError::Embedding(err.to_string())
    }
}

impl From<reqwest::Error> for JobHunterError {
    fn from(err: reqwest::Error) -> Self {
        JobHunterError::Network(err.to_string())
    }
}
