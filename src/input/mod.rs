//! Resume document input
//!
//! Reads the candidate's resume (PDF, plain text or Markdown) into the
//! profile text used for semantic scoring.

pub mod text_extractor;

use crate::error::{JobHunterError, Result};
use log::info;
use std::path::Path;
use text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Markdown,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| JobHunterError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        match extension.to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::Text),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            other => Err(JobHunterError::UnsupportedFormat(format!(
                "'.{}' resume documents are not supported: {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Resume text with runs of whitespace collapsed
pub async fn read_resume_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(JobHunterError::InvalidInput(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let format = DocumentFormat::from_path(path)?;
    info!("Reading resume ({:?}): {}", format, path.display());
    let raw = match format {
        DocumentFormat::Pdf => PdfExtractor.extract(path).await?,
        DocumentFormat::Text => PlainTextExtractor.extract(path).await?,
        DocumentFormat::Markdown => MarkdownExtractor.extract(path).await?,
    };

    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return Err(JobHunterError::InvalidInput(format!(
            "No text found in {}",
            path.display()
        )));
    }
    Ok(text)
}
