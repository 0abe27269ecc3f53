use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors return the raw text of every page in document order. A page
/// without extractable text is `None`; the segmentation pipeline in
/// `resumatch_parsing::SectionExtractor` skips it.
pub trait DocumentBackend: Send + Sync {
    /// Extract the raw text of each page, newline-separated into lines.
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>, BackendError>;
}

/// Plain UTF-8 text backend. Form feeds (`\x0c`) separate pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl TextBackend {
    pub fn new() -> Self {
        Self
    }

    /// Split already-loaded text into pages.
    pub fn split_pages(text: &str) -> Vec<Option<String>> {
        text.split('\x0c')
            .map(|page| {
                if page.trim().is_empty() {
                    None
                } else {
                    Some(page.to_string())
                }
            })
            .collect()
    }
}

impl DocumentBackend for TextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>, BackendError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| BackendError::ExtractionError(format!("invalid UTF-8: {}", e)))?;
        let pages = Self::split_pages(&text);
        tracing::debug!(path = %path.display(), pages = pages.len(), "read text document");
        Ok(pages)
    }
}
