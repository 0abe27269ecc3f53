use std::path::Path;

use thiserror::Error;

use resumatch_parsing::{ParsingConfig, SectionExtractor};

// Re-export domain types for convenience
pub use resumatch_core::{ResumeSections, Section, SectionKey};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("extraction error: {0}")]
    Parsing(#[from] resumatch_parsing::ParsingError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of resumatch-ingest)")]
    NoPdfSupport,
}

/// How a document is read, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// `.txt`, `.text` and `.md` are plain text; anything else is a PDF.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" | "text" | "md" => DocumentKind::Text,
            _ => DocumentKind::Pdf,
        }
    }
}

/// Extract résumé sections from a text or PDF file.
///
/// Dispatches to the appropriate backend based on file extension:
/// - `.txt` / `.text` / `.md` → plain-text backend (form feeds split pages)
/// - anything else → PDF backend (requires `pdf` feature / mupdf)
pub fn extract_sections(path: &Path, config: &ParsingConfig) -> Result<ResumeSections, IngestError> {
    let extractor = SectionExtractor::with_config(config.clone());
    let kind = DocumentKind::from_path(path);
    tracing::debug!(path = %path.display(), ?kind, "ingesting document");

    match kind {
        DocumentKind::Text => extractor
            .extract_sections_via_backend(path, &resumatch_core::TextBackend::new())
            .map_err(IngestError::Parsing),
        DocumentKind::Pdf => extract_pdf(&extractor, path),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(extractor: &SectionExtractor, path: &Path) -> Result<ResumeSections, IngestError> {
    let backend = resumatch_pdf_mupdf::MupdfBackend::default();
    extractor
        .extract_sections_via_backend(path, &backend)
        .map_err(IngestError::Parsing)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_extractor: &SectionExtractor, _path: &Path) -> Result<ResumeSections, IngestError> {
    Err(IngestError::NoPdfSupport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_by_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("cv.txt")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("CV.MD")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("cv.text")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("cv.pdf")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("cv")), DocumentKind::Pdf);
    }
}
