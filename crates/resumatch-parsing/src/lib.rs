use std::path::Path;

use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod heading;
pub mod normalize;
pub mod section;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::SectionExtractor;
pub use heading::{HeadingMatch, HeadingMode, HeadingRecognizer, HeadingRule};
pub use normalize::normalize_line;
pub use section::{SectionAccumulator, SectionState, emit_sections, segment_pages, segment_text};
// Re-export domain types from core (canonical definitions live there)
pub use resumatch_core::{
    BackendError, DocumentBackend, ResumeSections, Section, SectionKey, TextBackend,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] resumatch_core::BackendError),
}

/// Extract résumé sections from a document using the given backend for text
/// extraction.
///
/// Pipeline:
/// 1. Extract per-page text via `backend`
/// 2. Normalize every line, skipping empty pages and lines
/// 3. Switch the current section on each recognized heading
/// 4. Join each section's lines in first-activation order
pub fn extract_sections(
    path: &Path,
    backend: &dyn DocumentBackend,
) -> Result<ResumeSections, ParsingError> {
    SectionExtractor::new().extract_sections_via_backend(path, backend)
}
