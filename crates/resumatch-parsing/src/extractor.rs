use std::path::Path;

use crate::config::ParsingConfig;
use crate::heading::HeadingMatch;
use crate::section;
use crate::{DocumentBackend, ParsingError, ResumeSections};

/// A configurable résumé segmentation pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses the built-in bilingual heading vocabulary;
/// use [`SectionExtractor::with_config`] to supply custom headings or a
/// different default section.
pub struct SectionExtractor {
    config: ParsingConfig,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Recognize a heading in a single normalized line.
    pub fn recognize_heading(&self, line: &str) -> Option<HeadingMatch> {
        self.config.recognizer.recognize(line)
    }

    /// Segment page texts, in document order, into sections.
    pub fn segment_pages<I, S>(&self, pages: I) -> ResumeSections
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        section::segment_pages_with_config(pages, &self.config)
    }

    /// Segment one block of text treated as a single page.
    pub fn segment_text(&self, text: &str) -> ResumeSections {
        self.segment_pages([Some(text)])
    }

    /// Read `path` through `backend` and segment its pages.
    pub fn extract_sections_via_backend(
        &self,
        path: &Path,
        backend: &dyn DocumentBackend,
    ) -> Result<ResumeSections, ParsingError> {
        let pages = backend.extract_pages(path)?;
        let with_text = pages.iter().filter(|p| p.is_some()).count();
        tracing::debug!(
            path = %path.display(),
            pages = pages.len(),
            with_text,
            "segmenting document"
        );
        let sections = self.segment_pages(pages);
        tracing::info!(
            path = %path.display(),
            sections = sections.len(),
            chars = sections.char_count(),
            "extracted sections"
        );
        Ok(sections)
    }
}
