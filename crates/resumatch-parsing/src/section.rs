use resumatch_core::{ResumeSections, SectionKey};

use crate::config::ParsingConfig;
use crate::heading::HeadingRecognizer;
use crate::normalize::normalize_line;

/// Per-run segmentation state: the active section and the lines collected
/// so far for every section, in activation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionState {
    current: usize,
    sections: Vec<(SectionKey, Vec<String>)>,
}

impl SectionState {
    /// Fresh state with `default_key` active and empty.
    pub fn new(default_key: SectionKey) -> Self {
        Self {
            current: 0,
            sections: vec![(default_key, Vec::new())],
        }
    }

    pub fn current_key(&self) -> &SectionKey {
        &self.sections[self.current].0
    }

    /// Make `key` the active section, registering it on first activation.
    pub fn activate(&mut self, key: SectionKey) {
        self.current = match self.sections.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.sections.push((key, Vec::new()));
                self.sections.len() - 1
            }
        };
    }

    /// Append a normalized line to the active section.
    pub fn append(&mut self, line: String) {
        self.sections[self.current].1.push(line);
    }

    /// Lines collected for `key`, if it was ever activated.
    pub fn lines(&self, key: &SectionKey) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.sections.iter().map(|(k, _)| k)
    }
}

/// Line-by-line section state machine.
///
/// The active section only changes when the recognizer reports a heading.
/// Every non-empty normalized line is appended to exactly one section: the
/// line itself for body text, the heading remainder for heading lines.
pub struct SectionAccumulator<'a> {
    recognizer: &'a HeadingRecognizer,
    state: SectionState,
}

impl<'a> SectionAccumulator<'a> {
    pub fn new(recognizer: &'a HeadingRecognizer, default_key: SectionKey) -> Self {
        Self {
            recognizer,
            state: SectionState::new(default_key),
        }
    }

    pub fn from_config(config: &'a ParsingConfig) -> Self {
        Self::new(&config.recognizer, config.default_section.clone())
    }

    pub fn current_key(&self) -> &SectionKey {
        self.state.current_key()
    }

    /// Feed one page of raw text. Absent or blank pages are skipped.
    pub fn push_page(&mut self, page: Option<&str>) {
        let Some(page) = page else {
            tracing::trace!("skipping page without text");
            return;
        };
        for raw in page.split('\n') {
            self.push_line(raw);
        }
    }

    /// Feed one raw line.
    pub fn push_line(&mut self, raw: &str) {
        let Some(line) = normalize_line(raw) else {
            return;
        };

        match self.recognizer.recognize(&line) {
            Some(m) => {
                tracing::debug!(heading = %m.heading, section = %m.key, line = %line, "found heading");
                self.state.activate(m.key);
                if let Some(remainder) = m.remainder {
                    self.state.append(remainder);
                }
            }
            None => self.state.append(line),
        }
    }

    /// Freeze the state machine and hand out its state.
    pub fn finish(self) -> SectionState {
        self.state
    }
}

/// Join each section's lines with `\n` and trim, in activation order.
///
/// Sections with no content are dropped unless `keep_empty` is set.
pub fn emit_sections(state: SectionState, keep_empty: bool) -> ResumeSections {
    state
        .sections
        .into_iter()
        .map(|(key, lines)| (key, lines.join("\n").trim().to_string()))
        .filter(|(_, content)| keep_empty || !content.is_empty())
        .collect()
}

/// Segment a sequence of page texts into résumé sections.
///
/// Pages are consumed strictly in order; `None` pages are skipped.
pub fn segment_pages<I, S>(pages: I) -> ResumeSections
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    segment_pages_with_config(pages, &ParsingConfig::default())
}

/// Config-aware version of [`segment_pages`].
pub(crate) fn segment_pages_with_config<I, S>(pages: I, config: &ParsingConfig) -> ResumeSections
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut accumulator = SectionAccumulator::from_config(config);
    for page in pages {
        accumulator.push_page(page.as_ref().map(|p| p.as_ref()));
    }
    emit_sections(accumulator.finish(), config.keep_empty_sections)
}

/// Segment a single block of text as one page.
pub fn segment_text(text: &str) -> ResumeSections {
    segment_pages([Some(text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    fn accumulate(lines: &[&str]) -> SectionState {
        let recognizer = HeadingRecognizer::default();
        let mut acc = SectionAccumulator::new(&recognizer, SectionKey::Contacts);
        for line in lines {
            acc.push_line(line);
        }
        acc.finish()
    }

    #[test]
    fn test_initial_state_is_default_bucket() {
        let recognizer = HeadingRecognizer::default();
        let acc = SectionAccumulator::new(&recognizer, SectionKey::Contacts);
        assert_eq!(acc.current_key(), &SectionKey::Contacts);
    }

    #[test]
    fn test_body_lines_stay_in_current_section() {
        let state = accumulate(&["Jane Doe", "jane@example.com", "Experience", "Acme", "Globex"]);
        assert_eq!(
            state.lines(&SectionKey::Contacts).unwrap(),
            &["Jane Doe".to_string(), "jane@example.com".to_string()]
        );
        assert_eq!(
            state.lines(&SectionKey::Experience).unwrap(),
            &["Acme".to_string(), "Globex".to_string()]
        );
        assert_eq!(state.current_key(), &SectionKey::Experience);
    }

    #[test]
    fn test_remainder_goes_to_new_section() {
        let state = accumulate(&["Jane Doe", "Skills: Python, Go", "Rust"]);
        assert_eq!(
            state.lines(&SectionKey::Skills).unwrap(),
            &["Python, Go".to_string(), "Rust".to_string()]
        );
    }

    #[test]
    fn test_revisiting_section_appends() {
        let state = accumulate(&["Skills", "Rust", "Education", "MIT", "Skills", "Go"]);
        let keys: Vec<_> = state.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![SectionKey::Contacts, SectionKey::Skills, SectionKey::Education]
        );
        assert_eq!(
            state.lines(&SectionKey::Skills).unwrap(),
            &["Rust".to_string(), "Go".to_string()]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        let state = accumulate(&["", "   ", "•", "Jane"]);
        assert_eq!(
            state.lines(&SectionKey::Contacts).unwrap(),
            &["Jane".to_string()]
        );
    }

    #[test]
    fn test_emit_joins_and_trims() {
        let state = accumulate(&["Experience", "Acme", "Globex"]);
        let sections = emit_sections(state, false);
        assert_eq!(sections.get(&SectionKey::Experience), Some("Acme\nGlobex"));
        // contacts never received a line
        assert!(!sections.contains(&SectionKey::Contacts));
    }

    #[test]
    fn test_emit_keep_empty() {
        let state = accumulate(&["Experience", "Education", "MIT"]);
        let sections = emit_sections(state, true);
        let keys: Vec<_> = sections.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                SectionKey::Contacts,
                SectionKey::Experience,
                SectionKey::Education
            ]
        );
        assert_eq!(sections.get(&SectionKey::Contacts), Some(""));
        assert_eq!(sections.get(&SectionKey::Experience), Some(""));
    }

    #[test]
    fn test_segment_pages_skips_missing_pages() {
        let pages = vec![
            Some("Contacts\nJane Doe"),
            None,
            Some(""),
            Some("Навыки\nRust"),
        ];
        let sections = segment_pages(pages);
        assert_eq!(sections.get(&SectionKey::Contacts), Some("Jane Doe"));
        assert_eq!(sections.get(&SectionKey::Skills), Some("Rust"));
    }

    #[test]
    fn test_sections_continue_across_pages() {
        let sections = segment_pages([Some("Experience\nAcme"), Some("Globex")]);
        assert_eq!(sections.get(&SectionKey::Experience), Some("Acme\nGlobex"));
    }

    #[test]
    fn test_custom_default_section() {
        let config = ParsingConfigBuilder::new()
            .default_section(SectionKey::Other("about".into()))
            .build()
            .unwrap();
        let sections = segment_pages_with_config([Some("Hello there")], &config);
        assert_eq!(sections.get_by_name("about"), Some("Hello there"));
        assert!(!sections.contains(&SectionKey::Contacts));
    }

    #[test]
    fn test_segment_text_concrete_scenario() {
        let sections = segment_text(
            "Contact: Jane Doe\nExperience\nSenior Engineer at Acme, 2019-2023\nEducation\nBSc Computer Science",
        );
        let pairs: Vec<(String, String)> = sections
            .iter()
            .map(|s| (s.key.to_string(), s.content.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("contacts".to_string(), "Contact: Jane Doe".to_string()),
                (
                    "experience".to_string(),
                    "Senior Engineer at Acme, 2019-2023".to_string()
                ),
                ("education".to_string(), "BSc Computer Science".to_string()),
            ]
        );
    }
}
