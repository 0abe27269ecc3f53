use resumatch_core::SectionKey;

use crate::heading::{HeadingMode, HeadingRecognizer, HeadingRule, default_heading_rules};

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the section segmentation pipeline.
///
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Compiled heading vocabulary and matching mode.
    pub(crate) recognizer: HeadingRecognizer,
    /// Section that receives text seen before the first heading.
    pub(crate) default_section: SectionKey,
    /// Emit sections that were activated but never received a line.
    pub(crate) keep_empty_sections: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            recognizer: HeadingRecognizer::default(),
            default_section: SectionKey::Contacts,
            keep_empty_sections: false,
        }
    }
}

impl ParsingConfig {
    pub fn recognizer(&self) -> &HeadingRecognizer {
        &self.recognizer
    }

    pub fn default_section(&self) -> &SectionKey {
        &self.default_section
    }

    pub fn keep_empty_sections(&self) -> bool {
        self.keep_empty_sections
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    headings: ListOverride<HeadingRule>,
    heading_mode: Option<HeadingMode>,
    default_section: Option<SectionKey>,
    keep_empty_sections: Option<bool>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Heading vocabulary ──

    /// Replace the built-in heading vocabulary.
    pub fn set_headings(mut self, rules: Vec<HeadingRule>) -> Self {
        self.headings = ListOverride::Replace(rules);
        self
    }

    /// Append a heading rule after the built-in vocabulary.
    ///
    /// With `section: None` the matched text is canonicalized like the
    /// built-in headings.
    pub fn add_heading(mut self, pattern: &str, section: Option<SectionKey>) -> Self {
        let rule = HeadingRule::new(pattern, section);
        match &mut self.headings {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(rule),
            ListOverride::Default => self.headings = ListOverride::Extend(vec![rule]),
        }
        self
    }

    pub fn heading_mode(mut self, mode: HeadingMode) -> Self {
        self.heading_mode = Some(mode);
        self
    }

    // ── State machine ──

    pub fn default_section(mut self, key: SectionKey) -> Self {
        self.default_section = Some(key);
        self
    }

    pub fn keep_empty_sections(mut self, keep: bool) -> Self {
        self.keep_empty_sections = Some(keep);
        self
    }

    /// Compile the heading vocabulary and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let mode = self.heading_mode.unwrap_or_default();
        let recognizer = match self.headings {
            ListOverride::Default => HeadingRecognizer::default().with_mode(mode),
            headings => HeadingRecognizer::new(headings.resolve(&default_heading_rules()), mode)?,
        };

        Ok(ParsingConfig {
            recognizer,
            default_section: self.default_section.unwrap_or_default(),
            keep_empty_sections: self.keep_empty_sections.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.default_section, SectionKey::Contacts);
        assert!(!config.keep_empty_sections);
        assert_eq!(config.recognizer.mode(), HeadingMode::Search);
        assert_eq!(config.recognizer.rules().len(), default_heading_rules().len());
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .default_section(SectionKey::Other("about".into()))
            .keep_empty_sections(true)
            .heading_mode(HeadingMode::Anchored)
            .build()
            .unwrap();
        assert_eq!(config.default_section, SectionKey::Other("about".into()));
        assert!(config.keep_empty_sections);
        assert_eq!(config.recognizer.mode(), HeadingMode::Anchored);
    }

    #[test]
    fn test_builder_add_heading_extends_defaults() {
        let config = ParsingConfigBuilder::new()
            .add_heading(r"\bLanguages\b", None)
            .add_heading(r"\bЯзыки\b", Some(SectionKey::Other("languages".into())))
            .build()
            .unwrap();
        assert_eq!(
            config.recognizer.rules().len(),
            default_heading_rules().len() + 2
        );
    }

    #[test]
    fn test_builder_set_headings_replaces() {
        let config = ParsingConfigBuilder::new()
            .set_headings(vec![HeadingRule::new(r"\bHobbies\b", None)])
            .build()
            .unwrap();
        assert_eq!(config.recognizer.rules().len(), 1);
        assert!(config.recognizer.recognize("Skills").is_none());
        assert!(config.recognizer.recognize("Hobbies").is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new().add_heading(r"[invalid", None).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
