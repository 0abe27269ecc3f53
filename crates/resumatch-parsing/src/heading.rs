use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use resumatch_core::SectionKey;

use crate::normalize::normalize_line;

/// Built-in bilingual heading vocabulary, in priority order.
///
/// Keywords are delimited by word boundaries so "Experienced" or
/// "Projection" never start a section. The experience heading swallows
/// duration qualifiers ("3 года 6 месяцев", "2 years") so they do not leak
/// into the section body.
pub const DEFAULT_HEADING_PATTERNS: &[&str] = &[
    r"\b(?:О\s*себе|About(?:\s+me)?|Summary)\b",
    r"\b(?:Опыт\s*работы|(?:(?:Work|Professional)\s+)?Experience)\b(?:\s*[:\-–—]?\s*\d+\s*(?:год(?:а|ов)?|лет|месяц(?:а|ев)?|years?|months?)\b)*",
    r"\b(?:Образование|Education)\b",
    r"\b(?:(?:Ключевые|Key|Technical|Core)\s+)?(?:Навыки|Skills)\b",
    r"\b(?:Сертификаты?|Certificates?)\b",
    r"\b(?:Проекты?|Projects?)\b",
    r"\b(?:Дополнительная\s*информация|Additional\s*Info(?:rmation)?)\b",
    r"\b(?:Контакты|Contacts)\b",
];

/// Optional colon consumed after every heading keyword.
const COLON_SUFFIX: &str = r"(?:\s*[:：])?";

static DEFAULT_RECOGNIZER: Lazy<HeadingRecognizer> = Lazy::new(|| {
    HeadingRecognizer::new(default_heading_rules(), HeadingMode::Search).unwrap()
});

/// The built-in heading vocabulary as rules.
pub fn default_heading_rules() -> Vec<HeadingRule> {
    DEFAULT_HEADING_PATTERNS
        .iter()
        .map(|p| HeadingRule::new(p, None))
        .collect()
}

/// Where in a line a heading may appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadingMode {
    /// Anywhere in the line, e.g. trailing other text on the same visual line.
    #[default]
    Search,
    /// Only at the very start of the line.
    Anchored,
}

/// One entry of the heading table: a pattern and how its match is keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRule {
    pub pattern: String,
    /// Fixed target section. `None` canonicalizes the matched text with
    /// [`SectionKey::canonicalize`].
    pub section: Option<SectionKey>,
}

impl HeadingRule {
    pub fn new(pattern: &str, section: Option<SectionKey>) -> Self {
        Self {
            pattern: pattern.to_string(),
            section,
        }
    }

    fn key_for(&self, matched: &str) -> SectionKey {
        match &self.section {
            Some(key) => key.clone(),
            None => SectionKey::canonicalize(matched),
        }
    }
}

/// A recognized heading inside a normalized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Byte range of the heading within the line.
    pub span: Range<usize>,
    /// The matched heading text.
    pub heading: String,
    pub key: SectionKey,
    /// Normalized text left on the line once the heading is removed.
    pub remainder: Option<String>,
}

/// Matches lines against the heading table.
///
/// All rules are compiled into a single case-insensitive alternation; each
/// rule sits in its own named group so the winning rule is known after a
/// match. The leftmost match wins, ties go to the earlier rule.
#[derive(Debug, Clone)]
pub struct HeadingRecognizer {
    /// `None` for an empty table, which never matches.
    regex: Option<Regex>,
    rules: Vec<HeadingRule>,
    mode: HeadingMode,
}

impl Default for HeadingRecognizer {
    fn default() -> Self {
        DEFAULT_RECOGNIZER.clone()
    }
}

impl HeadingRecognizer {
    /// Compile `rules` into a recognizer. Fails if any pattern is invalid.
    pub fn new(rules: Vec<HeadingRule>, mode: HeadingMode) -> Result<Self, regex::Error> {
        // Compile each rule alone first so the error names the broken pattern.
        for rule in &rules {
            Regex::new(&rule.pattern)?;
        }

        let regex = if rules.is_empty() {
            None
        } else {
            let alternation = rules
                .iter()
                .enumerate()
                .map(|(i, rule)| format!("(?P<h{}>(?:{}){})", i, rule.pattern, COLON_SUFFIX))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!("(?i){}", alternation))?)
        };

        Ok(Self { regex, rules, mode })
    }

    pub fn with_mode(mut self, mode: HeadingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> HeadingMode {
        self.mode
    }

    pub fn rules(&self) -> &[HeadingRule] {
        &self.rules
    }

    /// Find a heading in a normalized line.
    ///
    /// Returns `None` for body text. Zero-length matches from custom rules
    /// are ignored.
    pub fn recognize(&self, line: &str) -> Option<HeadingMatch> {
        let caps = self
            .regex
            .as_ref()?
            .captures_iter(line)
            .find(|c| c.get(0).is_some_and(|m| !m.is_empty()))?;
        let whole = caps.get(0)?;

        if self.mode == HeadingMode::Anchored && whole.start() != 0 {
            return None;
        }

        let rule_index = (0..self.rules.len()).find(|i| caps.name(&format!("h{}", i)).is_some())?;
        let rule = &self.rules[rule_index];

        let heading = whole.as_str().to_string();
        let key = rule.key_for(&heading);
        let remainder = normalize_line(&format!(
            "{} {}",
            &line[..whole.start()],
            &line[whole.end()..]
        ));

        Some(HeadingMatch {
            span: whole.range(),
            heading,
            key,
            remainder,
        })
    }
}
