use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, DocumentBackend, TextBackend};

/// Identifier of a résumé section.
///
/// Only experience, education and skills are canonical across languages.
/// Every other heading keys off its own matched text (lowercased), so
/// "Сертификаты" and "Certificates" end up in two different buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SectionKey {
    /// Bucket for the header/contact block that precedes the first heading.
    #[default]
    Contacts,
    Experience,
    Education,
    Skills,
    /// Literal lowercased heading text.
    Other(String),
}

impl SectionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SectionKey::Contacts => "contacts",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Other(name) => name,
        }
    }

    /// Build a key from a section name as it appears in output or config.
    ///
    /// The name is lowercased and whitespace-collapsed; the four fixed names
    /// map to their variants, anything else becomes [`SectionKey::Other`].
    pub fn from_name(name: &str) -> Self {
        let name = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match name.as_str() {
            "contacts" => SectionKey::Contacts,
            "experience" => SectionKey::Experience,
            "education" => SectionKey::Education,
            "skills" => SectionKey::Skills,
            _ => SectionKey::Other(name),
        }
    }

    /// Map the text of a matched heading to its section key.
    ///
    /// Substring tests run in a fixed order: experience, education, skills.
    /// When none applies the key is the heading text itself, lowercased,
    /// with a trailing colon removed.
    pub fn canonicalize(heading: &str) -> Self {
        let lower = heading.to_lowercase();
        if lower.contains("опыт") || lower.contains("experience") {
            SectionKey::Experience
        } else if lower.contains("образование") || lower.contains("education") {
            SectionKey::Education
        } else if lower.contains("навыки") || lower.contains("skills") {
            SectionKey::Skills
        } else {
            SectionKey::from_name(lower.trim().trim_end_matches([':', '：']).trim_end())
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name.trim().is_empty() {
            return Err(de::Error::custom("section name must not be empty"));
        }
        Ok(SectionKey::from_name(&name))
    }
}

/// One emitted section: its key and the joined, trimmed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: SectionKey,
    pub content: String,
}

/// Final mapping from section key to content, in first-activation order.
///
/// Serializes as a JSON/TOML map that preserves this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeSections {
    sections: Vec<Section>,
}

impl ResumeSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of the section with the given key.
    pub fn get(&self, key: &SectionKey) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| &s.key == key)
            .map(|s| s.content.as_str())
    }

    /// Content of the section whose name (as printed) equals `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.get(&SectionKey::from_name(name))
    }

    pub fn contains(&self, key: &SectionKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.sections.iter().map(|s| &s.key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total character count of all section contents.
    pub fn char_count(&self) -> usize {
        self.sections.iter().map(|s| s.content.chars().count()).sum()
    }
}

impl FromIterator<(SectionKey, String)> for ResumeSections {
    /// A repeated key replaces the earlier content but keeps its position.
    fn from_iter<I: IntoIterator<Item = (SectionKey, String)>>(iter: I) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        for (key, content) in iter {
            match sections.iter_mut().find(|s| s.key == key) {
                Some(existing) => existing.content = content,
                None => sections.push(Section { key, content }),
            }
        }
        Self { sections }
    }
}

impl IntoIterator for ResumeSections {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResumeSections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl Serialize for ResumeSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(section.key.as_str(), &section.content)?;
        }
        map.end()
    }
}
