use resumatch_core::{ResumeSections, SectionKey};

use crate::Vacancy;

/// Additional-info headings as keyed by the segmenter, either language.
const ADDITIONAL_INFO_KEYS: &[&str] = &[
    "дополнительная информация",
    "additional info",
    "additional information",
];

/// Contact headings: the default bucket and the Russian heading, which keys
/// off its literal text.
const CONTACT_KEYS: &[&str] = &["contacts", "контакты"];

/// Build the text embedded for the résumé side of the comparison.
///
/// Blocks are emitted in a fixed order, each followed by a blank line:
/// experience, skills and education under English labels, then additional
/// info and contacts as they are. Missing or empty sections are skipped.
pub fn profile_text(sections: &ResumeSections) -> String {
    let mut text = String::new();

    let labelled = [
        (SectionKey::Experience, "Experience:"),
        (SectionKey::Skills, "Skills and technologies:"),
        (SectionKey::Education, "Education:"),
    ];
    for (key, label) in &labelled {
        if let Some(content) = sections.get(key).filter(|c| !c.is_empty()) {
            text.push_str(label);
            text.push('\n');
            text.push_str(content);
            text.push_str("\n\n");
        }
    }

    for name in ADDITIONAL_INFO_KEYS {
        if let Some(content) = sections.get_by_name(name).filter(|c| !c.is_empty()) {
            text.push_str(content);
            text.push_str("\n\n");
        }
    }

    for name in CONTACT_KEYS {
        if let Some(content) = sections.get_by_name(name).filter(|c| !c.is_empty()) {
            text.push_str(content);
            text.push_str("\n\n");
        }
    }

    text.trim_end().to_string()
}

/// Build the text embedded for one posting.
pub fn vacancy_text(vacancy: &Vacancy) -> String {
    format!(
        "{} {} {}",
        vacancy.name, vacancy.snippet, vacancy.description
    )
    .trim()
    .to_string()
}
