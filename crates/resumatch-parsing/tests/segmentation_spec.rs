use std::io::Write;

use resumatch_parsing::{
    ParsingConfigBuilder, SectionExtractor, SectionKey, TextBackend, extract_sections,
    normalize_line, segment_pages, segment_text,
};

fn pairs(text: &str) -> Vec<(String, String)> {
    segment_text(text)
        .iter()
        .map(|s| (s.key.to_string(), s.content.clone()))
        .collect()
}

#[test]
fn concrete_scenario() {
    let pages =
        ["Contact: Jane Doe\nExperience\nSenior Engineer at Acme, 2019-2023\nEducation\nBSc Computer Science"];
    let sections = segment_pages(pages.iter().map(|p| Some(*p)));
    let json = serde_json::to_string(&sections).unwrap();
    assert_eq!(
        json,
        r#"{"contacts":"Contact: Jane Doe","experience":"Senior Engineer at Acme, 2019-2023","education":"BSc Computer Science"}"#
    );
}

#[test]
fn no_information_loss() {
    let raw = "  Jane   Doe \n• jane@example.com\n\nОпыт работы: 3 года\nAcme — Senior Engineer\n\
               Globex\nSkills: Rust, Go\n  — Kafka —\nСертификаты\nAWS SAA\nEducation\nMIT";
    let kept: Vec<String> = raw.lines().filter_map(normalize_line).collect();

    let extractor = SectionExtractor::new();
    let body_chars: usize = kept
        .iter()
        .map(|line| match extractor.recognize_heading(line) {
            Some(m) => m.remainder.map(|r| r.chars().count()).unwrap_or(0),
            None => line.chars().count(),
        })
        .sum();
    let body_lines = kept
        .iter()
        .filter(|line| {
            extractor
                .recognize_heading(line)
                .is_none_or(|m| m.remainder.is_some())
        })
        .count();

    let sections = extractor.segment_text(raw);
    let separators = body_lines - sections.len();
    assert_eq!(sections.char_count(), body_chars + separators);
}

#[test]
fn every_body_line_lands_in_one_section() {
    let sections = segment_text("Jane\nSkills\nRust\nEducation\nMIT\nSkills\nGo");
    let all: Vec<&str> = sections
        .iter()
        .flat_map(|s| s.content.split('\n'))
        .collect();
    assert_eq!(all.len(), 4);
    for line in ["Jane", "Rust", "MIT", "Go"] {
        assert_eq!(all.iter().filter(|l| **l == line).count(), 1, "{line}");
    }
}

#[test]
fn default_bucket_receives_leading_text() {
    assert_eq!(
        pairs("Jane Doe\n+7 900 000-00-00"),
        vec![("contacts".to_string(), "Jane Doe\n+7 900 000-00-00".to_string())]
    );
}

#[test]
fn configured_default_bucket() {
    let config = ParsingConfigBuilder::new()
        .default_section(SectionKey::from_name("About"))
        .build()
        .unwrap();
    let sections = SectionExtractor::with_config(config).segment_text("Jane Doe\nSkills\nRust");
    let keys: Vec<String> = sections.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["about", "skills"]);
}

#[test]
fn english_contacts_heading_joins_default_bucket() {
    assert_eq!(
        pairs("Jane Doe\nSkills\nRust\nContacts\njane@example.com"),
        vec![
            ("contacts".to_string(), "Jane Doe\njane@example.com".to_string()),
            ("skills".to_string(), "Rust".to_string()),
        ]
    );
}

#[test]
fn bilingual_equivalence() {
    let ru = segment_text("Опыт работы: 3 года\nЯндекс");
    let en = segment_text("Experience: 3 years\nYandex");
    assert_eq!(ru.keys().collect::<Vec<_>>(), vec![&SectionKey::Experience]);
    assert_eq!(en.keys().collect::<Vec<_>>(), vec![&SectionKey::Experience]);
}

#[test]
fn trailing_text_retention() {
    let sections = segment_text("Jane\nSkills: Python, Go\nDocker");
    assert_eq!(sections.get(&SectionKey::Skills), Some("Python, Go\nDocker"));
}

#[test]
fn order_stability_on_revisit() {
    let sections = segment_text(
        "Jane\nEducation\nMIT\nSkills\nRust\nEducation\nStanford\nSkills\nGo\nПроекты\nresumatch",
    );
    let keys: Vec<String> = sections.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["contacts", "education", "skills", "проекты"]);
    assert_eq!(sections.get(&SectionKey::Education), Some("MIT\nStanford"));
}

#[test]
fn literal_keys_stay_language_specific() {
    let sections = segment_text("Сертификаты\nAWS\nCertificates\nGCP");
    assert_eq!(sections.get_by_name("сертификаты"), Some("AWS"));
    assert_eq!(sections.get_by_name("certificates"), Some("GCP"));
}

#[test]
fn empty_and_missing_pages_are_skipped() {
    let pages: Vec<Option<String>> = vec![
        None,
        Some(String::new()),
        Some("  \n\t\n".to_string()),
        Some("Навыки\nSQL".to_string()),
    ];
    let sections = segment_pages(pages);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections.get(&SectionKey::Skills), Some("SQL"));
}

#[test]
fn empty_input_yields_no_sections() {
    assert!(segment_pages(Vec::<Option<&str>>::new()).is_empty());
    assert!(segment_text("").is_empty());
}

#[test]
fn extract_from_text_file() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(
        file,
        "Jane Doe\nОпыт работы —2 года\nAcme\x0cОбразование\nСПбГУ"
    )
    .unwrap();
    let sections = extract_sections(file.path(), &TextBackend::new()).unwrap();
    assert_eq!(sections.get(&SectionKey::Experience), Some("Acme"));
    assert_eq!(sections.get(&SectionKey::Education), Some("СПбГУ"));
}
