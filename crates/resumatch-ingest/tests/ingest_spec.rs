use std::io::Write;

use resumatch_ingest::{IngestError, SectionKey, extract_sections};
use resumatch_parsing::{ParsingConfig, ParsingConfigBuilder};

#[test]
fn text_file_is_segmented() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(
        file,
        "Иван Петров\n+7 900 123-45-67\nКлючевые навыки\nPython, SQL\nОбразование\nИТМО"
    )
    .unwrap();

    let sections = extract_sections(file.path(), &ParsingConfig::default()).unwrap();
    let keys: Vec<String> = sections.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["contacts", "skills", "education"]);
    assert_eq!(sections.get(&SectionKey::Skills), Some("Python, SQL"));
}

#[test]
fn config_is_honored() {
    let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
    write!(file, "Hello\nЯзыки: English C1").unwrap();

    let config = ParsingConfigBuilder::new()
        .default_section(SectionKey::from_name("about"))
        .add_heading(r"\bЯзыки\b", Some(SectionKey::from_name("languages")))
        .build()
        .unwrap();
    let sections = extract_sections(file.path(), &config).unwrap();
    assert_eq!(sections.get_by_name("about"), Some("Hello"));
    assert_eq!(sections.get_by_name("languages"), Some("English C1"));
}

#[test]
fn missing_text_file_is_an_error() {
    let err = extract_sections(
        std::path::Path::new("/definitely/not/here.txt"),
        &ParsingConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Parsing(_)));
}
