use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SectionKey;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub search: Option<SearchSection>,
    pub embedding: Option<EmbeddingSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Section that receives text before the first heading.
    pub default_section: Option<SectionKey>,
    /// `"search"` or `"anchored"`.
    pub heading_mode: Option<String>,
    pub keep_empty_sections: Option<bool>,
    /// Extra heading rules appended to the built-in vocabulary.
    pub extra_headings: Option<Vec<HeadingEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub pattern: String,
    /// Fixed target section. When absent the matched text is canonicalized.
    pub section: Option<SectionKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Board host, e.g. `https://spb.hh.ru`.
    pub base_url: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub filter_terms: Option<Vec<String>>,
    pub locations: Option<Vec<LocationEntry>>,
    pub items_on_page: Option<u32>,
    pub request_interval_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub area: Option<u32>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSection {
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub batch_size: Option<usize>,
}

/// Platform config directory path: `<config_dir>/resumatch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("resumatch").join("config.toml"))
}

/// Load config by cascading CWD `.resumatch.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".resumatch.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<T: Clone>(overlay: Option<&T>, base: Option<&T>) -> Option<T> {
    overlay.or(base).cloned()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bp = base.parsing.as_ref();
    let op = overlay.parsing.as_ref();
    let bs = base.search.as_ref();
    let os = overlay.search.as_ref();
    let be = base.embedding.as_ref();
    let oe = overlay.embedding.as_ref();

    ConfigFile {
        parsing: Some(ParsingSection {
            default_section: pick(
                op.and_then(|p| p.default_section.as_ref()),
                bp.and_then(|p| p.default_section.as_ref()),
            ),
            heading_mode: pick(
                op.and_then(|p| p.heading_mode.as_ref()),
                bp.and_then(|p| p.heading_mode.as_ref()),
            ),
            keep_empty_sections: pick(
                op.and_then(|p| p.keep_empty_sections.as_ref()),
                bp.and_then(|p| p.keep_empty_sections.as_ref()),
            ),
            extra_headings: pick(
                op.and_then(|p| p.extra_headings.as_ref()),
                bp.and_then(|p| p.extra_headings.as_ref()),
            ),
        }),
        search: Some(SearchSection {
            base_url: pick(
                os.and_then(|s| s.base_url.as_ref()),
                bs.and_then(|s| s.base_url.as_ref()),
            ),
            keywords: pick(
                os.and_then(|s| s.keywords.as_ref()),
                bs.and_then(|s| s.keywords.as_ref()),
            ),
            filter_terms: pick(
                os.and_then(|s| s.filter_terms.as_ref()),
                bs.and_then(|s| s.filter_terms.as_ref()),
            ),
            locations: pick(
                os.and_then(|s| s.locations.as_ref()),
                bs.and_then(|s| s.locations.as_ref()),
            ),
            items_on_page: pick(
                os.and_then(|s| s.items_on_page.as_ref()),
                bs.and_then(|s| s.items_on_page.as_ref()),
            ),
            request_interval_ms: pick(
                os.and_then(|s| s.request_interval_ms.as_ref()),
                bs.and_then(|s| s.request_interval_ms.as_ref()),
            ),
            timeout_secs: pick(
                os.and_then(|s| s.timeout_secs.as_ref()),
                bs.and_then(|s| s.timeout_secs.as_ref()),
            ),
            top_k: pick(
                os.and_then(|s| s.top_k.as_ref()),
                bs.and_then(|s| s.top_k.as_ref()),
            ),
        }),
        embedding: Some(EmbeddingSection {
            url: pick(
                oe.and_then(|e| e.url.as_ref()),
                be.and_then(|e| e.url.as_ref()),
            ),
            model: pick(
                oe.and_then(|e| e.model.as_ref()),
                be.and_then(|e| e.model.as_ref()),
            ),
            api_key: pick(
                oe.and_then(|e| e.api_key.as_ref()),
                be.and_then(|e| e.api_key.as_ref()),
            ),
            batch_size: pick(
                oe.and_then(|e| e.batch_size.as_ref()),
                be.and_then(|e| e.batch_size.as_ref()),
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_section_round_trip_toml() {
        let config = ConfigFile {
            parsing: Some(ParsingSection {
                default_section: Some(SectionKey::Other("about".into())),
                heading_mode: Some("anchored".to_string()),
                extra_headings: Some(vec![HeadingEntry {
                    pattern: r"Languages|Языки".to_string(),
                    section: None,
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn locations_default_remote_false() {
        let toml_str = "[search]\nlocations = [{ name = \"Москва\", area = 1 }]\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let locations = parsed.search.unwrap().locations.unwrap();
        assert_eq!(locations[0].area, Some(1));
        assert!(!locations[0].remote);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            embedding: Some(EmbeddingSection {
                model: Some("base-model".to_string()),
                url: Some("http://base".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            embedding: Some(EmbeddingSection {
                model: Some("overlay-model".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let embedding = merged.embedding.unwrap();
        assert_eq!(embedding.model.as_deref(), Some("overlay-model"));
        assert_eq!(embedding.url.as_deref(), Some("http://base"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            search: Some(SearchSection {
                top_k: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.search.unwrap().top_k, Some(5));
    }

    #[test]
    fn load_from_path_reads_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[parsing]\ndefault_section = \"Contacts\"\n\n\
             [[parsing.extra_headings]]\npattern = \"Языки\"\nsection = \"Languages\"\n\n\
             [search]\nbase_url = \"https://spb.hh.ru\"\nkeywords = [\"rust\"]\n",
        )
        .unwrap();
        let config = load_from_path(&path).unwrap();
        let parsing = config.parsing.unwrap();
        assert_eq!(parsing.default_section, Some(SectionKey::Contacts));
        assert_eq!(
            parsing.extra_headings.unwrap()[0].section,
            Some(SectionKey::Other("languages".into()))
        );
        let search = config.search.unwrap();
        assert_eq!(search.base_url.as_deref(), Some("https://spb.hh.ru"));
        assert_eq!(search.keywords, Some(vec!["rust".to_string()]));
    }

    #[test]
    fn load_from_path_rejects_empty_section_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[parsing]\ndefault_section = \"  \"\n").unwrap();
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn load_from_path_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(load_from_path(&path).is_none());
    }
}
