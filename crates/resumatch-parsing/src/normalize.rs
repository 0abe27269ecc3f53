use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped from both ends of a line after whitespace collapsing.
pub const DECORATION_CHARS: [char; 5] = ['•', '—', ' ', '\t', '\n'];

/// Collapse whitespace runs to a single space and strip bullets, em-dashes
/// and whitespace from both ends.
///
/// Returns `None` when nothing is left; such lines are dropped, not errors.
pub fn normalize_line(raw: &str) -> Option<String> {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let collapsed = WS_RE.replace_all(raw, " ");
    let trimmed = collapsed.trim_matches(DECORATION_CHARS);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            normalize_line("Senior \t Engineer\u{a0}\u{a0}at  Acme").as_deref(),
            Some("Senior Engineer at Acme")
        );
    }

    #[test]
    fn test_strip_bullets_and_dashes() {
        assert_eq!(normalize_line("  • Rust, Go  ").as_deref(), Some("Rust, Go"));
        assert_eq!(normalize_line("— 2019 —").as_deref(), Some("2019"));
        assert_eq!(normalize_line("•• — • Kafka").as_deref(), Some("Kafka"));
    }

    #[test]
    fn test_inner_decorations_kept() {
        assert_eq!(
            normalize_line("Acme — Senior Engineer • Remote").as_deref(),
            Some("Acme — Senior Engineer • Remote")
        );
    }

    #[test]
    fn test_hyphen_is_not_decoration() {
        assert_eq!(normalize_line("- item -").as_deref(), Some("- item -"));
    }

    #[test]
    fn test_empty_lines() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line(" \t\r\n "), None);
        assert_eq!(normalize_line(" • — "), None);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  • Опыт  работы —3 года ",
            "Skills:\tPython,   Go",
            "— — x — —",
            "plain",
            "\u{2003}em\u{2003}space",
        ];
        for sample in samples {
            let once = normalize_line(sample).unwrap();
            assert_eq!(normalize_line(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_no_double_whitespace_or_decorated_edges() {
        let out = normalize_line("•  a \n\n b  —").unwrap();
        assert!(!out.contains("  "));
        assert!(!out.starts_with(DECORATION_CHARS));
        assert!(!out.ends_with(DECORATION_CHARS));
    }
}
