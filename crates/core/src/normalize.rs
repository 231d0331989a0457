//! Text shaping helpers shared by the layouts and the packager.
//!
//! Handles filename-safe title tokens, two-tone headline splitting and
//! budgeted truncation for side-panel text.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Everything outside `[A-Za-z0-9]`.
static NON_ALPHANUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Stem used for output filenames when a title has no usable characters.
pub const DEFAULT_FILENAME_STEM: &str = "Presentation";

/// Reduce a title to a filesystem-safe token.
///
/// Accented letters are canonically decomposed first so "Möte" keeps its
/// base letters ("Mote"); everything outside `[A-Za-z0-9]` is then dropped.
/// Compatibility forms such as ligatures are dropped, never expanded.
/// Applying it twice is the same as applying it once.
pub fn sanitize_title(title: &str) -> String {
    let decomposed: String = title.nfd().collect();
    NON_ALPHANUMERIC_REGEX.replace_all(&decomposed, "").into_owned()
}

/// Sanitized title, or [`DEFAULT_FILENAME_STEM`] when nothing survives.
pub fn filename_stem(title: &str) -> String {
    let stem = sanitize_title(title);
    if stem.is_empty() {
        DEFAULT_FILENAME_STEM.to_string()
    } else {
        stem
    }
}

/// Split a headline into two word groups for two-tone rendering.
///
/// The first group holds `ceil(n / 2)` words. The split looks only at word
/// count, never punctuation.
pub fn split_two_tone(title: &str) -> (String, String) {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() <= 1 {
        return (title.trim().to_string(), String::new());
    }
    let midpoint = words.len().div_ceil(2);
    (words[..midpoint].join(" "), words[midpoint..].join(" "))
}

/// Cut `text` to at most `budget` characters, ending with an ellipsis when
/// anything was dropped.
pub fn truncate_with_ellipsis(text: &str, budget: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Two-digit step label: 1 → "01".
pub fn step_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Q3 Review: 2024!"), "Q3Review2024");
        assert_eq!(sanitize_title("already_Clean-42"), "alreadyClean42");
        assert_eq!(sanitize_title("Släpp Sargen"), "SlappSargen");
        assert_eq!(sanitize_title("!!!"), "");
    }

    #[test]
    fn test_sanitize_never_adds_characters() {
        assert_eq!(sanitize_title("\u{FB01}nal x\u{B2} \u{216B}"), "nalx");
        assert_eq!(sanitize_title("Caf\u{E9} 2"), "Cafe2");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for title in ["Q3 Review: 2024!", "Ledarskap i förändring", "x", "", "日本語 Deck"] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once);
            assert!(once.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_filename_stem_fallback() {
        assert_eq!(filename_stem("???"), DEFAULT_FILENAME_STEM);
        assert_eq!(filename_stem("My Talk"), "MyTalk");
    }

    #[test]
    fn test_split_two_tone() {
        assert_eq!(
            split_two_tone("The future of work"),
            ("The future".to_string(), "of work".to_string())
        );
        assert_eq!(
            split_two_tone("Lead with courage today"),
            ("Lead with".to_string(), "courage today".to_string())
        );
        assert_eq!(
            split_two_tone("Stop hiding, start: leading"),
            ("Stop hiding,".to_string(), "start: leading".to_string())
        );
        assert_eq!(
            split_two_tone("Odd number here"),
            ("Odd number".to_string(), "here".to_string())
        );
        assert_eq!(split_two_tone("Alone"), ("Alone".to_string(), String::new()));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        let long = "a".repeat(120);
        let cut = truncate_with_ellipsis(&long, 100);
        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "åäö".repeat(50);
        let cut = truncate_with_ellipsis(&text, 80);
        assert_eq!(cut.chars().count(), 80);
    }

    #[test]
    fn test_step_number() {
        assert_eq!(step_number(0), "01");
        assert_eq!(step_number(9), "10");
    }
}
