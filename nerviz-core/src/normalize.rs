//! # Sentence Normalization
//!
//! Raw transcription sentences carry editorial noise that the upstream
//! extraction model never sees in its own output: long ellipsis runs marking
//! lost or illegible signs, and square brackets marking restored text.
//! Both files are normalized with the same rules before any alignment, so
//! entity mentions and sentences land in the same text space.
//!
//! ## Rules
//!
//! 1. Any run of **three or more** consecutive `.` characters is replaced by
//!    the literal marker `{UNK}`.
//! 2. All `[` and `]` characters are removed.
//!
//! Nothing else is touched: case, whitespace and diacritics pass through
//! unchanged. The function is total and deterministic.

use std::sync::OnceLock;

use regex::Regex;

/// Marker substituted for an ellipsis run (a lost/illegible stretch of text).
pub const UNK_MARKER: &str = "{UNK}";

fn ellipsis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{3,}").unwrap())
}

/// Normalizes a sentence (or an entity mention) for alignment.
///
/// # Example
/// ```
/// use nerviz_core::normalize::normalize_text;
///
/// assert_eq!(normalize_text("He said ... nothing"), "He said {UNK} nothing");
/// assert_eq!(normalize_text("[x] silver"), "x silver");
/// ```
pub fn normalize_text(text: &str) -> String {
    let collapsed = ellipsis_re().replace_all(text, UNK_MARKER);
    collapsed.chars().filter(|c| *c != '[' && *c != ']').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_ellipsis_runs() {
        assert_eq!(normalize_text("He said ... nothing"), "He said {UNK} nothing");
        assert_eq!(normalize_text("a......b"), "a{UNK}b");
        // Two dots are below the threshold and stay as-is
        assert_eq!(normalize_text("a..b"), "a..b");
    }

    #[test]
    fn test_strips_brackets() {
        assert_eq!(normalize_text("[ina] libbi [x]"), "ina libbi x");
    }

    #[test]
    fn test_no_dot_runs_or_brackets_survive() {
        let noisy = "....[abc]..[.....]d...";
        let clean = normalize_text(noisy);
        assert!(!clean.contains("..."));
        assert!(!clean.contains('['));
        assert!(!clean.contains(']'));
    }

    #[test]
    fn test_leaves_everything_else_alone() {
        let s = "Nabû-šumu-ukīn  GAVE 1/2 mina";
        assert_eq!(normalize_text(s), s);
    }
}
