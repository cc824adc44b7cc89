//! Glob matching for release tags and changelog lines.
//!
//! Semantics: case-sensitive; `*` matches any run of characters including
//! `/`; `?` matches one character; `[...]` classes and `{a,b}` alternation
//! are supported; `\` escapes the next character. The empty string never
//! matches.
//!
//! Path-oriented matchers such as micromatch stop `*` at `/`, so there
//! `feat:*` rejects `feat: add a/b`. Here it accepts it: changelog lines are
//! not paths.

use globset::{GlobBuilder, GlobMatcher};

use crate::ChangelogError;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct MatchPattern {
    pattern: String,
    matcher: GlobMatcher,
}

impl MatchPattern {
    pub fn new(pattern: &str) -> Result<Self, ChangelogError> {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(false)
            .literal_separator(false)
            .backslash_escape(true)
            .build()
            .map_err(|e| ChangelogError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, text: &str) -> bool {
        !text.is_empty() && self.matcher.is_match(text)
    }
}

impl std::fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// One-shot match of `text` against an uncompiled `pattern`
pub fn matches(text: &str, pattern: &str) -> Result<bool, ChangelogError> {
    Ok(MatchPattern::new(pattern)?.matches(text))
}

/// Result of filtering changelog text line by line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredText {
    pub text: String,
    pub kept: usize,
    pub dropped: usize,
}

/// Keep the `\n`-separated lines of `text` matching `pattern`, in order.
///
/// Filtering already-filtered text with the same pattern returns it unchanged.
pub fn filter_lines(text: &str, pattern: &MatchPattern) -> FilteredText {
    let mut kept = Vec::new();
    let mut dropped = 0;

    for line in text.split('\n') {
        if pattern.matches(line) {
            kept.push(line);
        } else {
            dropped += 1;
        }
    }

    FilteredText {
        kept: kept.len(),
        dropped,
        text: kept.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(p: &str) -> MatchPattern {
        MatchPattern::new(p).unwrap()
    }

    #[test]
    fn test_wildcard_suffix() {
        let p = pattern("v1.*");
        assert!(p.matches("v1.5"));
        assert!(p.matches("v1.0"));
        assert!(!p.matches("v2.0"));
        assert!(!p.matches("v10"));
    }

    #[test]
    fn test_case_sensitive() {
        let p = pattern("feat:*");
        assert!(p.matches("feat: thing"));
        assert!(!p.matches("FEAT: thing"));
        assert!(!p.matches("Feat: thing"));
    }

    #[test]
    fn test_star_crosses_slash() {
        assert!(pattern("*feat*").matches("- feat: add src/lib.rs support (#12)"));
        assert!(pattern("release/*").matches("release/2024/01"));
        assert!(pattern("feat:*").matches("feat: add a/b"));
    }

    #[test]
    fn test_classes_and_alternation() {
        assert!(pattern("v[0-9].*").matches("v3.1"));
        assert!(!pattern("v[0-9].*").matches("vx.1"));
        assert!(pattern("{feat,fix}:*").matches("fix: bug"));
        assert!(pattern("{feat,fix}:*").matches("feat: thing"));
        assert!(!pattern("{feat,fix}:*").matches("chore: cleanup"));
    }

    #[test]
    fn test_empty_text_never_matches() {
        assert!(!pattern("*").matches(""));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = MatchPattern::new("v[1.*").unwrap_err();
        assert!(matches!(err, ChangelogError::InvalidPattern { ref pattern, .. } if pattern == "v[1.*"));
        assert!(matches("x", "{a,b").is_err());
    }

    #[test]
    fn test_filter_keeps_matching_lines() {
        let filtered = filter_lines("fix: bug\nfeat: thing\nchore: cleanup\n", &pattern("feat:*"));
        assert_eq!(filtered.text, "feat: thing");
        assert_eq!(filtered.kept, 1);
        assert_eq!(filtered.dropped, 3);
    }

    #[test]
    fn test_filter_preserves_order() {
        let filtered = filter_lines("feat: b\nfix: x\nfeat: a", &pattern("feat:*"));
        assert_eq!(filtered.text, "feat: b\nfeat: a");
    }

    #[test]
    fn test_filter_all_dropped_is_empty() {
        let filtered = filter_lines("fix: bug\nchore: cleanup", &pattern("feat:*"));
        assert_eq!(filtered.text, "");
        assert_eq!(filtered.kept, 0);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let p = pattern("*: *");
        let once = filter_lines("fix: bug\n\nnoise\nfeat: thing\n", &p);
        let twice = filter_lines(&once.text, &p);
        assert_eq!(once.text, "fix: bug\nfeat: thing");
        assert_eq!(twice.text, once.text);
    }
}
