//! TextSpan: Code-Point Offsets over UTF-8 Text
//!
//! Every offset SpanMark hands out is counted in Unicode code points, while
//! Rust strings (and the Aho-Corasick automaton) work in bytes. All matches
//! pass through this module before they become annotations.
//!
//! Case-insensitive matching lowercases one code point at a time. A single
//! code point may lowercase to several (`İ` → `i̇`), so the folded text keeps
//! a table of where each original code point starts. Matches that begin or
//! end inside such an expansion are dropped.

use std::borrow::Cow;

// =============================================================================
// Offset conversion
// =============================================================================

/// Number of code points in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a byte offset into a code-point offset.
///
/// Returns `None` when `byte` is past the end or not on a char boundary.
pub fn byte_to_char(text: &str, byte: usize) -> Option<usize> {
    if byte > text.len() || !text.is_char_boundary(byte) {
        return None;
    }
    Some(text[..byte].chars().count())
}

/// Convert a code-point offset into a byte offset.
///
/// `char_idx == char_len(text)` maps to `text.len()`.
pub fn char_to_byte(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

/// Slice `text` by code-point offsets `[start, end)`.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_start = char_to_byte(text, start)?;
    let byte_end = char_to_byte(text, end)?;
    Some(&text[byte_start..byte_end])
}

/// Simple per-code-point lowercase. Not locale aware, not full case folding.
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

// =============================================================================
// FoldedText
// =============================================================================

/// A haystack prepared for matching, with a way back to original offsets.
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    folded: Cow<'a, str>,
    /// Folded byte offset where original code point `i` starts.
    /// The final entry is `folded.len()`, so the table has `char_len + 1` entries.
    starts: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub fn new(text: &'a str, case_sensitive: bool) -> Self {
        let mut starts = Vec::with_capacity(text.len() + 1);

        if case_sensitive {
            starts.extend(text.char_indices().map(|(byte, _)| byte));
            starts.push(text.len());
            return Self {
                folded: Cow::Borrowed(text),
                starts,
            };
        }

        let mut folded = String::with_capacity(text.len());
        for c in text.chars() {
            starts.push(folded.len());
            folded.extend(c.to_lowercase());
        }
        starts.push(folded.len());

        Self {
            folded: Cow::Owned(folded),
            starts,
        }
    }

    /// The text the automaton should scan.
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Code-point length of the original text.
    pub fn char_len(&self) -> usize {
        self.starts.len() - 1
    }

    /// Map a byte range of the folded text back to original code points.
    ///
    /// `None` if either end falls inside the expansion of one code point.
    pub fn char_span(&self, byte_start: usize, byte_end: usize) -> Option<(usize, usize)> {
        let start = self.starts.binary_search(&byte_start).ok()?;
        let end = self.starts.binary_search(&byte_end).ok()?;
        (start < end).then_some((start, end))
    }
}

// =============================================================================
// Search
// =============================================================================

/// Every occurrence start of `needle` in `haystack`, in code points, ascending.
///
/// Self-overlapping occurrences are all reported: `"aa"` in `"aaa"` gives
/// `[0, 1]`. Resolving overlaps between different entities is the
/// annotator's job.
pub fn find_all(haystack: &str, needle: &str, case_sensitive: bool) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    let pattern: Cow<'_, str> = if case_sensitive {
        Cow::Borrowed(needle)
    } else {
        Cow::Owned(fold(needle))
    };
    let folded = FoldedText::new(haystack, case_sensitive);
    let hay = folded.as_str();

    let mut offsets = Vec::new();
    let mut from = 0;
    while let Some(pos) = hay[from..].find(pattern.as_ref()) {
        let start = from + pos;
        if let Some((char_start, _)) = folded.char_span(start, start + pattern.len()) {
            offsets.push(char_start);
        }
        // Step one code point so self-overlapping matches are seen.
        from = start + hay[start..].chars().next().map_or(1, char::len_utf8);
    }
    offsets
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_char_conversion() {
        let text = "Grüße aus Köln";
        // 'ü' and 'ß' are two bytes each
        assert_eq!(byte_to_char(text, 0), Some(0));
        assert_eq!(byte_to_char(text, 4), Some(3));
        assert_eq!(byte_to_char(text, 3), None); // inside 'ü'
        assert_eq!(char_to_byte(text, 3), Some(4));
        assert_eq!(char_to_byte(text, char_len(text)), Some(text.len()));
        assert_eq!(char_to_byte(text, char_len(text) + 1), None);
    }

    #[test]
    fn test_char_slice() {
        let text = "café Python";
        assert_eq!(char_slice(text, 5, 11), Some("Python"));
        assert_eq!(char_slice(text, 0, 4), Some("café"));
        assert_eq!(char_slice(text, 4, 2), None);
        assert_eq!(char_slice(text, 0, 99), None);
    }

    #[test]
    fn test_find_all_self_overlapping() {
        assert_eq!(find_all("aaa", "aa", true), vec![0, 1]);
        assert_eq!(find_all("abab", "ab", true), vec![0, 2]);
    }

    #[test]
    fn test_find_all_case_flag() {
        let text = "Rust and rust and RUST";
        assert_eq!(find_all(text, "Rust", true), vec![0]);
        assert_eq!(find_all(text, "Rust", false), vec![0, 9, 18]);
    }

    #[test]
    fn test_find_all_reports_code_points() {
        let text = "Über die Sprache Python";
        let offsets = find_all(text, "Python", true);
        assert_eq!(offsets, vec![17]);
        assert_eq!(char_slice(text, 17, 23), Some("Python"));
        // The byte offset would be 18 because 'Ü' is two bytes
        assert_eq!(text.find("Python"), Some(18));
    }

    #[test]
    fn test_find_all_skips_partial_expansion() {
        // 'İ' lowercases to "i\u{307}": matching just "i" would split it.
        assert!(find_all("İstanbul", "i", false).is_empty());
        assert_eq!(find_all("İstanbul", "stanbul", false), vec![1]);
    }

    #[test]
    fn test_find_all_edge_cases() {
        assert!(find_all("short", "much longer needle", true).is_empty());
        assert!(find_all("anything", "", true).is_empty());
        assert!(find_all("", "x", false).is_empty());
        assert_eq!(find_all("whole", "whole", true), vec![0]);
    }

    #[test]
    fn test_folded_text_char_span() {
        let folded = FoldedText::new("ÀB", false);
        assert_eq!(folded.as_str(), "àb");
        assert_eq!(folded.char_len(), 2);
        assert_eq!(folded.char_span(0, 2), Some((0, 1)));
        assert_eq!(folded.char_span(2, 3), Some((1, 2)));
        assert_eq!(folded.char_span(1, 3), None);
    }
}
