//! Annotator: Greedy Longest-First Entity Matching
//!
//! All distinct entity texts are compiled into one Aho-Corasick automaton.
//! A single overlapping scan collects every occurrence of every pattern; the
//! occurrences are then replayed in matching order (longest entity first) and
//! each one is kept only if it shares no code point with a span accepted
//! before it.
//!
//! The result is identical to running `find_all` once per entity in matching
//! order, without rescanning the text per entity.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::scanner::catalog::{Entity, EntityCatalog};
use crate::scanner::document::Annotation;
use crate::scanner::span::{fold, FoldedText};

// =============================================================================
// Types
// =============================================================================

/// One catalog entry, in matching order, pointing at its automaton pattern.
#[derive(Debug, Clone)]
struct MatchTarget {
    pattern: usize,
    label: String,
}

/// Accepted spans keyed by start. Spans in the set never overlap.
#[derive(Debug, Default)]
struct SpanSet {
    spans: BTreeMap<usize, usize>,
}

impl SpanSet {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        // Only the last span starting before `end` can reach past `start`.
        self.spans
            .range(..end)
            .next_back()
            .is_some_and(|(_, &accepted_end)| accepted_end > start)
    }

    /// Accept `[start, end)` unless it collides with an accepted span.
    fn insert(&mut self, start: usize, end: usize) -> bool {
        if self.overlaps(start, end) {
            return false;
        }
        self.spans.insert(start, end);
        true
    }
}

// =============================================================================
// EntityMatcher
// =============================================================================

/// A catalog compiled for repeated matching against many documents.
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    /// None when the catalog is empty
    automaton: Option<AhoCorasick>,
    pattern_count: usize,
    targets: Vec<MatchTarget>,
    case_sensitive: bool,
}

impl EntityMatcher {
    /// Compile `catalog`. Identical (folded) texts share one pattern.
    pub fn build(catalog: &EntityCatalog, case_sensitive: bool) -> Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_ids: HashMap<String, usize> = HashMap::new();
        let mut targets = Vec::with_capacity(catalog.len());

        for entity in catalog.matching_order() {
            let pattern = if case_sensitive {
                entity.text().to_string()
            } else {
                fold(entity.text())
            };
            let pattern_id = match pattern_ids.get(&pattern) {
                Some(&id) => id,
                None => {
                    let id = patterns.len();
                    pattern_ids.insert(pattern.clone(), id);
                    patterns.push(pattern);
                    id
                }
            };
            targets.push(MatchTarget {
                pattern: pattern_id,
                label: entity.label().to_string(),
            });
        }

        let automaton = if patterns.is_empty() {
            None
        } else {
            // Standard semantics: overlapping iteration needs it.
            Some(
                AhoCorasickBuilder::new()
                    .match_kind(MatchKind::Standard)
                    .build(&patterns)?,
            )
        };

        Ok(Self {
            automaton,
            pattern_count: patterns.len(),
            targets,
            case_sensitive,
        })
    }

    /// Number of distinct patterns in the automaton.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of catalog entries, duplicates included.
    pub fn entity_count(&self) -> usize {
        self.targets.len()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Annotate one document text.
    ///
    /// Annotations come back in acceptance order (longest entity first), not
    /// sorted by position.
    pub fn annotate(&self, text: &str) -> Vec<Annotation> {
        let automaton = match &self.automaton {
            Some(a) => a,
            None => return Vec::new(),
        };
        if text.is_empty() {
            return Vec::new();
        }

        let folded = FoldedText::new(text, self.case_sensitive);

        // Overlapping matches arrive ordered by end, so each pattern's list
        // is ordered by start as well.
        let mut occurrences: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.pattern_count];
        for mat in automaton.find_overlapping_iter(folded.as_str()) {
            if let Some(span) = folded.char_span(mat.start(), mat.end()) {
                occurrences[mat.pattern().as_usize()].push(span);
            }
        }

        let mut accepted = SpanSet::default();
        let mut annotations = Vec::new();
        for target in &self.targets {
            for &(start, end) in &occurrences[target.pattern] {
                if accepted.insert(start, end) {
                    debug_assert!(start < end && end <= folded.char_len());
                    annotations.push(Annotation::new(start, end, target.label.clone()));
                }
            }
        }
        annotations
    }
}

/// Annotate a single text without building a corpus.
pub fn annotate(text: &str, entities: &[Entity], case_sensitive: bool) -> Result<Vec<Annotation>> {
    let catalog = EntityCatalog::new(entities.to_vec());
    let matcher = EntityMatcher::build(&catalog, case_sensitive)?;
    Ok(matcher.annotate(text))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::span::char_slice;

    fn entities(pairs: &[(&str, &str)]) -> Vec<Entity> {
        pairs
            .iter()
            .map(|(text, label)| Entity::new(*text, *label).unwrap())
            .collect()
    }

    fn triples(annotations: &[Annotation]) -> Vec<(usize, usize, &str)> {
        annotations
            .iter()
            .map(|a| (a.start, a.end, a.label.as_str()))
            .collect()
    }

    #[test]
    fn test_longest_entity_processed_first() {
        let ents = entities(&[("Mozilla", "ORG"), ("rust", "PL")]);
        let result = annotate("rust is made by Mozilla", &ents, false).unwrap();
        assert_eq!(triples(&result), vec![(16, 23, "ORG"), (0, 4, "PL")]);
    }

    #[test]
    fn test_case_sensitive_drops_lowercase_text() {
        let ents = entities(&[("Mozilla", "ORG"), ("Rust", "PL")]);
        let result = annotate("rust is made by Mozilla", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(16, 23, "ORG")]);
    }

    #[test]
    fn test_nested_shorter_entity_loses() {
        let ents = entities(&[("York", "LOC"), ("New York", "LOC")]);
        let result = annotate("I visited New York yesterday", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(10, 18, "LOC")]);
    }

    #[test]
    fn test_equal_length_tie_goes_to_catalog_order() {
        let ents = entities(&[("ab", "FIRST"), ("bc", "SECOND")]);
        let result = annotate("abc", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(0, 2, "FIRST")]);

        let ents = entities(&[("bc", "SECOND"), ("ab", "FIRST")]);
        let result = annotate("abc", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(1, 3, "SECOND")]);
    }

    #[test]
    fn test_same_text_different_label_is_shadowed() {
        let ents = entities(&[("Apple", "ORG"), ("Apple", "FRUIT")]);
        let result = annotate("Apple sells apple juice", &ents, false).unwrap();
        assert_eq!(triples(&result), vec![(0, 5, "ORG"), (12, 17, "ORG")]);
    }

    #[test]
    fn test_self_overlapping_occurrences_resolved() {
        let ents = entities(&[("aa", "X")]);
        let result = annotate("aaaa", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(0, 2, "X"), (2, 4, "X")]);
    }

    #[test]
    fn test_unicode_offsets_are_code_points() {
        let text = "Die Größe von Python überrascht";
        let ents = entities(&[("python", "PL")]);
        let result = annotate(text, &ents, false).unwrap();
        assert_eq!(triples(&result), vec![(14, 20, "PL")]);
        assert_eq!(char_slice(text, 14, 20), Some("Python"));
    }

    #[test]
    fn test_end_offset_follows_text_not_entity_length() {
        // "İ" lowercases to "i\u{307}", which the text spells as two code points.
        let text = "Welcome, i\u{307}!";
        let ents = entities(&[("İ", "X")]);
        let result = annotate(text, &ents, false).unwrap();
        assert_eq!(triples(&result), vec![(9, 11, "X")]);
        assert_eq!(ents[0].char_len(), 1);
        assert_eq!(char_slice(text, 9, 11), Some("i\u{307}"));
    }

    #[test]
    fn test_whole_document_and_oversized_entities() {
        let ents = entities(&[("Rust", "PL"), ("Rust is great", "TOO_LONG")]);
        let result = annotate("Rust", &ents, true).unwrap();
        assert_eq!(triples(&result), vec![(0, 4, "PL")]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(annotate("anything", &[], false).unwrap().is_empty());
        let ents = entities(&[("x", "X")]);
        assert!(annotate("", &ents, false).unwrap().is_empty());
    }

    #[test]
    fn test_matcher_dedupes_patterns() {
        let catalog = EntityCatalog::from_pairs([("Rust", "PL"), ("rust", "LANG"), ("Go", "PL")]).unwrap();
        let insensitive = EntityMatcher::build(&catalog, false).unwrap();
        assert_eq!(insensitive.pattern_count(), 2);
        assert_eq!(insensitive.entity_count(), 3);
        let sensitive = EntityMatcher::build(&catalog, true).unwrap();
        assert_eq!(sensitive.pattern_count(), 3);
    }

    #[test]
    fn test_matcher_reusable_across_documents() {
        let catalog = EntityCatalog::from_pairs([("Java", "PL"), ("Sun Microsystems", "ORG")]).unwrap();
        let matcher = EntityMatcher::build(&catalog, false).unwrap();
        let first = matcher.annotate("Java was created at Sun Microsystems");
        let second = matcher.annotate("no entities here");
        let third = matcher.annotate("Java was created at Sun Microsystems");
        assert_eq!(triples(&first), vec![(20, 36, "ORG"), (0, 4, "PL")]);
        assert!(second.is_empty());
        assert_eq!(first, third);
    }
}
