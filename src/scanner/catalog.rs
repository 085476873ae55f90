//! EntityCatalog: the gazetteer
//!
//! Holds `(text, label)` pairs in the order the caller supplied them and
//! exposes the matching order: longest text first, ties kept in catalog
//! order. Longer names are more specific, so "Sun Microsystems" must claim
//! its span before "Sun" gets a chance.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Result, SpanMarkError};
use crate::filters::Filters;

// =============================================================================
// Entity
// =============================================================================

/// A known named string and its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEntity")]
pub struct Entity {
    text: String,
    label: String,
}

#[derive(Deserialize)]
struct RawEntity {
    text: String,
    label: String,
}

impl TryFrom<RawEntity> for Entity {
    type Error = SpanMarkError;

    fn try_from(raw: RawEntity) -> Result<Self> {
        Entity::new(raw.text, raw.label)
    }
}

impl Entity {
    /// Create an entity. Empty text is rejected.
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let label = label.into();
        if text.is_empty() {
            return Err(SpanMarkError::EmptyEntityText { label });
        }
        Ok(Self { text, label })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Length of the text in code points (the matching priority key).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// =============================================================================
// EntityCatalog
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCatalog {
    entities: Vec<Entity>,
}

impl From<Vec<Entity>> for EntityCatalog {
    fn from(entities: Vec<Entity>) -> Self {
        Self::new(entities)
    }
}

impl FromIterator<Entity> for EntityCatalog {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl EntityCatalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Build a catalog from raw pairs, failing on the first empty text.
    pub fn from_pairs<I, T, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, L)>,
        T: Into<String>,
        L: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(text, label)| Entity::new(text, label))
            .collect()
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in caller order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities sorted by descending text length; the sort is stable.
    pub fn matching_order(&self) -> Vec<&Entity> {
        let mut ordered: Vec<&Entity> = self.entities.iter().collect();
        ordered.sort_by_key(|entity| std::cmp::Reverse(entity.char_len()));
        ordered
    }

    /// Distinct labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entities
            .iter()
            .map(Entity::label)
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Drop entities whose text appears in `excludes`. Returns how many were removed.
    pub fn exclude<S: AsRef<str>>(&mut self, excludes: &[S]) -> usize {
        if excludes.is_empty() {
            return 0;
        }
        let excludes: HashSet<&str> = excludes.iter().map(AsRef::as_ref).collect();
        let before = self.entities.len();
        self.entities.retain(|entity| !excludes.contains(entity.text()));
        let removed = before - self.entities.len();
        debug!(removed, "excluded entities");
        removed
    }

    /// Drop entities whose text fails `filters`. Returns how many were removed.
    pub fn retain_valid(&mut self, filters: &Filters) -> usize {
        let before = self.entities.len();
        self.entities.retain(|entity| filters.is_valid(entity.text()));
        let removed = before - self.entities.len();
        debug!(removed, "filtered entities");
        removed
    }
}

impl<'a> IntoIterator for &'a EntityCatalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(pairs: &[(&str, &str)]) -> EntityCatalog {
        EntityCatalog::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = Entity::new("", "ORG").unwrap_err();
        assert!(matches!(err, SpanMarkError::EmptyEntityText { ref label } if label == "ORG"));
        assert!(EntityCatalog::from_pairs([("Rust", "PL"), ("", "PL")]).is_err());
    }

    #[test]
    fn test_deserialize_rejects_empty_text() {
        let ok: Entity = serde_json::from_str(r#"{"text":"Rust","label":"PL"}"#).unwrap();
        assert_eq!(ok.text(), "Rust");
        let bad: std::result::Result<Entity, _> =
            serde_json::from_str(r#"{"text":"","label":"PL"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_matching_order_longest_first_stable() {
        let catalog = catalog(&[
            ("Rust", "PL"),
            ("Python", "PL"),
            ("Mozilla", "ORG"),
            ("Java", "PL"),
        ]);
        let order: Vec<&str> = catalog.matching_order().into_iter().map(Entity::text).collect();
        assert_eq!(order, vec!["Mozilla", "Python", "Rust", "Java"]);
        // storage order is untouched
        assert_eq!(catalog.as_slice()[0].text(), "Rust");
    }

    #[test]
    fn test_matching_order_counts_code_points() {
        // "Zürich" is 6 code points but 7 bytes; "Berlin" ties and stays second
        let catalog = catalog(&[("Zürich", "LOC"), ("Berlin", "LOC"), ("Bonn", "LOC")]);
        let order: Vec<&str> = catalog.matching_order().into_iter().map(Entity::text).collect();
        assert_eq!(order, vec!["Zürich", "Berlin", "Bonn"]);
    }

    #[test]
    fn test_labels_first_seen() {
        let catalog = catalog(&[("Rust", "PL"), ("Mozilla", "ORG"), ("Java", "PL")]);
        assert_eq!(catalog.labels(), vec!["PL", "ORG"]);
    }

    #[test]
    fn test_exclude_and_filters() {
        let mut catalog = catalog(&[("the", "MISC"), ("Rust", "PL"), ("C3PO", "ROBOT")]);
        assert_eq!(catalog.exclude(&["the"]), 1);
        let filters = Filters {
            numbers: true,
            ..Default::default()
        };
        assert_eq!(catalog.retain_valid(&filters), 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.as_slice()[0].text(), "Rust");
    }
}
