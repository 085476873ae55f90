//! CorpusIndex: reverse lookups from entity text and label to documents.
//!
//! Pure derived state. It is always rebuilt from scratch out of the current
//! annotations and swapped in whole, never patched.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use crate::scanner::{fold, Document};

/// Position of a document in its corpus.
pub type DocumentId = usize;

static NO_DOCUMENTS: BTreeSet<DocumentId> = BTreeSet::new();

/// One index contribution from an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Matched substring, folded when the index is case-insensitive
    pub entity: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    by_entity: HashMap<String, BTreeSet<DocumentId>>,
    by_label: HashMap<String, BTreeSet<DocumentId>>,
    case_sensitive: bool,
}

impl CorpusIndex {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Default::default()
        }
    }

    /// Full rebuild over `documents`. Cost is linear in the number of annotations.
    pub fn build(documents: &[Document], case_sensitive: bool) -> Self {
        Self::from_partials(
            documents
                .iter()
                .enumerate()
                .map(|(id, document)| (id, Self::entries(document, case_sensitive))),
            case_sensitive,
        )
    }

    /// Index contributions of one document.
    pub fn entries(document: &Document, case_sensitive: bool) -> Vec<IndexEntry> {
        document
            .annotations()
            .iter()
            .filter_map(|annotation| {
                let matched = document.span_text(annotation)?;
                Some(IndexEntry {
                    entity: entity_key(matched, case_sensitive).into_owned(),
                    label: annotation.label.clone(),
                })
            })
            .collect()
    }

    /// Reduce per-document contributions into a fresh index.
    pub fn from_partials<I>(partials: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = (DocumentId, Vec<IndexEntry>)>,
    {
        let mut index = Self::new(case_sensitive);
        for (id, entries) in partials {
            for entry in entries {
                index.by_entity.entry(entry.entity).or_default().insert(id);
                index.by_label.entry(entry.label).or_default().insert(id);
            }
        }
        index
    }

    /// Documents containing `text` as a matched entity. Empty for unknown text.
    pub fn entity_ids(&self, text: &str) -> &BTreeSet<DocumentId> {
        let key = entity_key(text, self.case_sensitive);
        self.by_entity.get(&*key).unwrap_or(&NO_DOCUMENTS)
    }

    /// Documents carrying `label`. Empty for unknown labels.
    pub fn label_ids(&self, label: &str) -> &BTreeSet<DocumentId> {
        self.by_label.get(label).unwrap_or(&NO_DOCUMENTS)
    }

    /// Indexed entity keys, sorted.
    pub fn entities(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_entity.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Indexed labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_label.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty() && self.by_label.is_empty()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

fn entity_key(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(fold(text))
    }
}
