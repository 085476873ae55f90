//! Contract tests for Corpus.


use crate::corpus::Corpus;
use crate::scanner::{Document, EntityCatalog};

pub(super) const TEXTS: [&str; 5] = [
    "rust is made by Mozilla",
    "Python was created by Guido van Rossum",
    "Java was created by James Gosling at Sun Microsystems",
    "Swift was created by Chris Lattner and Apple",
    "You can find more information about Rust at https://www.rust-lang.org/",
];

pub(super) const ENTITIES: [(&str, &str); 10] = [
    ("Rust", "PL"),
    ("Python", "PL"),
    ("Java", "PL"),
    ("Swift", "PL"),
    ("Mozilla", "ORG"),
    ("Apple", "ORG"),
    ("Sun Microsystems", "ORG"),
    ("Guido van Rossum", "PERSON"),
    ("James Gosling", "PERSON"),
    ("Chris Lattner", "PERSON"),
];

pub(super) fn documents() -> Vec<Document> {
    TEXTS.iter().map(|text| Document::from(*text)).collect()
}

pub(super) fn catalog() -> EntityCatalog {
    EntityCatalog::from_pairs(ENTITIES).unwrap()
}

/// Default (case-insensitive) corpus, processed.
pub(super) fn processed() -> Corpus {
    let mut corpus = Corpus::new(documents(), catalog());
    corpus.process().unwrap();
    corpus
}

/// `(start, end, label)` of a document, sorted by position.
pub(super) fn spans(document: &Document) -> Vec<(usize, usize, String)> {
    document
        .sorted_annotations()
        .into_iter()
        .map(|annotation| annotation.as_tuple())
        .collect()
}
