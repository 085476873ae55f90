//! Exporter: read-only views over annotated documents.
//!
//! - `Record` - flat per-document record, one JSON object per line
//! - `BatchSequence` - lazy, restartable chunks of training examples
//! - `Format` - spaCy / brat / CoNLL / JSONL renderings written to files

pub mod batch;
pub mod format;
pub mod io;

pub use batch::*;
pub use format::*;
pub use io::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanMarkError};
use crate::scanner::{Annotation, Document};

/// `(start, end, label)` in code points.
pub type Span = (usize, usize, String);

/// Flat export record: `{"text": "...", "label": [[start, end, "LABEL"], ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub label: Vec<Span>,
}

impl From<&Document> for Record {
    fn from(document: &Document) -> Self {
        Self {
            text: document.text().to_string(),
            label: document.annotations().iter().map(Annotation::as_tuple).collect(),
        }
    }
}

impl TryFrom<Record> for Document {
    type Error = SpanMarkError;

    fn try_from(record: Record) -> Result<Self> {
        let annotations = record.label.into_iter().map(Annotation::from).collect();
        Document::with_annotations(record.text, annotations)
    }
}

/// One record per document, in document order.
pub fn records(documents: &[Document]) -> Vec<Record> {
    documents.iter().map(Record::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let doc = Document::with_annotations(
            "rust is made by Mozilla",
            vec![Annotation::new(16, 23, "ORG"), Annotation::new(0, 4, "PL")],
        )
        .unwrap();
        let json = serde_json::to_string(&Record::from(&doc)).unwrap();
        assert_eq!(
            json,
            r#"{"text":"rust is made by Mozilla","label":[[16,23,"ORG"],[0,4,"PL"]]}"#
        );
    }

    #[test]
    fn test_record_back_to_document_validates() {
        let record = Record {
            text: "Köln".to_string(),
            label: vec![(0, 5, "LOC".to_string())],
        };
        assert!(Document::try_from(record).is_err());
    }

    #[test]
    fn test_records_keep_document_order() {
        let docs = vec![Document::new("b"), Document::new("a")];
        let texts: Vec<String> = records(&docs).into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["b", "a"]);
    }
}
