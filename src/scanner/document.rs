//! Document and Annotation: the annotated-text data model.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanMarkError};
use crate::scanner::span::{char_len, char_slice};

// =============================================================================
// Annotation
// =============================================================================

/// A labeled code-point span `[start, end)` inside a document's text.
///
/// Serializes as the three-element array `[start, end, "LABEL"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize, String)", into = "(usize, usize, String)")]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Annotation {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if the two spans share at least one code point.
    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn as_tuple(&self) -> (usize, usize, String) {
        (self.start, self.end, self.label.clone())
    }
}

impl From<(usize, usize, String)> for Annotation {
    fn from((start, end, label): (usize, usize, String)) -> Self {
        Self { start, end, label }
    }
}

impl From<Annotation> for (usize, usize, String) {
    fn from(annotation: Annotation) -> Self {
        (annotation.start, annotation.end, annotation.label)
    }
}

// =============================================================================
// Document
// =============================================================================

/// A text and the annotations found in it.
///
/// The text is fixed once the document exists. Annotations are only ever
/// replaced as a whole by a matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    text: String,
    annotations: Vec<Annotation>,
}

#[derive(Deserialize)]
struct RawDocument {
    text: String,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

impl TryFrom<RawDocument> for Document {
    type Error = SpanMarkError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        Document::with_annotations(raw.text, raw.annotations)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    /// Build a pre-annotated document, checking every span against the text.
    pub fn with_annotations(text: impl Into<String>, annotations: Vec<Annotation>) -> Result<Self> {
        let text = text.into();
        let len = char_len(&text);
        if let Some(bad) = annotations
            .iter()
            .find(|a| a.start >= a.end || a.end > len)
        {
            return Err(SpanMarkError::SpanOutOfRange {
                start: bad.start,
                end: bad.end,
                len,
            });
        }
        Ok(Self { text, annotations })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Length of the text in code points.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// The substring an annotation covers.
    pub fn span_text(&self, annotation: &Annotation) -> Option<&str> {
        char_slice(&self.text, annotation.start, annotation.end)
    }

    /// Annotations ordered by position, for callers that need it.
    pub fn sorted_annotations(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| (a.start, a.end));
        sorted
    }

    pub(crate) fn replace_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.annotations.clear();
    }
}
