//! Chunked training batches.
//!
//! A `BatchSequence` borrows the documents and computes chunk boundaries
//! every time it is iterated, so it can be walked any number of times and no
//! cursor is shared between callers.

use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::slice::Chunks;

use crate::error::{Result, SpanMarkError};
use crate::export::Span;
use crate::scanner::{Annotation, Document};

/// The annotation half of a training example: `{"entities": [[s, e, "L"], ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpans {
    pub entities: Vec<Span>,
}

/// `(text, {"entities": [...]})`
pub type TrainingExample = (String, EntitySpans);

pub fn training_example(document: &Document) -> TrainingExample {
    (
        document.text().to_string(),
        EntitySpans {
            entities: document.annotations().iter().map(Annotation::as_tuple).collect(),
        },
    )
}

/// Validate a caller-supplied signed chunk size.
pub fn checked_chunk_size(chunk_size: i64) -> Result<usize> {
    if chunk_size <= 0 {
        return Err(SpanMarkError::InvalidChunkSize(chunk_size));
    }
    usize::try_from(chunk_size).map_err(|_| SpanMarkError::InvalidChunkSize(chunk_size))
}

// =============================================================================
// BatchSequence
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct BatchSequence<'a> {
    documents: &'a [Document],
    chunk_size: usize,
}

impl<'a> BatchSequence<'a> {
    /// `None` puts every document in a single batch. Zero is rejected.
    pub fn new(documents: &'a [Document], chunk_size: Option<usize>) -> Result<Self> {
        let chunk_size = match chunk_size {
            Some(0) => return Err(SpanMarkError::InvalidChunkSize(0)),
            Some(size) => size,
            None => documents.len().max(1),
        };
        Ok(Self {
            documents,
            chunk_size,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of batches: `ceil(documents / chunk_size)`.
    pub fn len(&self) -> usize {
        self.documents.len().div_ceil(self.chunk_size)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Start a fresh pass over the batches.
    pub fn iter(&self) -> Batches<'a> {
        Batches {
            chunks: self.documents.chunks(self.chunk_size),
        }
    }
}

impl<'a> IntoIterator for &BatchSequence<'a> {
    type Item = Vec<TrainingExample>;
    type IntoIter = Batches<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for BatchSequence<'a> {
    type Item = Vec<TrainingExample>;
    type IntoIter = Batches<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a `BatchSequence`. Batches are rendered on demand.
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    chunks: Chunks<'a, Document>,
}

impl Iterator for Batches<'_> {
    type Item = Vec<TrainingExample>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|chunk| chunk.iter().map(training_example).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Batches<'_> {}

impl FusedIterator for Batches<'_> {}
