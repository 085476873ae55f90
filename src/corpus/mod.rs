//! Corpus: documents + entity catalog + derived index.
//!
//! Mutators never run matching. Changing the catalog clears every document's
//! annotations, and every mutator leaves the index equal to a full
//! recomputation over what is currently annotated. Call
//! `process()` to (re-)annotate.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use instant::Instant;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::export::{read_jsonl, read_spacy, records, BatchSequence, Record};
use crate::index::{CorpusIndex, DocumentId};
use crate::scanner::{Annotation, Document, Entity, EntityCatalog, EntityMatcher};

#[cfg(test)]
mod tests;

/// Summary of one `process()` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStats {
    pub documents: usize,
    pub entities: usize,
    pub annotations: usize,
    pub elapsed_micros: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    catalog: EntityCatalog,
    config: Config,
    index: CorpusIndex,
}

impl Corpus {
    pub fn new(documents: Vec<Document>, entities: impl Into<EntityCatalog>) -> Self {
        Self::with_config(documents, entities, Config::default())
    }

    /// Inputs are screened by the config's filters and excludes.
    pub fn with_config(
        documents: Vec<Document>,
        entities: impl Into<EntityCatalog>,
        config: Config,
    ) -> Self {
        let mut corpus = Self {
            index: CorpusIndex::new(config.matching.case_sensitive),
            config,
            ..Default::default()
        };
        corpus.set_documents(documents);
        corpus.set_entities(entities);
        corpus
    }

    /// Rebuild a corpus from previously exported records.
    ///
    /// Annotations are kept as given (after offset validation) and the catalog
    /// is the distinct `(matched text, label)` pairs they cover.
    pub fn from_records(records: Vec<Record>, config: Config) -> Result<Self> {
        let documents = records
            .into_iter()
            .map(Document::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut catalog = EntityCatalog::default();
        for document in &documents {
            for annotation in document.annotations() {
                let Some(text) = document.span_text(annotation) else {
                    continue;
                };
                if seen.insert((text, annotation.label.as_str())) {
                    catalog.push(Entity::new(text, annotation.label.as_str())?);
                }
            }
        }
        info!(documents = documents.len(), entities = catalog.len(), "imported records");

        let mut corpus = Self {
            documents,
            catalog,
            index: CorpusIndex::new(config.matching.case_sensitive),
            config,
        };
        corpus.rebuild_index();
        Ok(corpus)
    }

    pub fn from_jsonl(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        Self::from_records(read_jsonl(path)?, config)
    }

    /// Import a spaCy training file: `[[text, {"entities": [[s, e, "L"], ...]}], ...]`.
    pub fn from_spacy(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        Self::from_records(read_spacy(path)?, config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn entities(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.config.matching.case_sensitive
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Replace all documents. Existing annotations on the inputs are kept.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        let total = documents.len();
        self.documents = documents;
        if self.config.texts.filter {
            let filters = &self.config.texts.filters;
            self.documents.retain(|document| filters.is_valid(document.text()));
            debug!(removed = total - self.documents.len(), "filtered documents");
        }
        self.rebuild_index();
    }

    /// Append one document. Returns its id, or None when the text filters reject it.
    pub fn push_document(&mut self, document: impl Into<Document>) -> Option<DocumentId> {
        let document = document.into();
        if self.config.texts.filter && !self.config.texts.filters.is_valid(document.text()) {
            return None;
        }
        let annotated = !document.annotations().is_empty();
        self.documents.push(document);
        // An unannotated document adds no index entries.
        if annotated {
            self.rebuild_index();
        }
        Some(self.documents.len() - 1)
    }

    /// Replace the catalog. Clears all annotations.
    pub fn set_entities(&mut self, entities: impl Into<EntityCatalog>) {
        let mut catalog = entities.into();
        catalog.exclude(&self.config.entities.excludes);
        if self.config.entities.filter {
            catalog.retain_valid(&self.config.entities.filters);
        }
        self.catalog = catalog;
        self.invalidate_annotations();
    }

    /// Add one entity. Clears all annotations. Returns false when the entity
    /// is excluded or filtered out, in which case nothing changes.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        let entities = &self.config.entities;
        if entities.excludes.iter().any(|excluded| excluded == entity.text())
            || (entities.filter && !entities.filters.is_valid(entity.text()))
        {
            return false;
        }
        self.catalog.push(entity);
        self.invalidate_annotations();
        true
    }

    fn invalidate_annotations(&mut self) {
        for document in &mut self.documents {
            document.clear_annotations();
        }
        self.index = CorpusIndex::new(self.is_case_sensitive());
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Annotate every document against the current catalog and rebuild the
    /// index. Idempotent: a second run without mutations yields the same
    /// annotations and index.
    pub fn process(&mut self) -> Result<ProcessStats> {
        let started = Instant::now();
        let matcher = EntityMatcher::build(&self.catalog, self.is_case_sensitive())?;
        debug!(patterns = matcher.pattern_count(), entities = matcher.entity_count(), "built matcher");

        let found = annotate_documents(&matcher, &self.documents);
        let mut annotations = 0;
        for (document, document_annotations) in self.documents.iter_mut().zip(found) {
            annotations += document_annotations.len();
            document.replace_annotations(document_annotations);
        }
        self.rebuild_index();

        let stats = ProcessStats {
            documents: self.documents.len(),
            entities: self.catalog.len(),
            annotations,
            elapsed_micros: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        info!(
            documents = stats.documents,
            entities = stats.entities,
            annotations = stats.annotations,
            elapsed_micros = stats.elapsed_micros,
            "processed corpus"
        );
        Ok(stats)
    }

    fn rebuild_index(&mut self) {
        let case_sensitive = self.is_case_sensitive();

        #[cfg(feature = "parallel")]
        let partials: Vec<_> = self
            .documents
            .par_iter()
            .enumerate()
            .map(|(id, document)| (id, CorpusIndex::entries(document, case_sensitive)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let partials: Vec<_> = self
            .documents
            .iter()
            .enumerate()
            .map(|(id, document)| (id, CorpusIndex::entries(document, case_sensitive)))
            .collect();

        self.index = CorpusIndex::from_partials(partials, case_sensitive);
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Documents where `text` was matched, in document order. Case-insensitive
    /// corpora fold the query.
    pub fn lookup_by_entity(&self, text: &str) -> Vec<&Document> {
        self.resolve(self.index.entity_ids(text).iter().copied())
    }

    /// Documents carrying `label`, in document order.
    pub fn lookup_by_label(&self, label: &str) -> Vec<&Document> {
        self.resolve(self.index.label_ids(label).iter().copied())
    }

    fn resolve(&self, ids: impl Iterator<Item = DocumentId>) -> Vec<&Document> {
        ids.filter_map(|id| self.documents.get(id)).collect()
    }

    // =========================================================================
    // Export
    // =========================================================================

    pub fn export_records(&self) -> Vec<Record> {
        records(&self.documents)
    }

    /// Training batches. `None` falls back to the configured chunk size, and
    /// to a single batch when that is unset too.
    pub fn export_batches(&self, chunk_size: Option<usize>) -> Result<BatchSequence<'_>> {
        BatchSequence::new(&self.documents, chunk_size.or(self.config.export.chunk_size))
    }

    /// Write the corpus in the configured format. Returns the files written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        self.config.export.format.save(&self.documents, path)
    }
}

#[cfg(feature = "parallel")]
fn annotate_documents(matcher: &EntityMatcher, documents: &[Document]) -> Vec<Vec<Annotation>> {
    documents
        .par_iter()
        .map(|document| matcher.annotate(document.text()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn annotate_documents(matcher: &EntityMatcher, documents: &[Document]) -> Vec<Vec<Annotation>> {
    documents
        .iter()
        .map(|document| matcher.annotate(document.text()))
        .collect()
}
