//! SpanMark: Gazetteer Annotation Engine
//!
//! Annotates a corpus of free-text documents with spans of known named
//! entities (a flat list of `(text, label)` pairs) and builds reverse indices
//! from entity text and label back to documents.
//!
//! # Architecture
//!
//! ## Scanner
//! - `span.rs` - code-point offsets, case folding, `find_all`
//! - `catalog.rs` - EntityCatalog: gazetteer and longest-first matching order
//! - `document.rs` - Document and Annotation data model
//! - `annotator.rs` - EntityMatcher: Aho-Corasick scan + greedy non-overlapping resolution
//!
//! ## Corpus
//! - `index.rs` - CorpusIndex: `by_entity` / `by_label`, rebuilt wholesale
//! - `corpus/` - Corpus: documents, catalog, config, index; `process()`
//! - `export/` - records, chunked training batches, spaCy / brat / CoNLL files
//!
//! ## Ambient
//! - `config.rs` - TOML configuration
//! - `filters.rs` - text validity filters
//! - `logging.rs` - tracing-subscriber setup (native only)
//! - `error.rs` - SpanMarkError
//!
//! # Usage (Rust)
//! ```rust
//! use spanmark::{Corpus, Document, EntityCatalog};
//!
//! let entities = EntityCatalog::from_pairs([("Mozilla", "ORG"), ("Rust", "PL")]).unwrap();
//! let mut corpus = Corpus::new(vec![Document::from("rust is made by Mozilla")], entities);
//! corpus.process().unwrap();
//!
//! assert_eq!(corpus.lookup_by_label("ORG").len(), 1);
//! assert_eq!(corpus.lookup_by_entity("rust").len(), 1);
//! ```
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { SpanMarkCorpus } from 'spanmark';
//!
//! await init();
//!
//! const corpus = new SpanMarkCorpus(false);
//! corpus.setEntities([{ text: 'Mozilla', label: 'ORG' }, { text: 'Rust', label: 'PL' }]);
//! corpus.setTexts(['rust is made by Mozilla']);
//! corpus.process();
//!
//! console.log(corpus.exportRecords());
//! // [{ text: 'rust is made by Mozilla', label: [[16, 23, 'ORG'], [0, 4, 'PL']] }]
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod filters;
pub mod index;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod scanner;
pub mod wasm;

pub use config::Config;
pub use corpus::{Corpus, ProcessStats};
pub use error::{Result, SpanMarkError};
pub use export::{BatchSequence, Format, Record, TrainingExample};
pub use filters::Filters;
pub use index::{CorpusIndex, DocumentId};
pub use scanner::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Install the panic hook for readable errors in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn version() -> String {
    format!("spanmark v{}", env!("CARGO_PKG_VERSION"))
}
