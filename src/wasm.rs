use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::export::{checked_chunk_size, Record};
use crate::scanner::{self, Document, Entity, EntityCatalog};

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct SpanMarkCorpus {
    inner: Corpus,
}

#[wasm_bindgen]
impl SpanMarkCorpus {
    #[wasm_bindgen(constructor)]
    pub fn new(case_sensitive: Option<bool>) -> Self {
        let config = Config::case_sensitive(case_sensitive.unwrap_or(false));
        SpanMarkCorpus {
            inner: Corpus::with_config(Vec::new(), EntityCatalog::default(), config),
        }
    }

    /// `entities`: array of `{ text, label }`. Clears existing annotations.
    #[wasm_bindgen(js_name = setEntities)]
    pub fn set_entities(&mut self, entities: JsValue) -> Result<(), JsValue> {
        let entities: Vec<Entity> = from_js(entities)?;
        self.inner.set_entities(entities);
        Ok(())
    }

    /// `texts`: array of strings. Replaces every document.
    #[wasm_bindgen(js_name = setTexts)]
    pub fn set_texts(&mut self, texts: JsValue) -> Result<(), JsValue> {
        let texts: Vec<String> = from_js(texts)?;
        self.inner
            .set_documents(texts.into_iter().map(Document::from).collect());
        Ok(())
    }

    /// Annotate everything. Returns `{ documents, entities, annotations, elapsedMicros }`.
    #[wasm_bindgen]
    pub fn process(&mut self) -> Result<JsValue, JsValue> {
        let stats = self
            .inner
            .process()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&stats)
    }

    #[wasm_bindgen(js_name = lookupByEntity)]
    pub fn lookup_by_entity(&self, text: &str) -> Result<JsValue, JsValue> {
        let records: Vec<Record> = self
            .inner
            .lookup_by_entity(text)
            .into_iter()
            .map(Record::from)
            .collect();
        to_js(&records)
    }

    #[wasm_bindgen(js_name = lookupByLabel)]
    pub fn lookup_by_label(&self, label: &str) -> Result<JsValue, JsValue> {
        let records: Vec<Record> = self
            .inner
            .lookup_by_label(label)
            .into_iter()
            .map(Record::from)
            .collect();
        to_js(&records)
    }

    /// `[{ text, label: [[start, end, "LABEL"], ...] }, ...]`
    #[wasm_bindgen(js_name = exportRecords)]
    pub fn export_records(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.export_records())
    }

    /// `[[ [text, { entities }], ... ], ...]`, one inner array per batch.
    #[wasm_bindgen(js_name = exportBatches)]
    pub fn export_batches(&self, chunk_size: Option<i32>) -> Result<JsValue, JsValue> {
        let chunk_size = chunk_size
            .map(|size| checked_chunk_size(i64::from(size)))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let batches = self
            .inner
            .export_batches(chunk_size)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let batches: Vec<_> = batches.iter().collect();
        to_js(&batches)
    }

    #[wasm_bindgen(js_name = documentCount)]
    pub fn document_count(&self) -> usize {
        self.inner.documents().len()
    }

    #[wasm_bindgen(js_name = entityCount)]
    pub fn entity_count(&self) -> usize {
        self.inner.entities().len()
    }
}

/// Annotate one text. Returns `[[start, end, "LABEL"], ...]` in acceptance order.
#[wasm_bindgen]
pub fn annotate(text: &str, entities: JsValue, case_sensitive: bool) -> Result<JsValue, JsValue> {
    let entities: Vec<Entity> = from_js(entities)?;
    let annotations = scanner::annotate(text, &entities, case_sensitive)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&annotations)
}
