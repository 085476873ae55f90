//! Output formats for annotated corpora.
//!
//! | Format  | Files          | Shape                                         |
//! |---------|----------------|-----------------------------------------------|
//! | `jsonl` | `.jsonl`       | one `Record` per line                         |
//! | `spacy` | `.json`        | array of `[text, {"entities": [...]}]`        |
//! | `brat`  | `.txt` + `.ann`| standoff, offsets into the concatenated text  |
//! | `conll` | `.conll`       | `token<TAB>tag`, IOB2 tags, blank line per doc|

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::export::{records, training_example, write_records, TrainingExample};
use crate::scanner::{Annotation, Document};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Jsonl,
    Spacy,
    Brat,
    Conll,
}

impl Format {
    /// Extension of the primary output file.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Jsonl => "jsonl",
            Format::Spacy => "json",
            Format::Brat => "ann",
            Format::Conll => "conll",
        }
    }

    /// Render `documents` into `writer`.
    ///
    /// For brat this is the `.ann` standoff only; the matching text file
    /// comes from `write_brat_text`.
    pub fn write_to<W: Write>(&self, documents: &[Document], writer: W) -> Result<()> {
        match self {
            Format::Jsonl => write_records(&records(documents), writer),
            Format::Spacy => write_spacy(documents, writer),
            Format::Brat => write_brat_annotations(documents, writer),
            Format::Conll => write_conll(documents, writer),
        }
    }

    /// Write `documents` next to `path`, replacing its extension.
    /// Returns every file written.
    pub fn save(&self, documents: &[Document], path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let mut written = Vec::new();

        if *self == Format::Brat {
            let text_path = path.with_extension("txt");
            write_brat_text(documents, File::create(&text_path)?)?;
            written.push(text_path);
        }

        let primary = path.with_extension(self.extension());
        self.write_to(documents, File::create(&primary)?)?;
        written.push(primary);

        info!(format = ?self, documents = documents.len(), files = written.len(), "saved corpus");
        Ok(written)
    }
}

// =============================================================================
// spaCy
// =============================================================================

fn write_spacy<W: Write>(documents: &[Document], writer: W) -> Result<()> {
    let examples: Vec<TrainingExample> = documents.iter().map(training_example).collect();
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, &examples)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// brat
// =============================================================================

/// Documents joined into one text, each followed by a newline.
pub fn write_brat_text<W: Write>(documents: &[Document], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for document in documents {
        writer.write_all(document.text().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_brat_annotations<W: Write>(documents: &[Document], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    let mut offset = 0;
    let mut next_id = 1;
    for document in documents {
        for annotation in document.sorted_annotations() {
            let mention = document.span_text(annotation).unwrap_or_default();
            writeln!(
                writer,
                "T{}\t{} {} {}\t{}",
                next_id,
                annotation.label,
                offset + annotation.start,
                offset + annotation.end,
                mention
            )?;
            next_id += 1;
        }
        // +1 for the separating newline in the .txt file
        offset += document.char_len() + 1;
    }
    writer.flush()?;
    Ok(())
}

// =============================================================================
// CoNLL
// =============================================================================

/// Word tokens of `document` with IOB2 tags.
pub fn conll_tokens(document: &Document) -> Vec<(&str, String)> {
    let annotations = document.sorted_annotations();
    let mut tokens = Vec::new();
    let mut position = 0;

    for word in document.text().split_word_bounds() {
        let start = position;
        position += word.chars().count();
        if word.trim().is_empty() {
            continue;
        }
        let tag = match covering(&annotations, start, position) {
            Some(annotation) if start <= annotation.start => format!("B-{}", annotation.label),
            Some(annotation) => format!("I-{}", annotation.label),
            None => "O".to_string(),
        };
        tokens.push((word, tag));
    }
    tokens
}

fn covering<'a>(annotations: &[&'a Annotation], start: usize, end: usize) -> Option<&'a Annotation> {
    annotations
        .iter()
        .copied()
        .find(|annotation| annotation.start < end && start < annotation.end)
}

fn write_conll<W: Write>(documents: &[Document], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for document in documents {
        for (token, tag) in conll_tokens(document) {
            writeln!(writer, "{token}\t{tag}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
