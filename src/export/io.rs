//! JSONL persistence for export records, plus spaCy import.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::export::{Record, TrainingExample};

/// Write one JSON object per record, newline terminated.
pub fn write_records<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse JSONL records. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

pub fn write_jsonl(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    write_records(records, File::create(path)?)?;
    debug!(path = %path.display(), records = records.len(), "wrote jsonl");
    Ok(())
}

pub fn read_jsonl(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let records = read_records(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), records = records.len(), "read jsonl");
    Ok(records)
}

/// Parse a spaCy training array into records.
pub fn read_spacy_from<R: Read>(reader: R) -> Result<Vec<Record>> {
    let examples: Vec<TrainingExample> = serde_json::from_reader(reader)?;
    Ok(examples
        .into_iter()
        .map(|(text, spans)| Record {
            text,
            label: spans.entities,
        })
        .collect())
}

pub fn read_spacy(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let records = read_spacy_from(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), records = records.len(), "read spacy");
    Ok(records)
}
