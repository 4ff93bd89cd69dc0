//! Persistence: line-delimited JSON records of annotated documents.
//!
//! One JSON object per line per document: `document_text` plus, for each
//! extraction, `extraction_class`, `extraction_text`, `attributes`,
//! `char_interval` (nullable `{start, end}`), and `alignment_status`. This
//! is the minimal durable contract downstream tools (visualizers, filters)
//! depend on. Files are opened in append mode, so repeated runs add records
//! rather than clobbering earlier ones.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

/// Append annotated documents to a JSONL file, one record per line.
///
/// Creates the file if missing; never truncates.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) on filesystem failures,
/// [`Error::Serialization`](crate::Error::Serialization) if a document
/// cannot be encoded.
pub fn save_annotated_documents<P: AsRef<Path>>(path: P, documents: &[Document]) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for document in documents {
        let line = serde_json::to_string(document)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Load annotated documents from a JSONL file.
///
/// Blank lines are skipped. Loaded documents come back unfrozen with an
/// empty claimed-offset set; they are read-oriented snapshots.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) on filesystem failures,
/// [`Error::Serialization`](crate::Error::Serialization) on a malformed
/// record.
pub fn load_annotated_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let reader = BufReader::new(File::open(path)?);
    let mut documents = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        documents.push(serde_json::from_str(&line)?);
    }
    Ok(documents)
}
