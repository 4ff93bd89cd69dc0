//! Extraction record store: one [`Document`] per annotated source text.
//!
//! A `Document` exclusively owns its extraction sequence and claimed-offset
//! set. Extractions are appended in oracle-output order and never reordered;
//! grouping is a read-only view. The lifecycle is append-then-freeze: the
//! first grouping request freezes the document, and later appends fail with
//! [`Error::DocumentFrozen`].

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::align::{locate, AlignmentOptions, ClaimedSpans};
use crate::data::{CandidateExtraction, ResolvedExtraction};
use crate::error::{Error, Result};

/// Source text plus the ordered extractions resolved against it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Document {
    document_text: String,
    extractions: Vec<ResolvedExtraction>,
    #[serde(skip)]
    claimed: ClaimedSpans,
    #[serde(skip)]
    frozen: AtomicBool,
}

impl Document {
    /// Create an empty document over the given source text.
    #[must_use]
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            extractions: Vec::new(),
            claimed: ClaimedSpans::new(),
            frozen: AtomicBool::new(false),
        }
    }

    /// The source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.document_text
    }

    /// Resolve a candidate's span and append it, using default alignment
    /// options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentFrozen`] if grouping has already been
    /// requested on this document.
    pub fn append(&mut self, candidate: CandidateExtraction) -> Result<&ResolvedExtraction> {
        self.append_with(candidate, &AlignmentOptions::default())
    }

    /// Resolve a candidate's span and append it.
    ///
    /// The span is located against this document's frozen text and current
    /// claimed-offset set; a successful resolution claims its interval so a
    /// later duplicate of the same fragment advances to the next occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentFrozen`] if grouping has already been
    /// requested on this document.
    pub fn append_with(
        &mut self,
        candidate: CandidateExtraction,
        options: &AlignmentOptions,
    ) -> Result<&ResolvedExtraction> {
        if self.is_frozen() {
            return Err(Error::document_frozen(format!(
                "cannot append {:?} after grouping was requested",
                candidate.extraction_text
            )));
        }

        let alignment = locate(
            &self.document_text,
            &candidate.extraction_text,
            &self.claimed,
            options,
        );
        if let Some(interval) = alignment.interval() {
            self.claimed.claim(interval);
        }

        let resolved = ResolvedExtraction::from_candidate(
            candidate,
            alignment.interval(),
            alignment.status(),
        );
        self.extractions.push(resolved);
        Ok(self.extractions.last().expect("just pushed"))
    }

    /// The full extraction sequence, in append order.
    #[must_use]
    pub fn extractions(&self) -> &[ResolvedExtraction] {
        &self.extractions
    }

    /// Number of extractions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extractions.len()
    }

    /// Check if no extractions have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractions.is_empty()
    }

    /// Freeze the document: all subsequent appends fail.
    ///
    /// Called implicitly by the first [`group_by`](crate::group_by) request;
    /// idempotent.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Check whether the document has been frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlignmentStatus, CharInterval};

    #[test]
    fn append_resolves_and_claims() {
        let mut doc = Document::new("Aspirin helps. Take Aspirin daily.");

        let first = doc
            .append(CandidateExtraction::new("medication", "Aspirin"))
            .unwrap();
        assert_eq!(first.char_interval, Some(CharInterval::new(0, 7)));
        assert_eq!(first.alignment_status, AlignmentStatus::Exact);

        let second = doc
            .append(CandidateExtraction::new("medication", "Aspirin"))
            .unwrap();
        assert_eq!(second.char_interval, Some(CharInterval::new(20, 27)));
    }

    #[test]
    fn append_preserves_order() {
        let mut doc = Document::new("Aspirin 100mg daily");
        doc.append(CandidateExtraction::new("medication", "Aspirin"))
            .unwrap();
        doc.append(CandidateExtraction::new("dosage", "100mg"))
            .unwrap();
        doc.append(CandidateExtraction::new("frequency", "daily"))
            .unwrap();

        let classes: Vec<&str> = doc
            .extractions()
            .iter()
            .map(|e| e.extraction_class.as_str())
            .collect();
        assert_eq!(classes, ["medication", "dosage", "frequency"]);
    }

    #[test]
    fn unresolved_candidate_is_kept() {
        let mut doc = Document::new("Patient takes Aspirin.");

        let resolved = doc
            .append(CandidateExtraction::new("medication", "Ibuprofen"))
            .unwrap();

        assert_eq!(resolved.alignment_status, AlignmentStatus::Unresolved);
        assert_eq!(resolved.char_interval, None);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn frozen_document_rejects_append() {
        let mut doc = Document::new("Patient takes Aspirin.");
        doc.append(CandidateExtraction::new("medication", "Aspirin"))
            .unwrap();

        doc.freeze();
        let result = doc.append(CandidateExtraction::new("dosage", "100mg"));

        assert!(matches!(result, Err(Error::DocumentFrozen(_))));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn serializes_without_bookkeeping_fields() {
        let mut doc = Document::new("Patient takes Aspirin.");
        doc.append(CandidateExtraction::new("medication", "Aspirin"))
            .unwrap();

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("document_text"));
        assert!(json.contains("extractions"));
        assert!(!json.contains("claimed"));
        assert!(!json.contains("frozen"));
    }
}
