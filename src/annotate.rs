//! Annotation orchestrator: one oracle call, one fully resolved document.
//!
//! Coordinates a single document end to end: validates the inputs, submits
//! text + instructions + examples to the extraction oracle, resolves each
//! returned candidate's offsets in order (claimed spans advancing so
//! repeated fragments land on successive occurrences), and returns the
//! populated [`Document`]. Freezing is deferred to the first grouping
//! request.
//!
//! Failure behavior: an oracle failure propagates as
//! [`Error::OracleUnavailable`](crate::Error::OracleUnavailable) with no
//! partial document. An oracle returning zero candidates yields an empty,
//! valid document. Unresolved alignments are logged and kept in the data.

use crate::align::AlignmentOptions;
use crate::data::ExampleDocument;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::oracle::ExtractionOracle;

/// Annotation entry point with configurable alignment behavior.
///
/// The free function [`annotate`] uses the default configuration; construct
/// an `Annotator` to turn off the fuzzy alignment pass.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    options: AlignmentOptions,
}

impl Annotator {
    /// Create an annotator with default alignment options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the fuzzy alignment pass.
    #[must_use]
    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.options.fuzzy = fuzzy;
        self
    }

    /// Annotate one document.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if `document_text` is empty (or
    ///   whitespace-only, which cannot anchor any extraction) or `examples`
    ///   is empty (this is few-shot extraction, at least one demonstration
    ///   is required).
    /// - [`Error::OracleUnavailable`] if the oracle call fails; no document
    ///   is returned.
    pub fn annotate(
        &self,
        document_text: &str,
        instructions: &str,
        examples: &[ExampleDocument],
        oracle: &dyn ExtractionOracle,
    ) -> Result<Document> {
        if document_text.trim().is_empty() {
            return Err(Error::configuration("document_text is empty"));
        }
        if examples.is_empty() {
            return Err(Error::configuration(
                "at least one example document is required",
            ));
        }

        let candidates = oracle.extract(document_text, instructions, examples)?;
        log::info!(
            "oracle returned {} candidate(s) for a {}-char document",
            candidates.len(),
            document_text.chars().count()
        );

        let mut document = Document::new(document_text);
        for candidate in candidates {
            let resolved = document.append_with(candidate, &self.options)?;
            if !resolved.is_resolved() {
                log::warn!(
                    "no alignment for {} extraction {:?}",
                    resolved.extraction_class,
                    resolved.extraction_text
                );
            }
        }
        Ok(document)
    }
}

/// Annotate one document with default options.
///
/// See [`Annotator::annotate`] for the contract.
///
/// # Errors
///
/// [`Error::Configuration`] on invalid input, [`Error::OracleUnavailable`]
/// if the oracle call fails.
pub fn annotate(
    document_text: &str,
    instructions: &str,
    examples: &[ExampleDocument],
    oracle: &dyn ExtractionOracle,
) -> Result<Document> {
    Annotator::new().annotate(document_text, instructions, examples, oracle)
}
