//! Core data model: examples, candidates, and resolved extractions.
//!
//! The types here move through the engine in a fixed direction:
//!
//! ```text
//! ExampleDocument ──┐
//!                   ├──► oracle ──► CandidateExtraction ──► align ──► ResolvedExtraction
//! document text ────┘                (class, text, attrs)              (+ CharInterval,
//!                                                                       AlignmentStatus)
//! ```
//!
//! Examples are oracle *input* and are validated at construction; candidates
//! are oracle *output* and are never trusted to carry offsets. Offsets only
//! exist on [`ResolvedExtraction`], and only when alignment succeeded.
//!
//! All public offsets are **character** offsets into the source document,
//! never byte offsets. Conversion from the byte positions that substring
//! search produces happens inside the [`align`](crate::align) module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{Error, Result};

/// Attribute map attached to an extraction.
///
/// Ordered so that rendered prompts and persisted records are byte-stable
/// across runs.
pub type Attributes = BTreeMap<String, String>;

// =============================================================================
// Examples (oracle input)
// =============================================================================

/// One labeled demonstration extraction inside an [`ExampleDocument`].
///
/// Immutable once constructed; used only as oracle input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleExtraction {
    /// Category name for the extraction (non-empty).
    pub extraction_class: String,
    /// Exact substring expected to be found in the paired example body.
    pub extraction_text: String,
    /// Attribute name/value pairs; may be empty.
    #[serde(default)]
    pub attributes: Attributes,
}

impl ExampleExtraction {
    /// Create a new example extraction with no attributes.
    #[must_use]
    pub fn new(extraction_class: impl Into<String>, extraction_text: impl Into<String>) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add a single attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace the full attribute map.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A full example text paired with its ordered demonstration extractions.
///
/// # Invariant
///
/// Every `extraction_text` must be a literal substring of the paired body.
/// Violations are configuration errors caught here, never deferred to
/// annotation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDocument {
    text: String,
    extractions: Vec<ExampleExtraction>,
}

impl ExampleDocument {
    /// Create a validated example document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the body is empty, an extraction
    /// class is empty, or an `extraction_text` is not a literal substring of
    /// the body.
    pub fn new(text: impl Into<String>, extractions: Vec<ExampleExtraction>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::configuration("example document body is empty"));
        }
        for extraction in &extractions {
            if extraction.extraction_class.is_empty() {
                return Err(Error::configuration(format!(
                    "example extraction {:?} has an empty extraction_class",
                    extraction.extraction_text
                )));
            }
            if !text.contains(&extraction.extraction_text) {
                return Err(Error::configuration(format!(
                    "example extraction_text {:?} is not a substring of its example body",
                    extraction.extraction_text
                )));
            }
        }
        Ok(Self { text, extractions })
    }

    /// The example body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The demonstration extractions, in authored order.
    #[must_use]
    pub fn extractions(&self) -> &[ExampleExtraction] {
        &self.extractions
    }
}

// =============================================================================
// Candidates (oracle output, pre-alignment)
// =============================================================================

/// Oracle output before alignment: no offsets yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateExtraction {
    /// Category name for the extraction.
    pub extraction_class: String,
    /// Extracted text fragment, as the oracle returned it.
    pub extraction_text: String,
    /// Attribute name/value pairs; may be empty.
    #[serde(default)]
    pub attributes: Attributes,
}

impl CandidateExtraction {
    /// Create a new candidate with no attributes.
    #[must_use]
    pub fn new(extraction_class: impl Into<String>, extraction_text: impl Into<String>) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add a single attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace the full attribute map.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

// =============================================================================
// Resolved extractions (post-alignment)
// =============================================================================

/// Character interval into the source document.
///
/// `start` inclusive, `end` exclusive, both counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharInterval {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl CharInterval {
    /// Create a new interval.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this interval is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Character range.
    #[must_use]
    pub const fn char_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if this interval overlaps another.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How an extraction's span was (or wasn't) found in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// Literal substring match.
    Exact,
    /// Match found after whitespace collapse and case folding.
    Fuzzy,
    /// No match; the extraction carries no offsets.
    Unresolved,
}

impl AlignmentStatus {
    /// True for `Exact` and `Fuzzy`.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, AlignmentStatus::Unresolved)
    }
}

/// A candidate extraction plus its alignment outcome.
///
/// # Invariant
///
/// `Exact`/`Fuzzy` status implies `char_interval` is present and consistent
/// with `extraction_text` under the alignment policy; `Unresolved` implies
/// it is absent. The only constructor is
/// [`Document::append`](crate::Document::append), which upholds this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExtraction {
    /// Category name for the extraction.
    pub extraction_class: String,
    /// Extracted text fragment, as the oracle returned it.
    pub extraction_text: String,
    /// Attribute name/value pairs; may be empty.
    #[serde(default)]
    pub attributes: Attributes,
    /// Character offsets into the source document, when alignment succeeded.
    pub char_interval: Option<CharInterval>,
    /// Alignment outcome.
    pub alignment_status: AlignmentStatus,
}

impl ResolvedExtraction {
    pub(crate) fn from_candidate(
        candidate: CandidateExtraction,
        char_interval: Option<CharInterval>,
        alignment_status: AlignmentStatus,
    ) -> Self {
        debug_assert_eq!(char_interval.is_some(), alignment_status.is_resolved());
        Self {
            extraction_class: candidate.extraction_class,
            extraction_text: candidate.extraction_text,
            attributes: candidate.attributes,
            char_interval,
            alignment_status,
        }
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// True if alignment produced offsets.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.alignment_status.is_resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_document_accepts_valid_extractions() {
        let doc = ExampleDocument::new(
            "Patient takes Aspirin 100mg daily.",
            vec![
                ExampleExtraction::new("medication", "Aspirin")
                    .with_attribute("medication_group", "Aspirin"),
                ExampleExtraction::new("dosage", "100mg")
                    .with_attribute("medication_group", "Aspirin"),
            ],
        )
        .unwrap();

        assert_eq!(doc.extractions().len(), 2);
        assert_eq!(doc.extractions()[0].extraction_class, "medication");
    }

    #[test]
    fn example_document_rejects_missing_substring() {
        let result = ExampleDocument::new(
            "Patient takes Aspirin.",
            vec![ExampleExtraction::new("medication", "Ibuprofen")],
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn example_document_rejects_empty_class() {
        let result = ExampleDocument::new(
            "Patient takes Aspirin.",
            vec![ExampleExtraction::new("", "Aspirin")],
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn example_document_rejects_empty_body() {
        let result = ExampleDocument::new("", vec![]);

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn char_interval_overlap() {
        let a = CharInterval::new(0, 7);
        let b = CharInterval::new(5, 10);
        let c = CharInterval::new(7, 10);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn alignment_status_serializes_snake_case() {
        let json = serde_json::to_string(&AlignmentStatus::Exact).unwrap();
        assert_eq!(json, "\"exact\"");
        let json = serde_json::to_string(&AlignmentStatus::Unresolved).unwrap();
        assert_eq!(json, "\"unresolved\"");
    }

    #[test]
    fn attributes_serialize_in_key_order() {
        let candidate = CandidateExtraction::new("medication", "Aspirin")
            .with_attribute("b_key", "2")
            .with_attribute("a_key", "1");
        let json = serde_json::to_string(&candidate).unwrap();

        let a = json.find("a_key").unwrap();
        let b = json.find("b_key").unwrap();
        assert!(a < b);
    }
}
