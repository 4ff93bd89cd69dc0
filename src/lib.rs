//! # annex
//!
//! Few-shot text extraction with character-grounded, grouped annotations.
//!
//! annex turns unstructured text plus a small set of labeled examples into
//! structured, position-anchored extractions. The language model doing the
//! actual extraction is an external **oracle** behind a one-method trait;
//! annex owns everything around it:
//!
//! - **Alignment** ([`align`]): find each extracted fragment's character
//!   offsets in the source text: exact first, then a normalized fuzzy
//!   pass, with repeated fragments advancing through the document.
//! - **Record store** ([`Document`]): the ordered, append-then-freeze
//!   extraction sequence for one source text.
//! - **Grouping** ([`group_by`]): read-only views keyed by a shared
//!   attribute, first-seen order, nothing silently dropped.
//! - **Prompt bridge** ([`prompt`]): vendor-neutral few-shot prompt
//!   rendering and tolerant JSON response parsing for wiring up raw
//!   text-completion models.
//! - **Persistence** ([`io`]): append-only JSONL records.
//!
//! ## Quick Start
//!
//! ```rust
//! use annex::{annotate, CandidateExtraction, ExampleDocument, ExampleExtraction, MockOracle};
//!
//! let examples = vec![ExampleDocument::new(
//!     "Patient takes Aspirin 100mg daily.",
//!     vec![ExampleExtraction::new("medication", "Aspirin")
//!         .with_attribute("medication_group", "Aspirin")],
//! )?];
//!
//! // A scripted oracle stands in for a remote model here.
//! let oracle = MockOracle::new().with_candidates(vec![
//!     CandidateExtraction::new("medication", "Aspirin")
//!         .with_attribute("medication_group", "Aspirin"),
//! ]);
//!
//! let document = annotate(
//!     "Patient takes Aspirin 100mg daily.",
//!     "Extract medications with their details.",
//!     &examples,
//!     &oracle,
//! )?;
//!
//! let extraction = &document.extractions()[0];
//! assert_eq!(extraction.char_interval.unwrap().char_range(), 14..21);
//!
//! let grouping = annex::group_by(&document, "medication_group");
//! assert_eq!(grouping.groups()[0].label(), "Aspirin");
//! # Ok::<(), annex::Error>(())
//! ```
//!
//! ## Wiring a real model
//!
//! Implement [`LanguageModel`] over your completion API and wrap it in a
//! [`PromptOracle`], or implement [`ExtractionOracle`] directly when the
//! backend already returns structured extractions.
//!
//! ## Design Philosophy
//!
//! - **Alignment failure is data**: a fragment the locator cannot place
//!   gets `unresolved` status, never an error.
//! - **One failure kind for the oracle**: auth, network, timeout, and
//!   malformed responses all surface as [`Error::OracleUnavailable`],
//!   because callers treat them identically.
//! - **No module-level mutable state**: every run's configuration is passed
//!   in; each [`Document`] exclusively owns its own bookkeeping.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! annex = "0.1"                                # synchronous core
//! annex = { version = "0.1", features = ["async"] }  # + tokio adapter
//! ```

#![warn(missing_docs)]

pub mod align;
pub mod annotate;
pub mod async_adapter;
mod data;
mod document;
mod error;
pub mod group;
pub mod io;
pub mod oracle;
pub mod prompt;

pub use align::{locate, Alignment, AlignmentOptions, ClaimedSpans};
pub use annotate::{annotate, Annotator};
pub use data::{
    AlignmentStatus, Attributes, CandidateExtraction, CharInterval, ExampleDocument,
    ExampleExtraction, ResolvedExtraction,
};
pub use document::Document;
pub use error::{Error, Result};
pub use group::{group_by, Group, Grouping, UNGROUPED_LABEL};
pub use io::{load_annotated_documents, save_annotated_documents};
pub use oracle::{ExtractionOracle, MockOracle};
pub use prompt::{parse_candidates, FewShotPrompt, LanguageModel, PromptOracle};

#[cfg(feature = "async")]
pub use async_adapter::AsyncAnnotator;
