//! The extraction oracle boundary.
//!
//! The oracle is the external capability (typically a remote language
//! model) that turns text + instructions + examples into candidate
//! extractions. It is consumed here, never implemented: the single-method
//! trait keeps backends substitutable, so a deterministic stub can stand in
//! for a remote model in tests without touching the orchestrator.

use crate::data::{CandidateExtraction, ExampleDocument};
use crate::error::{Error, Result};

/// The external extraction capability.
///
/// Implementations should collapse authentication, network, timeout, and
/// malformed-response failures into [`Error::OracleUnavailable`]; callers
/// treat them identically (report and abort). Retry and backoff belong to
/// the implementation, never to the orchestrator.
pub trait ExtractionOracle {
    /// Produce candidate extractions for `document_text`, guided by the
    /// instructions and few-shot examples.
    ///
    /// Returning an empty sequence is a legitimate outcome, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::OracleUnavailable`] on any failure of the capability.
    fn extract(
        &self,
        document_text: &str,
        instructions: &str,
        examples: &[ExampleDocument],
    ) -> Result<Vec<CandidateExtraction>>;
}

/// A scripted oracle for testing.
///
/// Returns a fixed candidate sequence, or a fixed failure, regardless of
/// input. Lets tests drive the orchestrator without a remote model.
///
/// # Example
///
/// ```
/// use annex::{CandidateExtraction, ExtractionOracle, MockOracle};
///
/// let oracle = MockOracle::new().with_candidates(vec![
///     CandidateExtraction::new("medication", "Aspirin"),
/// ]);
///
/// let candidates = oracle.extract("text", "instructions", &[]).unwrap();
/// assert_eq!(candidates.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    candidates: Vec<CandidateExtraction>,
    failure: Option<String>,
}

impl MockOracle {
    /// Create a mock oracle that returns no candidates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidates to return on extraction.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<CandidateExtraction>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Make every extraction fail with [`Error::OracleUnavailable`].
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl ExtractionOracle for MockOracle {
    fn extract(
        &self,
        _document_text: &str,
        _instructions: &str,
        _examples: &[ExampleDocument],
    ) -> Result<Vec<CandidateExtraction>> {
        match &self.failure {
            Some(message) => Err(Error::oracle_unavailable(message.clone())),
            None => Ok(self.candidates.clone()),
        }
    }
}
