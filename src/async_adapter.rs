//! Async adapter for the blocking annotation path.
//!
//! `annotate` blocks on the oracle call. In async runtimes, blocking the
//! executor thread starves other tasks, so this adapter runs the whole
//! annotation on tokio's blocking thread pool. Cancelling the returned
//! future aborts before any document is observable, and a caller-imposed
//! timeout surfaces as the same
//! [`Error::OracleUnavailable`](crate::Error::OracleUnavailable) as any
//! other oracle failure, keeping one failure path downstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use annex::async_adapter::AsyncAnnotator;
//! use annex::MockOracle;
//!
//! #[tokio::main]
//! async fn main() {
//!     let annotator = AsyncAnnotator::new(MockOracle::new());
//!     let document = annotator
//!         .annotate("Patient takes Aspirin.", "Extract medications.", &examples)
//!         .await
//!         .unwrap();
//! }
//! ```

#![cfg(feature = "async")]

use std::sync::Arc;

use crate::annotate::Annotator;
use crate::data::ExampleDocument;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::oracle::ExtractionOracle;

/// Async wrapper around an oracle plus annotation options.
///
/// The oracle is wrapped in `Arc` for cheap cloning across tasks; the
/// oracle itself must be `Send + Sync`.
pub struct AsyncAnnotator<O: ExtractionOracle + Send + Sync + 'static> {
    oracle: Arc<O>,
    inner: Annotator,
}

// Manual Clone impl - clones the Arc, not the oracle
impl<O: ExtractionOracle + Send + Sync + 'static> Clone for AsyncAnnotator<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
            inner: self.inner.clone(),
        }
    }
}

impl<O: ExtractionOracle + Send + Sync + 'static> AsyncAnnotator<O> {
    /// Wrap an oracle with default annotation options.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self {
            oracle: Arc::new(oracle),
            inner: Annotator::new(),
        }
    }

    /// Create from an existing Arc-wrapped oracle.
    #[must_use]
    pub fn from_arc(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            inner: Annotator::new(),
        }
    }

    /// Use a custom annotator configuration.
    #[must_use]
    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.inner = annotator;
        self
    }

    /// Annotate one document on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Same contract as [`Annotator::annotate`]; a failed or cancelled
    /// blocking task additionally maps to
    /// [`Error::OracleUnavailable`](crate::Error::OracleUnavailable).
    pub async fn annotate(
        &self,
        document_text: &str,
        instructions: &str,
        examples: &[ExampleDocument],
    ) -> Result<Document> {
        let oracle = Arc::clone(&self.oracle);
        let annotator = self.inner.clone();
        let document_text = document_text.to_string();
        let instructions = instructions.to_string();
        let examples = examples.to_vec();

        tokio::task::spawn_blocking(move || {
            annotator.annotate(&document_text, &instructions, &examples, &*oracle)
        })
        .await
        .map_err(|e| Error::oracle_unavailable(format!("annotation task failed: {e}")))?
    }
}
