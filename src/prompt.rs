//! Vendor-neutral prompt bridge between the orchestrator and a raw
//! text-completion model.
//!
//! The engine's oracle boundary is [`ExtractionOracle`]; most real backends
//! are language models that take a prompt string and return a completion
//! string. This module bridges the two:
//!
//! - [`FewShotPrompt`] renders instructions + labeled examples + the task
//!   input into a single prompt.
//! - [`parse_candidates`] recovers a JSON array of candidate extractions
//!   from potentially messy model output (markdown fences, surrounding
//!   prose).
//! - [`PromptOracle`] composes the two around any [`LanguageModel`].
//!
//! A response that yields no parseable JSON array is a malformed upstream
//! response, i.e. [`Error::OracleUnavailable`], so callers see one failure
//! kind for every way the capability can break.

use crate::data::{CandidateExtraction, ExampleDocument};
use crate::error::{Error, Result};
use crate::oracle::ExtractionOracle;

/// A text-completion backend: prompt in, completion out.
///
/// Implementations wrap a concrete model API; they should map transport and
/// auth failures to [`Error::OracleUnavailable`].
pub trait LanguageModel {
    /// Complete the given prompt.
    ///
    /// # Errors
    ///
    /// [`Error::OracleUnavailable`] on any failure of the backend.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Few-shot extraction prompt renderer.
///
/// Renders each example document as an input/output pair, with outputs as
/// JSON arrays in exactly the shape [`parse_candidates`] reads back.
#[derive(Debug, Clone, Default)]
pub struct FewShotPrompt {
    system_prefix: Option<String>,
}

impl FewShotPrompt {
    /// Create a prompt renderer with the default system message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom system message prefix.
    #[must_use]
    pub fn with_system_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.system_prefix = Some(prefix.into());
        self
    }

    /// Render the system message.
    #[must_use]
    pub fn render_system(&self) -> String {
        let prefix = self.system_prefix.as_deref().unwrap_or(
            "You are an expert extraction system. Extract the requested spans verbatim from the input.",
        );
        format!(
            "{}\n\nRespond ONLY with a valid JSON array of extractions. Each extraction is an object \
             with \"extraction_class\", \"extraction_text\", and \"attributes\". No explanation.",
            prefix
        )
    }

    /// Render the user prompt for one document.
    #[must_use]
    pub fn render(
        &self,
        instructions: &str,
        document_text: &str,
        examples: &[ExampleDocument],
    ) -> String {
        let mut parts = vec![instructions.to_string(), String::new()];

        if !examples.is_empty() {
            parts.push("# Examples:".to_string());
            for (i, example) in examples.iter().enumerate() {
                parts.push(format!("\n## Example {}:", i + 1));
                parts.push(format!("Input: {}", quote(example.text())));
                parts.push(format!("Output: {}", render_output(example)));
            }
            parts.push(String::new());
        }

        parts.push("# Task:".to_string());
        parts.push(format!("Input: {}", quote(document_text)));
        parts.push("Output:".to_string());

        parts.join("\n")
    }
}

/// JSON-quote a text body so newlines and quotes survive the prompt.
fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}

/// Render an example's extractions as the JSON array the model should emit.
fn render_output(example: &ExampleDocument) -> String {
    serde_json::to_string(example.extractions()).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a model response into candidate extractions.
///
/// Tolerates markdown fences and surrounding prose around the JSON array.
///
/// # Errors
///
/// [`Error::OracleUnavailable`] when no JSON array can be found or the
/// array does not decode into extractions.
pub fn parse_candidates(response: &str) -> Result<Vec<CandidateExtraction>> {
    let json = extract_json_array(response).ok_or_else(|| {
        Error::oracle_unavailable("malformed oracle response: no JSON array found")
    })?;

    serde_json::from_str(json).map_err(|e| {
        Error::oracle_unavailable(format!("malformed oracle response: {e}"))
    })
}

/// Extract a JSON array from potentially messy model output.
fn extract_json_array(text: &str) -> Option<&str> {
    // Direct array response.
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        if let Some(end) = trimmed.rfind(']') {
            return Some(&trimmed[..=end]);
        }
    }

    // ```json fenced block.
    if let Some(fence_start) = text.find("```json") {
        let body = &text[fence_start + 7..];
        if let Some(fence_end) = body.find("```") {
            let inner = body[..fence_end].trim();
            if inner.starts_with('[') {
                return Some(inner);
            }
        }
    }

    // Any bracketed region as a last resort.
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// [`ExtractionOracle`] over any [`LanguageModel`].
///
/// Renders the few-shot prompt, invokes the model, parses the response.
#[derive(Debug, Clone)]
pub struct PromptOracle<M> {
    model: M,
    prompt: FewShotPrompt,
}

impl<M: LanguageModel> PromptOracle<M> {
    /// Wrap a language model with the default prompt renderer.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            prompt: FewShotPrompt::new(),
        }
    }

    /// Use a custom prompt renderer.
    #[must_use]
    pub fn with_prompt(mut self, prompt: FewShotPrompt) -> Self {
        self.prompt = prompt;
        self
    }
}

impl<M: LanguageModel> ExtractionOracle for PromptOracle<M> {
    fn extract(
        &self,
        document_text: &str,
        instructions: &str,
        examples: &[ExampleDocument],
    ) -> Result<Vec<CandidateExtraction>> {
        let rendered = format!(
            "{}\n\n{}",
            self.prompt.render_system(),
            self.prompt.render(instructions, document_text, examples)
        );
        let response = self.model.complete(&rendered)?;
        parse_candidates(&response)
    }
}

// =============================================================================
// Tests
// =============================================================================
