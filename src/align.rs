//! Span Locator: character-offset alignment of extracted fragments.
//!
//! The oracle returns text fragments with no positions. This module finds
//! each fragment's character offsets in the source document:
//!
//! 1. **Exact pass**: literal substring search. Offsets from the byte-level
//!    search are translated into character offsets through a byte→char
//!    table, so multibyte text never skews positions.
//! 2. **Fuzzy pass**: the oracle may have normalized whitespace or casing.
//!    Both sides are case-folded with whitespace runs collapsed to a single
//!    space, the search retried, and matches mapped back into the original
//!    text through an index translation table built during normalization.
//! 3. **Unresolved**: a normal outcome, not an error. Callers keep the
//!    extraction and decide downstream what to do with it.
//!
//! Repeated fragments advance through the document via a caller-owned
//! [`ClaimedSpans`] set: [`locate`] is pure over its inputs, and the caller
//! claims each successful interval so the next lookup of the same fragment
//! resolves to a later occurrence instead of re-matching the same span.

use serde::{Deserialize, Serialize};

use crate::data::{AlignmentStatus, CharInterval};

/// Spans already resolved for a document, in original character offsets.
///
/// Owned by the caller (one per [`Document`](crate::Document)); never shared
/// across documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedSpans {
    spans: Vec<CharInterval>,
}

impl ClaimedSpans {
    /// Create an empty claimed set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an interval.
    pub fn claim(&mut self, interval: CharInterval) {
        self.spans.push(interval);
    }

    /// Check whether an interval overlaps any claimed span.
    #[must_use]
    pub fn overlaps(&self, interval: &CharInterval) -> bool {
        self.spans.iter().any(|span| span.overlaps(interval))
    }

    /// Number of claimed spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if nothing has been claimed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Options controlling a [`locate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentOptions {
    /// Attempt the fuzzy pass when the exact pass finds nothing.
    pub fuzzy: bool,
    /// Zero-based index among repeated occurrences to prefer. A hinted
    /// occurrence that is already claimed (or out of range) falls back to
    /// the first unclaimed occurrence; the hint is a preference, not a
    /// constraint.
    pub occurrence_hint: Option<usize>,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        Self {
            fuzzy: true,
            occurrence_hint: None,
        }
    }
}

impl AlignmentOptions {
    /// Enable or disable the fuzzy pass.
    #[must_use]
    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Prefer the nth occurrence of the fragment.
    #[must_use]
    pub fn with_occurrence_hint(mut self, hint: usize) -> Self {
        self.occurrence_hint = Some(hint);
        self
    }
}

/// Outcome of a [`locate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Literal substring match at the given character interval.
    Exact(CharInterval),
    /// Normalized match, mapped back into original character offsets.
    Fuzzy(CharInterval),
    /// Fragment not found. Expected and recoverable.
    Unresolved,
}

impl Alignment {
    /// The alignment status for this outcome.
    #[must_use]
    pub const fn status(&self) -> AlignmentStatus {
        match self {
            Alignment::Exact(_) => AlignmentStatus::Exact,
            Alignment::Fuzzy(_) => AlignmentStatus::Fuzzy,
            Alignment::Unresolved => AlignmentStatus::Unresolved,
        }
    }

    /// The matched interval, if any.
    #[must_use]
    pub const fn interval(&self) -> Option<CharInterval> {
        match self {
            Alignment::Exact(interval) | Alignment::Fuzzy(interval) => Some(*interval),
            Alignment::Unresolved => None,
        }
    }
}

/// Find a fragment's character offsets in `document_text`.
///
/// Pure over its inputs; the caller updates `claimed` after each successful
/// resolution. An empty fragment is degenerate and resolves to
/// [`Alignment::Unresolved`]. "Not found" is never an error.
#[must_use]
pub fn locate(
    document_text: &str,
    fragment: &str,
    claimed: &ClaimedSpans,
    options: &AlignmentOptions,
) -> Alignment {
    if fragment.is_empty() {
        return Alignment::Unresolved;
    }

    let exact = exact_occurrences(document_text, fragment);
    if let Some(interval) = select(&exact, claimed, options.occurrence_hint) {
        return Alignment::Exact(interval);
    }

    if options.fuzzy {
        let doc = Normalized::from_text(document_text);
        let frag = Normalized::from_text(fragment);
        let fuzzy = fuzzy_occurrences(&doc, &frag.text);
        if let Some(interval) = select(&fuzzy, claimed, options.occurrence_hint) {
            return Alignment::Fuzzy(interval);
        }
    }

    Alignment::Unresolved
}

/// Pick the preferred unclaimed occurrence.
fn select(
    occurrences: &[CharInterval],
    claimed: &ClaimedSpans,
    hint: Option<usize>,
) -> Option<CharInterval> {
    if let Some(n) = hint {
        if let Some(interval) = occurrences.get(n) {
            if !claimed.overlaps(interval) {
                return Some(*interval);
            }
        }
    }
    occurrences
        .iter()
        .copied()
        .find(|interval| !claimed.overlaps(interval))
}

/// All literal occurrences of `fragment`, as character intervals.
fn exact_occurrences(document_text: &str, fragment: &str) -> Vec<CharInterval> {
    let fragment_chars = fragment.chars().count();
    if document_text.is_ascii() {
        // Byte offsets are char offsets.
        return document_text
            .match_indices(fragment)
            .map(|(start, _)| CharInterval::new(start, start + fragment_chars))
            .collect();
    }

    let byte_to_char = build_byte_to_char_map(document_text);
    document_text
        .match_indices(fragment)
        .map(|(byte_start, _)| {
            let start = byte_to_char[byte_start];
            CharInterval::new(start, start + fragment_chars)
        })
        .collect()
}

/// Translation table: `map[byte_idx]` is the character index at that byte.
///
/// Every byte of a multibyte character maps to the same character index;
/// `map[text.len()]` is the total character count.
fn build_byte_to_char_map(text: &str) -> Vec<usize> {
    let mut map = vec![0usize; text.len() + 1];
    let mut char_count = 0;
    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        for offset in 0..ch.len_utf8() {
            map[byte_idx + offset] = char_idx;
        }
        char_count = char_idx + 1;
    }
    map[text.len()] = char_count;
    map
}

/// Case-folded text with whitespace runs collapsed, plus the index
/// translation tables needed to map matches back into the original text.
struct Normalized {
    /// Collapsed, case-folded text.
    text: String,
    /// Byte offset in `text` of each normalized character.
    char_byte_offsets: Vec<usize>,
    /// Original character index where each normalized character begins.
    orig_starts: Vec<usize>,
    /// Original character index just past what each normalized character
    /// covers. A collapsed whitespace run maps back to the full run.
    orig_ends: Vec<usize>,
}

impl Normalized {
    fn from_text(text: &str) -> Self {
        let mut out = Self {
            text: String::new(),
            char_byte_offsets: Vec::new(),
            orig_starts: Vec::new(),
            orig_ends: Vec::new(),
        };

        let mut ws_run_start: Option<usize> = None;
        for (idx, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                // Leading whitespace is dropped; interior runs are buffered
                // until the next non-whitespace character flushes them.
                if !out.text.is_empty() && ws_run_start.is_none() {
                    ws_run_start = Some(idx);
                }
                continue;
            }
            if let Some(run_start) = ws_run_start.take() {
                out.push(' ', run_start, idx);
            }
            for folded in ch.to_lowercase() {
                out.push(folded, idx, idx + 1);
            }
        }
        // A trailing whitespace run is never flushed, so it is dropped.
        out
    }

    fn push(&mut self, ch: char, orig_start: usize, orig_end: usize) {
        self.char_byte_offsets.push(self.text.len());
        self.text.push(ch);
        self.orig_starts.push(orig_start);
        self.orig_ends.push(orig_end);
    }

    /// Normalized character index at a byte offset of `self.text`.
    fn char_index_at(&self, byte_offset: usize) -> usize {
        self.char_byte_offsets
            .binary_search(&byte_offset)
            .unwrap_or_else(|insertion| insertion)
    }
}

/// Occurrences of the normalized fragment, mapped back to original offsets.
fn fuzzy_occurrences(doc: &Normalized, fragment_norm: &str) -> Vec<CharInterval> {
    if fragment_norm.is_empty() {
        return Vec::new();
    }
    doc.text
        .match_indices(fragment_norm)
        .map(|(byte_start, matched)| {
            let start_idx = doc.char_index_at(byte_start);
            let end_idx = doc.char_index_at(byte_start + matched.len());
            CharInterval::new(doc.orig_starts[start_idx], doc.orig_ends[end_idx - 1])
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn normalize_for_compare(text: &str) -> String {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    proptest! {
        /// A literal substring always resolves exactly, and the matched
        /// interval extracts text equal to the fragment.
        #[test]
        fn literal_substring_resolves_exact(
            text in "[a-z ]{1,60}",
            start in 0usize..60,
            len in 1usize..20,
        ) {
            let chars: Vec<char> = text.chars().collect();
            prop_assume!(start < chars.len());
            let end = (start + len).min(chars.len());
            let fragment: String = chars[start..end].iter().collect();
            prop_assume!(!fragment.is_empty());

            let claimed = ClaimedSpans::new();
            let alignment = locate(&text, &fragment, &claimed, &AlignmentOptions::default());

            prop_assert_eq!(alignment.status(), AlignmentStatus::Exact);
            let interval = alignment.interval().unwrap();
            let matched: String = text
                .chars()
                .skip(interval.start)
                .take(interval.len())
                .collect();
            prop_assert_eq!(matched, fragment);
        }

        /// An uppercased substring still resolves, and the matched region is
        /// equal to the fragment under the normalization policy.
        #[test]
        fn folded_substring_resolves(
            text in "[a-z ]{1,60}",
            start in 0usize..60,
            len in 1usize..20,
        ) {
            let chars: Vec<char> = text.chars().collect();
            prop_assume!(start < chars.len());
            let end = (start + len).min(chars.len());
            let fragment: String = chars[start..end].iter().collect::<String>().to_uppercase();
            prop_assume!(fragment.chars().any(|c| c.is_alphabetic()));

            let claimed = ClaimedSpans::new();
            let alignment = locate(&text, &fragment, &claimed, &AlignmentOptions::default());

            let interval = alignment.interval().expect("folded fragment must resolve");
            let matched: String = text
                .chars()
                .skip(interval.start)
                .take(interval.len())
                .collect();
            prop_assert_eq!(
                normalize_for_compare(&matched),
                normalize_for_compare(&fragment)
            );
        }

        /// Resolved intervals are always in bounds of the document.
        #[test]
        fn intervals_in_bounds(text in ".{0,40}", fragment in ".{1,10}") {
            let claimed = ClaimedSpans::new();
            let alignment = locate(&text, &fragment, &claimed, &AlignmentOptions::default());

            if let Some(interval) = alignment.interval() {
                prop_assert!(interval.start < interval.end);
                prop_assert!(interval.end <= text.chars().count());
            }
        }
    }
}
