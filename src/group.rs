//! Grouping engine: partition a document's extractions by a shared attribute.
//!
//! Groups are derived, read-only views into the document's extraction
//! sequence, keyed by the value of a caller-chosen attribute and ordered by
//! first sight. Extractions missing the attribute are routed to the
//! [`UNGROUPED_LABEL`] sentinel collection instead of being dropped, so
//! callers can warn without losing data.
//!
//! Requesting a grouping freezes the document (see
//! [`Document::freeze`](crate::Document::freeze)): group members borrow the
//! extraction sequence, and the freeze rule keeps those views from going
//! stale underneath the caller.

use std::collections::HashMap;

use crate::data::ResolvedExtraction;
use crate::document::Document;

/// Sentinel label for extractions missing the grouping attribute.
pub const UNGROUPED_LABEL: &str = "__ungrouped__";

/// An attribute value plus the extractions sharing it, in document order.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    label: String,
    members: Vec<&'a ResolvedExtraction>,
}

impl<'a> Group<'a> {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            members: Vec::new(),
        }
    }

    /// The shared attribute value, or [`UNGROUPED_LABEL`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Members in first-encountered order.
    #[must_use]
    pub fn members(&self) -> &[&'a ResolvedExtraction] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True for the sentinel collection of attribute-less extractions.
    #[must_use]
    pub fn is_ungrouped(&self) -> bool {
        self.label == UNGROUPED_LABEL
    }
}

/// Result of [`group_by`]: named groups plus the ungrouped remainder.
#[derive(Debug, Clone)]
pub struct Grouping<'a> {
    groups: Vec<Group<'a>>,
    ungrouped: Group<'a>,
}

impl<'a> Grouping<'a> {
    /// Groups in first-occurrence order. Does not include the ungrouped
    /// collection.
    #[must_use]
    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    /// The sentinel collection of extractions missing the attribute.
    ///
    /// Reported separately so callers can warn without losing data.
    #[must_use]
    pub fn ungrouped(&self) -> &Group<'a> {
        &self.ungrouped
    }

    /// Total member count across all groups plus the ungrouped collection.
    ///
    /// Always equals the document's extraction count.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.groups.iter().map(Group::len).sum::<usize>() + self.ungrouped.len()
    }

    /// Check if there are no groups and no ungrouped extractions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.ungrouped.is_empty()
    }
}

/// Partition a document's extractions by the value of `attribute_name`.
///
/// For each extraction in document order: if its attributes contain the
/// key, it joins the group for that value (groups are created on first
/// sight, so group order reflects first-occurrence order); otherwise it
/// joins the ungrouped collection. Deterministic and read-only over the
/// extraction data; the call freezes the document against further appends.
///
/// An empty document yields an empty group sequence, not an error.
#[must_use]
pub fn group_by<'a>(document: &'a Document, attribute_name: &str) -> Grouping<'a> {
    document.freeze();

    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut ungrouped = Group::new(UNGROUPED_LABEL);

    for extraction in document.extractions() {
        match extraction.attribute(attribute_name) {
            Some(value) => {
                let slot = *index.entry(value).or_insert_with(|| {
                    groups.push(Group::new(value));
                    groups.len() - 1
                });
                groups[slot].members.push(extraction);
            }
            None => ungrouped.members.push(extraction),
        }
    }

    Grouping { groups, ungrouped }
}

// =============================================================================
// Tests
// =============================================================================
