//! Query normalization and contact predicates.
//!
//! # Responsibility
//! - Build filters from raw caller queries.
//! - Evaluate filters against in-memory contacts.
//!
//! # Invariants
//! - A blank free-text query yields no filter (matches everything).
//! - Text matching is case-insensitive substring containment.
//! - Tag matching is exact and case-sensitive.

use crate::model::contact::Contact;

/// Separator used when tags are concatenated for text matching.
const TAG_JOIN_SEPARATOR: &str = " ";

/// Predicate over a contact.
///
/// All present criteria must hold; a default filter matches every contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    /// Lower-cased needle matched against name/email/phone/company/tags.
    text: Option<String>,
    /// Tag that must appear verbatim in `Contact::tags`.
    tag: Option<String>,
}

impl ContactFilter {
    /// Builds a filter requiring the given tag verbatim.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            text: None,
            tag: Some(tag.into()),
        }
    }

    /// Lower-cased free-text needle, when present.
    pub fn text_needle(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Exact tag requirement, when present.
    pub fn required_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Adds the free-text criterion of `query`; blank queries add nothing.
    pub fn with_text(mut self, query: &str) -> Self {
        self.text = normalize_query(query);
        self
    }

    /// Returns whether this filter accepts every contact.
    pub fn is_unrestricted(&self) -> bool {
        self.text.is_none() && self.tag.is_none()
    }

    /// Evaluates this filter against one contact.
    pub fn matches(&self, contact: &Contact) -> bool {
        self.matches_tag(contact) && self.matches_text(contact)
    }

    /// Evaluates only the free-text criterion.
    pub fn matches_text(&self, contact: &Contact) -> bool {
        let Some(needle) = self.text.as_deref() else {
            return true;
        };

        let joined_tags = contact.tags.join(TAG_JOIN_SEPARATOR);
        let fields = [
            Some(contact.name.as_str()),
            Some(contact.email.as_str()),
            Some(contact.phone.as_str()),
            contact.company.as_deref(),
            Some(joined_tags.as_str()),
        ];
        let matched = fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle));
        matched
    }

    fn matches_tag(&self, contact: &Contact) -> bool {
        match self.tag.as_deref() {
            Some(tag) => contact.tags.iter().any(|candidate| candidate == tag),
            None => true,
        }
    }
}

/// Builds the filter for a free-text search.
///
/// Returns `None` for empty or whitespace-only queries.
pub fn build_search_filter(query: &str) -> Option<ContactFilter> {
    let filter = ContactFilter::default().with_text(query);
    if filter.is_unrestricted() {
        None
    } else {
        Some(filter)
    }
}

/// Builds the exact tag-membership filter.
pub fn build_tag_filter(tag: &str) -> ContactFilter {
    ContactFilter::tag(tag)
}

/// Surrounding whitespace of a non-blank query is part of the needle.
fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}
