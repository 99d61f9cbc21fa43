//! Contact use-case service.
//!
//! # Responsibility
//! - Provide the create/get/update/delete/list/search entry points used by
//!   transport and agent-tool callers.
//! - Validate raw input once, then delegate persistence to a repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Results are always bare sequences in storage order.
//! - Log events carry ids and counts only, never contact field values.

use crate::model::contact::{Contact, ContactCreate, ContactId, ContactUpdate, ContactValidationError};
use crate::repo::contact_repo::{ContactRepository, RepoError};
use crate::search::filter::{build_search_filter, build_tag_filter, ContactFilter};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ContactServiceError>;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Input failed field validation.
    Validation(ContactValidationError),
    /// No live contact has the requested id (kept as given by the caller).
    NotFound(String),
    /// Persistence-layer failure, surfaced unchanged.
    Storage(RepoError),
}

impl ContactServiceError {
    /// HTTP-style status a transport layer should map this error to.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for ContactServiceError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id.to_string()),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// Combined list query: free-text search AND exact tag, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl ContactQuery {
    fn to_filter(&self) -> Option<ContactFilter> {
        let filter = match self.tag.as_deref() {
            Some(tag) => build_tag_filter(tag),
            None => ContactFilter::default(),
        };
        let filter = match self.search.as_deref() {
            Some(search) => filter.with_text(search),
            None => filter,
        };
        if filter.is_unrestricted() {
            None
        } else {
            Some(filter)
        }
    }
}

/// Contact service facade over an injected repository.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates creation input, applies defaults and stores the contact.
    ///
    /// Defaults: `relationship_status = prospect`, empty `tags`/`notes`.
    pub fn create_contact(&mut self, input: ContactCreate) -> ServiceResult<Contact> {
        let draft = input.validate().map_err(|err| {
            warn!(
                "event=contact_create module=service status=rejected field={}",
                err.field
            );
            err
        })?;
        let contact = self.repo.insert_contact(draft)?;
        info!(
            "event=contact_create module=service status=ok contact_id={}",
            contact.id
        );
        Ok(contact)
    }

    /// Gets one contact by id.
    pub fn get_contact(&self, id: &str) -> ServiceResult<Contact> {
        let contact_id = parse_contact_id(id)?;
        Ok(self.repo.get_contact(contact_id)?)
    }

    /// Applies a partial update; absent fields keep their stored values.
    pub fn update_contact(&mut self, id: &str, partial: ContactUpdate) -> ServiceResult<Contact> {
        let contact_id = parse_contact_id(id)?;
        let patch = partial.validate().map_err(|err| {
            warn!(
                "event=contact_update module=service status=rejected contact_id={contact_id} field={}",
                err.field
            );
            err
        })?;
        let contact = self.repo.update_contact(contact_id, &patch)?;
        info!("event=contact_update module=service status=ok contact_id={contact_id}");
        Ok(contact)
    }

    /// Permanently deletes one contact.
    pub fn delete_contact(&mut self, id: &str) -> ServiceResult<()> {
        let contact_id = parse_contact_id(id)?;
        self.repo.delete_contact(contact_id)?;
        info!("event=contact_delete module=service status=ok contact_id={contact_id}");
        Ok(())
    }

    /// Lists every contact in storage order.
    pub fn list_contacts(&self) -> ServiceResult<Vec<Contact>> {
        Ok(self.repo.list_contacts(None)?)
    }

    /// Case-insensitive substring search over name/email/phone/company/tags.
    ///
    /// A blank query returns the same result as [`Self::list_contacts`].
    pub fn search_contacts(&self, query: &str) -> ServiceResult<Vec<Contact>> {
        let filter = build_search_filter(query);
        let contacts = self.repo.list_contacts(filter.as_ref())?;
        info!(
            "event=contact_search module=service status=ok filtered={} hits={}",
            filter.is_some(),
            contacts.len()
        );
        Ok(contacts)
    }

    /// Lists contacts whose tags contain `tag` verbatim (case-sensitive).
    pub fn search_contacts_by_tag(&self, tag: &str) -> ServiceResult<Vec<Contact>> {
        let filter = build_tag_filter(tag);
        Ok(self.repo.list_contacts(Some(&filter))?)
    }

    /// Lists contacts matching both the optional search text and tag.
    pub fn find_contacts(&self, query: &ContactQuery) -> ServiceResult<Vec<Contact>> {
        let filter = query.to_filter();
        Ok(self.repo.list_contacts(filter.as_ref())?)
    }

    /// Lists distinct tags in use.
    pub fn list_tags(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.list_tags()?)
    }
}

/// Ids that are not UUIDs cannot name a stored contact.
fn parse_contact_id(id: &str) -> ServiceResult<ContactId> {
    Uuid::parse_str(id.trim()).map_err(|_| ContactServiceError::NotFound(id.to_string()))
}
