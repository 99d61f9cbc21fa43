//! In-memory contact repository.
//!
//! Keeps contacts in a `Vec` in insertion order and evaluates filters with
//! `ContactFilter::matches`. Nothing survives the process; intended for tests
//! and callers that do not need a database.

use crate::model::contact::{Contact, ContactDraft, ContactId, ContactPatch};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use crate::search::filter::ContactFilter;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Vector-backed [`ContactRepository`].
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: Vec<Contact>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_of(&self, id: ContactId) -> RepoResult<usize> {
        self.contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or(RepoError::NotFound(id))
    }
}

impl ContactRepository for InMemoryContactRepository {
    fn insert_contact(&mut self, draft: ContactDraft) -> RepoResult<Contact> {
        let contact = Contact::from_draft(Uuid::nil(), draft);
        contact.validate()?;

        let contact = Contact {
            // v4 ids are random; reuse of a deleted id is not tracked.
            id: Uuid::new_v4(),
            ..contact
        };
        self.contacts.push(contact.clone());
        Ok(contact)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Contact> {
        let index = self.position_of(id)?;
        Ok(self.contacts[index].clone())
    }

    fn update_contact(&mut self, id: ContactId, patch: &ContactPatch) -> RepoResult<Contact> {
        let index = self.position_of(id)?;
        let mut updated = self.contacts[index].clone();
        updated.apply_patch(patch);
        updated.validate()?;

        self.contacts[index] = updated.clone();
        Ok(updated)
    }

    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        let index = self.position_of(id)?;
        self.contacts.remove(index);
        Ok(())
    }

    fn list_contacts(&self, filter: Option<&ContactFilter>) -> RepoResult<Vec<Contact>> {
        Ok(self
            .contacts
            .iter()
            .filter(|contact| filter.map_or(true, |filter| filter.matches(contact)))
            .cloned()
            .collect())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let unique = self
            .contacts
            .iter()
            .flat_map(|contact| contact.tags.iter().cloned())
            .collect::<BTreeSet<_>>();
        Ok(unique.into_iter().collect())
    }
}
