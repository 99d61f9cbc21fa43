//! Core domain logic for contact management.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{
    Contact, ContactCreate, ContactDraft, ContactId, ContactPatch, ContactUpdate,
    ContactValidationError, RelationshipStatus, ValidationRule,
};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use repo::memory_repo::InMemoryContactRepository;
pub use search::filter::{build_search_filter, build_tag_filter, ContactFilter};
pub use service::contact_service::{
    ContactQuery, ContactService, ContactServiceError, ServiceResult,
};

