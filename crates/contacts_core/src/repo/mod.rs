//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the contact persistence contract used by the service layer.
//! - Isolate SQLite query details from business orchestration.
//! - Provide an in-memory implementation with identical semantics.
//!
//! # Invariants
//! - Repository writes must enforce `Contact::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.

pub mod contact_repo;
pub mod memory_repo;
