//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record plus its creation and update input shapes.
//! - Own field-level validation so callers never persist unchecked input.
//!
//! # Invariants
//! - Every contact is identified by a storage-assigned `ContactId`.
//! - Deletion is permanent; there are no tombstones.

pub mod contact;
