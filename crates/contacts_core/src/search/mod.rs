//! Contact search entry points.
//!
//! # Responsibility
//! - Turn free-text and tag queries into `ContactFilter` predicates.
//! - Keep matching rules in one place for every repository implementation.

pub mod filter;
