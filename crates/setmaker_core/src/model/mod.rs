//! Catalog domain model.
//!
//! # Responsibility
//! - Define the artist/song documents persisted by the store.
//! - Own field validation and lifecycle metadata rules.
//!
//! # Invariants
//! - Entity ids are assigned once by `lifecycle::assign_identifier`.
//! - `metadata.created_at` never changes after creation.

pub mod artist;
pub mod lifecycle;
pub mod music;
pub mod song;
pub mod validation;
