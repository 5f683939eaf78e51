//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the uniform document store contract (`Repository<D>`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidStartKey`)
//!   in addition to store transport errors.
//! - Repositories never validate cross-document references; that is the
//!   service's job.

pub mod artist_repo;
pub mod document_repo;
pub mod song_repo;
