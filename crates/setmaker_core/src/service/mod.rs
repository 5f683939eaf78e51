//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and notifier calls into use-case level APIs.
//! - Keep transports decoupled from storage details.

pub mod artists;
pub mod catalog;
pub mod error;
pub mod songs;

pub use artists::{ArtistCreation, NotificationOutcome};
pub use catalog::CatalogService;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use songs::SongDraft;
