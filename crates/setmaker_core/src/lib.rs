//! Core domain logic for the setmaker artist/song catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod pagination;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig, LogConfig};
pub use db::{open_db, open_db_at, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::artist::{Artist, ArtistId};
pub use model::lifecycle::Metadata;
pub use model::music::{MusicalKey, Tonality};
pub use model::song::{Song, SongId};
pub use notify::{DomainEvent, LogNotifier, MessageId, Notifier, PublishError, SqliteEventLog};
pub use pagination::{ContinuationKey, CursorError, Page, PageLimits};
pub use repo::artist_repo::SqliteArtistRepository;
pub use repo::document_repo::{RepoError, RepoResult, Repository};
pub use repo::song_repo::{SongQueries, SqliteSongRepository};
pub use service::{
    ArtistCreation, CatalogService, ErrorKind, NotificationOutcome, ServiceError, ServiceResult,
    SongDraft,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
