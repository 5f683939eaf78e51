//! Artist table adapter.

use crate::model::artist::Artist;
use crate::repo::document_repo::{Document, SqliteRepository};
use uuid::Uuid;

/// SQLite-backed artist repository.
pub type SqliteArtistRepository<'conn> = SqliteRepository<'conn, Artist>;

impl Document for Artist {
    const KIND: &'static str = "artist";
    const TABLE: &'static str = "artists";

    fn key(&self) -> Uuid {
        self.id
    }
}
