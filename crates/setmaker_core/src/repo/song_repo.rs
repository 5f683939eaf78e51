//! Song table adapter and the per-artist index query.

use crate::model::artist::ArtistId;
use crate::model::song::Song;
use crate::pagination::ContinuationKey;
use crate::repo::document_repo::{
    Document, RepoPage, RepoResult, Repository, SecondaryIndex, SqliteRepository,
};
use uuid::Uuid;

/// Equality index on `Song.artist_id`.
pub const ARTIST_ID_INDEX: SecondaryIndex = SecondaryIndex {
    name: "ArtistId-index",
    attribute: "ArtistId",
    column: "artist_id",
};

/// SQLite-backed song repository.
pub type SqliteSongRepository<'conn> = SqliteRepository<'conn, Song>;

impl Document for Song {
    const KIND: &'static str = "song";
    const TABLE: &'static str = "songs";
    const INDEXES: &'static [SecondaryIndex] = &[ARTIST_ID_INDEX];

    fn key(&self) -> Uuid {
        self.id
    }

    fn index_value(&self, index: &SecondaryIndex) -> Option<String> {
        (index.name == ARTIST_ID_INDEX.name).then(|| self.artist_id.to_string())
    }
}

/// Song-specific queries available on any song repository.
pub trait SongQueries: Repository<Song> {
    /// One page of the songs referencing `artist_id`.
    fn query_by_artist(
        &self,
        artist_id: ArtistId,
        page_size: u32,
        start: Option<&ContinuationKey>,
    ) -> RepoResult<RepoPage<Song>> {
        self.query_by_index(
            ARTIST_ID_INDEX.name,
            &artist_id.to_string(),
            page_size,
            start,
        )
    }
}

impl<R: Repository<Song> + ?Sized> SongQueries for R {}
