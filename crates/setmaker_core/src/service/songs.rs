//! Song use-cases with write-time artist reference checks.

use crate::clock::Clock;
use crate::logging::sanitize_message;
use crate::model::artist::Artist;
use crate::model::song::{Song, SongFields};
use crate::notify::Notifier;
use crate::pagination::Page;
use crate::repo::document_repo::Repository;
use crate::repo::song_repo::SongQueries;
use crate::service::catalog::CatalogService;
use crate::service::error::{parse_id, ServiceError, ServiceResult};
use log::info;

const LOGGED_TITLE_CHARS: usize = 64;

/// Raw song input as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub artist_id: String,
    pub key: String,
    pub tonality: String,
}

impl SongDraft {
    pub fn new(
        title: impl Into<String>,
        artist_id: impl Into<String>,
        key: impl Into<String>,
        tonality: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist_id: artist_id.into(),
            key: key.into(),
            tonality: tonality.into(),
        }
    }

    fn parse(&self) -> ServiceResult<SongFields> {
        let artist_id = parse_id("artist_id", &self.artist_id)?;
        Ok(SongFields::parse(
            &self.title,
            artist_id,
            &self.key,
            &self.tonality,
        )?)
    }
}

impl<A, S, N, C> CatalogService<A, S, N, C>
where
    A: Repository<Artist>,
    S: Repository<Song>,
    N: Notifier,
    C: Clock,
{
    /// Creates a song after confirming its artist exists.
    pub fn create_song(&self, draft: &SongDraft) -> ServiceResult<Song> {
        let fields = draft.parse()?;
        self.require_artist("song_create", fields.artist_id)?;

        let song = Song::create(fields, self.clock.now());
        self.songs
            .put(&song)
            .map_err(|err| ServiceError::from_repo("song_create", err))?;
        info!(
            "event=song_create module=service status=ok id={} artist_id={} title={}",
            song.id,
            song.artist_id,
            sanitize_message(&song.title, LOGGED_TITLE_CHARS)
        );
        Ok(song)
    }

    pub fn get_song(&self, id: &str) -> ServiceResult<Song> {
        let id = parse_id("id", id)?;
        self.songs
            .get(id)
            .map_err(|err| ServiceError::from_repo("song_get", err))
    }

    /// Replaces all song fields, keeping id and creation time.
    ///
    /// The referenced artist is checked again, whether or not it changed.
    pub fn update_song(&self, id: &str, draft: &SongDraft) -> ServiceResult<Song> {
        let id = parse_id("id", id)?;
        let fields = draft.parse()?;
        self.require_artist("song_update", fields.artist_id)?;

        let mut song = self
            .songs
            .get(id)
            .map_err(|err| ServiceError::from_repo("song_update", err))?;
        song.apply_update(fields, self.clock.now());
        self.songs
            .put(&song)
            .map_err(|err| ServiceError::from_repo("song_update", err))?;
        info!(
            "event=song_update module=service status=ok id={} artist_id={} title={}",
            song.id,
            song.artist_id,
            sanitize_message(&song.title, LOGGED_TITLE_CHARS)
        );
        Ok(song)
    }

    /// Removes a song. Missing ids succeed.
    pub fn delete_song(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id("id", id)?;
        self.songs
            .delete(id)
            .map_err(|err| ServiceError::from_repo("song_delete", err))?;
        info!("event=song_delete module=service status=ok id={}", id);
        Ok(())
    }

    pub fn list_songs(&self, page_size: u32, cursor: &str) -> ServiceResult<Page<Song>> {
        self.list_page("song_list", page_size, cursor, |size, start| {
            self.songs.scan(size, start)
        })
    }

    /// Lists songs of one existing artist.
    pub fn list_songs_by_artist(
        &self,
        page_size: u32,
        cursor: &str,
        artist_id: &str,
    ) -> ServiceResult<Page<Song>> {
        let artist_id = parse_id("artist_id", artist_id)?;
        self.require_artist("song_list_by_artist", artist_id)?;
        self.list_page("song_list_by_artist", page_size, cursor, |size, start| {
            self.songs.query_by_artist(artist_id, size, start)
        })
    }
}
