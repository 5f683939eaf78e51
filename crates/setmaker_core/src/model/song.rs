//! Song document.

use crate::model::artist::ArtistId;
use crate::model::lifecycle::{assign_identifier, Metadata};
use crate::model::music::{MusicalKey, Tonality};
use crate::model::validation::{required_text, ValidationError, MAX_NAME_CHARS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SongId = Uuid;

/// Validated mutable song fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFields {
    pub title: String,
    pub artist_id: ArtistId,
    pub key: MusicalKey,
    pub tonality: Tonality,
}

impl SongFields {
    /// Validates raw title/key/tonality input for an already-parsed artist id.
    pub fn parse(
        title: &str,
        artist_id: ArtistId,
        key: &str,
        tonality: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text("title", title, MAX_NAME_CHARS)?,
            artist_id,
            key: key.parse()?,
            tonality: tonality.parse()?,
        })
    }
}

/// A song performed by one artist.
///
/// `artist_id` is checked against the artist table on every write but is not
/// enforced afterwards; deleting the artist leaves the song in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist_id: ArtistId,
    pub key: MusicalKey,
    pub tonality: Tonality,
    pub metadata: Metadata,
}

impl Song {
    /// Creates a new song with a fresh id, stamped at `now`.
    pub fn create(fields: SongFields, now: DateTime<Utc>) -> Self {
        Self {
            id: assign_identifier(),
            title: fields.title,
            artist_id: fields.artist_id,
            key: fields.key,
            tonality: fields.tonality,
            metadata: Metadata::stamp_create(now),
        }
    }

    /// Replaces every mutable field; id and `created_at` are kept.
    pub fn apply_update(&mut self, fields: SongFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.artist_id = fields.artist_id;
        self.key = fields.key;
        self.tonality = fields.tonality;
        self.metadata = self.metadata.stamp_update(now);
    }
}
