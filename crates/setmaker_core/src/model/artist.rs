//! Artist document.

use crate::model::lifecycle::{assign_identifier, Metadata};
use crate::model::validation::{
    optional_text, required_text, ValidationError, MAX_IMAGE_CHARS, MAX_NAME_CHARS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ArtistId = Uuid;

/// Validated mutable artist fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub image: String,
}

impl ArtistFields {
    /// Trims and validates raw caller input.
    pub fn parse(name: &str, image: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", name, MAX_NAME_CHARS)?,
            image: optional_text("image", image, MAX_IMAGE_CHARS)?,
        })
    }
}

/// A performer in the catalog.
///
/// Persisted as one JSON document keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    /// Image reference, usually a URL. May be empty.
    pub image: String,
    pub metadata: Metadata,
}

impl Artist {
    /// Creates a new artist with a fresh id, stamped at `now`.
    pub fn create(fields: ArtistFields, now: DateTime<Utc>) -> Self {
        Self {
            id: assign_identifier(),
            name: fields.name,
            image: fields.image,
            metadata: Metadata::stamp_create(now),
        }
    }

    /// Overwrites name and image; id and `created_at` are kept.
    pub fn apply_update(&mut self, fields: ArtistFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.image = fields.image;
        self.metadata = self.metadata.stamp_update(now);
    }
}
