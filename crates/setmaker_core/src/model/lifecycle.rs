//! Identifier assignment and lifecycle metadata stamping.
//!
//! # Invariants
//! - Identifiers are random v4 UUIDs; uniqueness is probabilistic and never
//!   checked against the store.
//! - `created_at` is written once by `stamp_create` and carried unchanged by
//!   every `stamp_update`.
//! - `updated_at` never moves backwards, even if the clock does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Creates a fresh entity identifier.
pub fn assign_identifier() -> Uuid {
    Uuid::new_v4()
}

/// Creation/update timestamps carried by every catalog document.
///
/// Serialized as RFC 3339 UTC strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    /// Metadata for a document created at `now`.
    pub fn stamp_create(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Metadata for a successful mutation at `now`.
    pub fn stamp_update(&self, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        }
    }
}
