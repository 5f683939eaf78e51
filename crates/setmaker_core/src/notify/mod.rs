//! Domain event publishing.
//!
//! # Responsibility
//! - Define the events the catalog emits and the `Notifier` port.
//! - Provide log-only and SQLite event-log publishers.
//!
//! # Invariants
//! - Publishing is a single attempt; notifiers never retry.
//! - Notifiers are called only after the triggering write has committed and
//!   never share a transaction with it.

mod event_log;
mod log_notifier;

pub use event_log::{PublishedEvent, SqliteEventLog, DEFAULT_TOPIC};
pub use log_notifier::LogNotifier;

use crate::db::DbError;
use crate::model::artist::ArtistId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Event emitted by catalog use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ArtistCreated { id: ArtistId, name: String },
}

impl DomainEvent {
    /// Stable event type tag, identical to the serialized `type` field.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ArtistCreated { .. } => "artist_created",
        }
    }
}

/// Identifier assigned by the bus to one published message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publishing failure.
#[derive(Debug)]
pub enum PublishError {
    /// Event could not be encoded.
    Serialize(serde_json::Error),
    /// Event log storage failed.
    Db(DbError),
    /// Bus rejected or could not receive the message.
    Transport(String),
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode event: {err}"),
            Self::Db(err) => write!(f, "failed to record event: {err}"),
            Self::Transport(message) => write!(f, "failed to publish event: {message}"),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Transport(_) => None,
        }
    }
}

impl From<rusqlite::Error> for PublishError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Fire-and-forget publisher of domain events.
pub trait Notifier {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError> {
        (**self).publish(event)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError> {
        (**self).publish(event)
    }
}
