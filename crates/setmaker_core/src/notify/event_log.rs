//! SQLite-backed event log acting as the local message bus.

use super::{DomainEvent, MessageId, Notifier, PublishError};
use chrono::{SecondsFormat, Utc};
use log::{error, info};
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Topic used for artist-created events unless configured otherwise.
pub const DEFAULT_TOPIC: &str = "create-artist";

/// One row of the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub seq: i64,
    pub message_id: MessageId,
    pub topic: String,
    pub event: DomainEvent,
    /// RFC 3339 UTC timestamp.
    pub published_at: String,
}

/// Appends published events to the `published_events` table.
///
/// Each publish is its own autocommit statement; it never joins the write
/// that triggered the event.
pub struct SqliteEventLog<'conn> {
    conn: &'conn Connection,
    topic: String,
}

impl<'conn> SqliteEventLog<'conn> {
    pub fn new(conn: &'conn Connection, topic: impl Into<String>) -> Self {
        Self {
            conn,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns up to `limit` events of this log's topic, oldest first.
    pub fn list_events(&self, limit: u32) -> Result<Vec<PublishedEvent>, PublishError> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, message_id, topic, payload, published_at
             FROM published_events
             WHERE topic = ?1
             ORDER BY seq ASC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![self.topic, i64::from(limit)])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            let payload: String = row.get("payload")?;
            events.push(PublishedEvent {
                seq: row.get("seq")?,
                message_id: MessageId::new(row.get::<_, String>("message_id")?),
                topic: row.get("topic")?,
                event: serde_json::from_str(&payload).map_err(PublishError::Serialize)?,
                published_at: row.get("published_at")?,
            });
        }
        Ok(events)
    }
}

impl Notifier for SqliteEventLog<'_> {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError> {
        let payload = serde_json::to_string(event).map_err(PublishError::Serialize)?;
        let message_id = MessageId::new(Uuid::new_v4().to_string());
        let published_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        if let Err(err) = self.conn.execute(
            "INSERT INTO published_events (message_id, topic, event_type, payload, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                message_id.as_str(),
                self.topic,
                event.event_type(),
                payload,
                published_at
            ],
        ) {
            error!(
                "event=notify_publish module=notify status=error sink=event_log topic={} event_type={} error={}",
                self.topic,
                event.event_type(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=notify_publish module=notify status=ok sink=event_log topic={} event_type={} message_id={}",
            self.topic,
            event.event_type(),
            message_id
        );
        Ok(message_id)
    }
}
