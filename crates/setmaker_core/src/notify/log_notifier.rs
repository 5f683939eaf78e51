use super::{DomainEvent, MessageId, Notifier, PublishError};
use log::info;
use uuid::Uuid;

/// Publishes events as structured log lines only.
///
/// Useful where no bus is configured; every publish succeeds unless the
/// event cannot be encoded.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    topic: String,
}

impl LogNotifier {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl Notifier for LogNotifier {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError> {
        let payload = serde_json::to_string(event).map_err(PublishError::Serialize)?;
        let message_id = MessageId::new(Uuid::new_v4().to_string());
        info!(
            "event=notify_publish module=notify status=ok sink=log topic={} event_type={} message_id={} payload={}",
            self.topic,
            event.event_type(),
            message_id,
            payload
        );
        Ok(message_id)
    }
}
