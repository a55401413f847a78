// Study-assistant chat. The service is stateless: each request carries one
// user message and the response carries the stored envelopes for both sides
// of the exchange. Transcript ordering across concurrent requests is the
// caller's concern.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One chat transcript entry.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: String) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn assistant(text: String) -> Self {
        Self::new(text, Sender::Assistant)
    }

    fn new(text: String, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Sender::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_messages_get_distinct_ids() {
        let a = ChatMessage::user("hi".to_string());
        let b = ChatMessage::user("hi".to_string());
        assert_ne!(a.id, b.id);
    }
}
