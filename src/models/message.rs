use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// A placeholder stands in for a reply still being composed. It is replaced
/// by a final message, never mutated in place by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Placeholder,
    Final,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: NaiveDateTime,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            sender: Sender::User,
            timestamp: Utc::now().naive_utc(),
            kind: MessageKind::Final,
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            sender: Sender::Assistant,
            timestamp: Utc::now().naive_utc(),
            kind: MessageKind::Final,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: String::new(),
            sender: Sender::Assistant,
            timestamp: Utc::now().naive_utc(),
            kind: MessageKind::Placeholder,
        }
    }
}
