use serde::{Deserialize, Serialize};

use super::MeetingRequest;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnIntent {
    Greeting,
    MenuInfo,
    Restrictions,
    Unknown,
    ConversationEnd,
}

/// Structured result of one interpreter call: the intent of the latest user
/// message, whatever fields could be extracted from it, the reply to show
/// and whether the conversation is over. `type`, `extracted` and `message`
/// are all required: a reply missing any of them is a schema violation, even
/// though the keys inside `extracted` are individually optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnInterpretation {
    #[serde(rename = "type")]
    pub intent: TurnIntent,
    pub extracted: MeetingRequest,
    pub message: String,
    #[serde(default)]
    pub end_conversation: bool,
}
