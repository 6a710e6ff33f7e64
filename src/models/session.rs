use crate::models::{ChatMessage, MeetingRequest, MessageKind, ValidValueSet};

/// All state for the single logical conversation: the message log, the
/// accumulated meeting parameters and the reference lists fetched at
/// session start. `valid_values` doubles as the connectivity marker —
/// `None` means the catalog was unreachable.
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub request: MeetingRequest,
    pub valid_values: Option<ValidValueSet>,
}

impl ChatSession {
    pub fn new(valid_values: Option<ValidValueSet>) -> Self {
        Self {
            messages: Vec::new(),
            request: MeetingRequest::default(),
            valid_values,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.valid_values.is_some()
    }

    pub fn push_user(&mut self, content: &str) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Appends a typing placeholder and returns its id so it can later be
    /// resolved into a final message or dropped.
    pub fn push_placeholder(&mut self) -> String {
        let msg = ChatMessage::placeholder();
        let id = msg.id.clone();
        self.messages.push(msg);
        id
    }

    /// Replaces the placeholder with a final assistant message in the same
    /// log position. Appends instead if the placeholder is gone.
    pub fn resolve_placeholder(&mut self, id: &str, content: &str) {
        match self.find_placeholder(id) {
            Some(idx) => {
                let mut msg = ChatMessage::assistant(content);
                msg.id = id.to_string();
                self.messages[idx] = msg;
            }
            None => self.push_assistant(content),
        }
    }

    pub fn drop_placeholder(&mut self, id: &str) {
        if let Some(idx) = self.find_placeholder(id) {
            self.messages.remove(idx);
        }
    }

    /// Clears the log and the accumulated request. Connectivity is left to
    /// the caller, which may retry the catalog fetch.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.request.clear();
    }

    fn find_placeholder(&self, id: &str) -> Option<usize> {
        self.messages
            .iter()
            .position(|m| m.id == id && m.kind == MessageKind::Placeholder)
    }
}
