use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::models::ChatSession;
use crate::services::ai::LlmProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    /// The single logical conversation. The async mutex serializes turns:
    /// one in-flight turn at a time, later submissions queue behind it.
    pub session: tokio::sync::Mutex<ChatSession>,
}
