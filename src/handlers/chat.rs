use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, MessageKind};
use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct TurnResponse {
    pub connected: bool,
    pub messages: Vec<ChatMessage>,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Json<TurnResponse> {
    tracing::info!(text = %req.text, "incoming chat message");

    let outcome = conversation::process_turn(&state, &req.text).await;

    Json(TurnResponse {
        connected: outcome.connected,
        messages: outcome.messages,
    })
}

pub async fn history(State(state): State<Arc<AppState>>) -> Json<TurnResponse> {
    let session = state.session.lock().await;
    let messages = session
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::Final)
        .cloned()
        .collect();

    Json(TurnResponse {
        connected: session.is_connected(),
        messages,
    })
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub connected: bool,
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Json<ResetResponse> {
    let connected = conversation::reset_session(&state).await;
    tracing::info!(connected, "session reset");
    Json(ResetResponse { connected })
}
