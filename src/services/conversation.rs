use std::sync::Arc;
use std::time::Duration;

use crate::db::queries::{self, OfferingFilter};
use crate::models::{ChatMessage, ChatSession, RequiredField};
use crate::services::{interpreter, recommender};
use crate::state::AppState;

pub const NO_CONNECTION_REPLY: &str =
    "Sin conexión al catálogo de menús. Por favor, intenta nuevamente más tarde.";

pub const SEARCHING_NOTICE: &str = "Perfecto, ahora buscaré en la base de datos las opciones \
    de menú que mejor se adapten a tus necesidades...";

pub const APOLOGY_REPLY: &str =
    "Lo siento, hubo un error al procesar tu mensaje. ¿Podrías intentarlo de nuevo?";

/// What one turn appended to the log, plus the connectivity flag.
pub struct TurnOutcome {
    pub connected: bool,
    pub messages: Vec<ChatMessage>,
}

/// Processes one user turn. The session mutex is held for the whole turn,
/// so a second message arriving mid-flight waits its turn instead of
/// interleaving merges.
pub async fn process_turn(state: &Arc<AppState>, input: &str) -> TurnOutcome {
    let input = input.trim();

    let mut session = state.session.lock().await;
    let start = session.messages.len();

    if input.is_empty() {
        return outcome(&session, start);
    }

    // Disconnected session: fixed reply, no network calls, no state change.
    let Some(valid_values) = session.valid_values.clone() else {
        session.push_user(input);
        session.push_assistant(NO_CONNECTION_REPLY);
        return outcome(&session, start);
    };

    session.push_user(input);
    let placeholder = session.push_placeholder();

    let timeout = Duration::from_secs(state.config.llm_timeout_secs);
    let interp = interpreter::interpret(
        state.llm.as_ref(),
        timeout,
        input,
        &session.request,
        &valid_values,
    )
    .await;

    tracing::info!(
        intent = ?interp.intent,
        end = interp.end_conversation,
        "turn interpreted"
    );

    if interp.end_conversation {
        session.resolve_placeholder(&placeholder, &interp.message);
        session.request.clear();
        return outcome(&session, start);
    }

    session.request.merge(&interp.extracted);

    let missing = session.request.missing_fields();
    if !missing.is_empty() {
        let reply = format!("{}{}", interp.message, missing_clause(&missing));
        session.resolve_placeholder(&placeholder, &reply);
        return outcome(&session, start);
    }

    // All seven fields present: search the catalog and compose.
    session.resolve_placeholder(&placeholder, &interp.message);
    session.push_assistant(SEARCHING_NOTICE);
    let searching = session.push_placeholder();

    let filter = OfferingFilter {
        tipo: session.request.tipo_reunion.clone(),
        max_price_per_person: session.request.budget_per_person(),
    };
    let offerings = {
        let db = state.db.lock().unwrap();
        queries::fetch_menu_offerings(&db, &filter)
    };
    let offerings = match offerings {
        Ok(offerings) => offerings,
        Err(e) => {
            tracing::error!(error = %e, "catalog lookup failed");
            session.drop_placeholder(&searching);
            session.push_assistant(APOLOGY_REPLY);
            return outcome(&session, start);
        }
    };

    match recommender::recommend(state.llm.as_ref(), timeout, &offerings, &session.request).await {
        Ok(reply) => session.resolve_placeholder(&searching, &reply),
        Err(e) => {
            tracing::error!(error = %e, "recommendation failed");
            session.drop_placeholder(&searching);
            session.push_assistant(APOLOGY_REPLY);
        }
    }

    outcome(&session, start)
}

/// Clears the session and re-attempts the reference fetch, so a session
/// that started without catalog connectivity can recover on reset.
pub async fn reset_session(state: &Arc<AppState>) -> bool {
    let mut session = state.session.lock().await;
    session.reset();

    let values = {
        let db = state.db.lock().unwrap();
        queries::fetch_valid_values(&db)
    };
    match values {
        Ok(values) => session.valid_values = Some(values),
        Err(e) => {
            tracing::error!(error = %e, "valid values fetch failed on reset");
            session.valid_values = None;
        }
    }

    session.is_connected()
}

fn missing_clause(missing: &[RequiredField]) -> String {
    if missing.len() == 1 {
        format!(
            "\n\nSolo nos falta saber {}. ¿Podrías proporcionármelo?",
            missing[0].label()
        )
    } else {
        let labels = missing
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!("\n\nNos faltan algunos detalles: {labels}. ¿Podrías proporcionármelos?")
    }
}

fn outcome(session: &ChatSession, start: usize) -> TurnOutcome {
    TurnOutcome {
        connected: session.is_connected(),
        messages: session.messages[start..].to_vec(),
    }
}
