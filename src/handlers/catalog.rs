use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::queries::{self, OfferingFilter};
use crate::errors::AppError;
use crate::models::{MenuOffering, ValidValueSet};
use crate::state::AppState;

pub async fn valid_values(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValidValueSet>, AppError> {
    let db = state.db.lock().unwrap();
    let values = queries::fetch_valid_values(&db)?;
    Ok(Json(values))
}

#[derive(Deserialize)]
pub struct MenuItemsQuery {
    pub tipo: Option<String>,
    pub presupuesto: Option<f64>,
    pub asistentes: Option<u32>,
}

/// Raw filtered catalog rows, ascending by price. The price ceiling is only
/// applied when both budget and attendee count are given.
pub async fn menu_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuItemsQuery>,
) -> Result<Json<Vec<MenuOffering>>, AppError> {
    let max_price_per_person = match (query.presupuesto, query.asistentes) {
        (Some(budget), Some(attendees)) if attendees > 0 => Some(budget / attendees as f64),
        _ => None,
    };

    let filter = OfferingFilter {
        tipo: query.tipo,
        max_price_per_person,
    };

    let db = state.db.lock().unwrap();
    let offerings = queries::fetch_menu_offerings(&db, &filter)?;
    Ok(Json(offerings))
}
