use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.board.store_name();
    match state.board.check_store().await {
        Ok(rows) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "store": store, "rows": rows })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "store": store, "error": e.to_string() })),
        ),
    }
}
