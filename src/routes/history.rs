use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;

use crate::{models::summary::DaySummary, AppState};

/// GET /history — dates with a published menu, newest first
pub async fn list_dates(State(state): State<AppState>) -> Json<Vec<NaiveDate>> {
    Json(state.board.history().await)
}

/// GET /history/{date}
pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<DaySummary> {
    Json(state.board.day_summary(date).await)
}
