use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;

use crate::{
    error::LunchError,
    middleware::{admin::AdminKey, json::ApiJson},
    models::{
        entry::{Entry, PublishMenuRequest},
        summary::MenuView,
    },
    services::lunch::LunchBoard,
    AppState,
};

/// GET /menus/{date}
pub async fn get_menu(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<MenuView> {
    let meal_name = state.board.menu_for(date).await;
    Json(MenuView { date, meal_name })
}

/// PUT /menus — admin only, date defaults to today
pub async fn publish_menu(
    State(state): State<AppState>,
    AdminKey(key): AdminKey,
    ApiJson(body): ApiJson<PublishMenuRequest>,
) -> Result<Json<Entry>, LunchError> {
    let date = body.date.unwrap_or_else(LunchBoard::today);
    state
        .board
        .publish_menu(date, &body.meal_name, &key)
        .await
        .map(Json)
}
