use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::LunchError,
    middleware::json::ApiJson,
    models::{
        entry::{Entry, SubmitRatingRequest},
        summary::TodayView,
    },
    services::lunch::LunchBoard,
    AppState,
};

/// GET /today — today's meal and ratings; `rating_open` is false until a menu is set
pub async fn get_today(State(state): State<AppState>) -> Json<TodayView> {
    let summary = state.board.day_summary(LunchBoard::today()).await;
    let rating_open = summary.meal_name.is_some();
    let published_dates = if rating_open {
        Vec::new()
    } else {
        state.board.history().await
    };
    Json(TodayView {
        summary,
        rating_open,
        published_dates,
    })
}

/// POST /ratings — rate today's meal
pub async fn submit_rating(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitRatingRequest>,
) -> Result<(StatusCode, Json<Entry>), LunchError> {
    let entry = state
        .board
        .submit_rating(
            LunchBoard::today(),
            &body.user_name,
            body.score,
            body.comment.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
