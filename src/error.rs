use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum LunchError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid admin credential")]
    Unauthorized,

    #[error("No menu has been published for {0}")]
    NoMenuPublished(NaiveDate),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<JsonRejection> for LunchError {
    fn from(rejection: JsonRejection) -> Self {
        LunchError::InvalidInput(rejection.body_text())
    }
}

impl LunchError {
    pub fn code(&self) -> &'static str {
        match self {
            LunchError::InvalidInput(_) => "invalid_input",
            LunchError::Unauthorized => "unauthorized",
            LunchError::NoMenuPublished(_) => "no_menu_published",
            LunchError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            LunchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LunchError::Unauthorized => StatusCode::UNAUTHORIZED,
            LunchError::NoMenuPublished(_) => StatusCode::CONFLICT,
            LunchError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for LunchError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Backend details stay in the logs.
        let message = match &self {
            LunchError::StoreUnavailable(_) => "Could not save, please try again later".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message, "code": self.code() }))).into_response()
    }
}
