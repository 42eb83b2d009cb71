use axum::extract::FromRequest;

use crate::error::LunchError;

/// `Json` body extractor whose rejections use the API error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(LunchError))]
pub struct ApiJson<T>(pub T);
