pub mod health;
pub mod history;
pub mod menu;
pub mod metrics;
pub mod ratings;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Full application router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    // Allow the configured base URL and its subdomains; localhost is always allowed.
    let base = state.config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        if o == base {
            return true;
        }
        if let Some(idx) = base.find("://") {
            let after_scheme = &base[idx + 3..];
            let domain = after_scheme.split('/').next().unwrap_or(after_scheme);
            let domain_clean = domain.split(':').next().unwrap_or(domain);
            if o.ends_with(&format!(".{domain_clean}")) {
                return true;
            }
        }
        false
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-admin-key"),
        ]))
        .allow_origin(cors_origin);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/today", get(ratings::get_today))
        .route("/ratings", post(ratings::submit_rating))
        .route("/menus", put(menu::publish_menu))
        .route("/menus/{date}", get(menu::get_menu))
        .route("/history", get(history::list_dates))
        .route("/history/{date}", get(history::get_day))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
