use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::{get, post}};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/vocabulary", get(handlers::vocabulary_page))
        .route("/stats", get(handlers::stats_page))
        .route("/practice", get(handlers::practice_page))
        .route("/theme/toggle", post(handlers::toggle_theme))
        .route("/api/feed", get(handlers::api_feed))
        .route("/api/vocabulary", get(handlers::api_vocabulary))
        .route("/api/stats", get(handlers::api_stats))
        .route("/api/theme", get(handlers::get_theme).post(handlers::update_theme))
        .with_state(state)
}
