use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;
use crate::handlers::{duplicates, farms, users, varieties};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/duplicates",
            get(duplicates::scan_duplicates).delete(duplicates::apply_duplicates),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/farms", get(farms::list_farms).post(farms::create_farm))
        .route(
            "/farms/{id}",
            put(farms::update_farm).delete(farms::delete_farm),
        )
        .route("/varieties/stats", get(varieties::variety_stats))
}
