pub mod auth;
mod json;
pub mod response;
mod rooms;
mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new().route("/login", post(auth::login));

    // Protected API routes
    let api_routes = Router::new()
        .route("/me", get(auth::me))
        // Rooms
        .route("/rooms", get(rooms::list_rooms))
        .route("/rooms/:id", get(rooms::get_room))
        .route("/rooms/:id/renter", put(rooms::update_renter))
        .route("/rooms/:id/extend", post(rooms::extend_stay))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
