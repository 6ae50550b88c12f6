use axum::extract::{Path, State};
use std::sync::Arc;

use super::auth::AuthUser;
use super::json::Json;
use super::response::ApiResponse;
use super::validation::validate_renter_request;
use crate::context::RequestContext;
use crate::db::{ExtendStayRequest, UpdateRenterRequest};
use crate::AppState;

pub(super) fn request_context(state: &AppState) -> RequestContext {
    RequestContext::with_timeout(state.config.database.query_timeout())
}

pub async fn list_rooms(State(state): State<Arc<AppState>>) -> ApiResponse {
    let ctx = request_context(&state);
    let _guard = ctx.drop_guard();

    state.rooms.get_all_rooms(&ctx).await
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResponse {
    let ctx = request_context(&state);
    let _guard = ctx.drop_guard();

    state.rooms.get_detailed_room(&ctx, &room_id).await
}

pub async fn update_renter(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room_id): Path<String>,
    Json(request): Json<UpdateRenterRequest>,
) -> ApiResponse {
    if let Err(e) = validate_renter_request(&request) {
        return e;
    }

    let ctx = request_context(&state);
    let _guard = ctx.drop_guard();

    tracing::info!(room_id = %room_id, user_id = %user.id, "updating renter");
    state
        .rooms
        .update_renter(&ctx, request.into_update(room_id))
        .await
}

pub async fn extend_stay(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room_id): Path<String>,
    Json(request): Json<ExtendStayRequest>,
) -> ApiResponse {
    let ctx = request_context(&state);
    let _guard = ctx.drop_guard();

    tracing::info!(room_id = %room_id, user_id = %user.id, "extending stay");
    state
        .rooms
        .extend_stay(&ctx, request.into_extension(room_id))
        .await
}
