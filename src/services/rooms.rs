//! Room service: store orchestration and error translation.
//!
//! Every operation answers with an [`ApiResponse`]. Store failures are logged
//! with their full cause and turned into a 500 carrying only the generic
//! message; a missing room becomes a 404.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::response::ApiResponse;
use crate::context::RequestContext;
use crate::db::{
    DetailedRoom, ExtendStay, PaymentHistoryStore, RoomStore, StoreError, UpdateRenter,
};

pub const ROOM_NOT_FOUND: &str = "room not found!";
pub const INVALID_STAY: &str = "check out must not precede check in";

#[async_trait]
pub trait RoomService: Send + Sync {
    async fn get_all_rooms(&self, ctx: &RequestContext) -> ApiResponse;
    async fn get_detailed_room(&self, ctx: &RequestContext, room_id: &str) -> ApiResponse;
    async fn update_renter(&self, ctx: &RequestContext, payload: UpdateRenter) -> ApiResponse;
    async fn extend_stay(&self, ctx: &RequestContext, payload: ExtendStay) -> ApiResponse;
}

pub struct DefaultRoomService {
    rooms: Arc<dyn RoomStore>,
    payments: Arc<dyn PaymentHistoryStore>,
}

impl DefaultRoomService {
    pub fn new(rooms: Arc<dyn RoomStore>, payments: Arc<dyn PaymentHistoryStore>) -> Self {
        Self { rooms, payments }
    }
}

/// Log a store failure and hide it behind a 500
fn internal(operation: &str, err: StoreError) -> ApiResponse {
    match err {
        // The caller is gone; nobody will read this response
        StoreError::Cancelled => debug!(operation, "request cancelled"),
        err => error!(operation, error = %err, "store operation failed"),
    }
    ApiResponse::internal()
}

#[async_trait]
impl RoomService for DefaultRoomService {
    async fn get_all_rooms(&self, ctx: &RequestContext) -> ApiResponse {
        match self.rooms.fetch_all(ctx).await {
            Ok(rooms) => ApiResponse::ok(&rooms),
            Err(e) => internal("fetch rooms", e),
        }
    }

    async fn get_detailed_room(&self, ctx: &RequestContext, room_id: &str) -> ApiResponse {
        let room = match self.rooms.fetch_one(ctx, room_id).await {
            Ok(Some(room)) => room,
            Ok(None) => return ApiResponse::not_found(ROOM_NOT_FOUND),
            Err(e) => return internal("fetch room", e),
        };

        let history = match self.payments.fetch_all_by_room_id(ctx, room_id).await {
            Ok(history) => history,
            Err(e) => return internal("fetch payment histories", e),
        };

        ApiResponse::ok(&DetailedRoom::new(room, history))
    }

    async fn update_renter(&self, ctx: &RequestContext, payload: UpdateRenter) -> ApiResponse {
        match self.rooms.update_renter(ctx, &payload).await {
            Ok(Some(room)) => ApiResponse::ok(&room),
            Ok(None) => ApiResponse::not_found(ROOM_NOT_FOUND),
            Err(e) => internal("update renter", e),
        }
    }

    async fn extend_stay(&self, ctx: &RequestContext, payload: ExtendStay) -> ApiResponse {
        if !payload.is_valid_period() {
            return ApiResponse::bad_request(INVALID_STAY);
        }

        match self
            .rooms
            .extend_stay(ctx, &payload.id, payload.check_in, payload.check_out)
            .await
        {
            Ok(Some(room)) => ApiResponse::ok(&room),
            Ok(None) => ApiResponse::not_found(ROOM_NOT_FOUND),
            Err(e) => internal("extend stay", e),
        }
    }
}
