pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod services;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::db::{SqlitePaymentHistoryStore, SqliteRoomStore};
use crate::services::{DefaultRoomService, RoomService};

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub tokens: Arc<TokenCodec>,
    pub rooms: Arc<dyn RoomService>,
}

impl AppState {
    /// Wire the SQLite-backed stores and services around `db`
    pub fn new(config: Config, db: DbPool) -> Self {
        let rooms = Arc::new(DefaultRoomService::new(
            Arc::new(SqliteRoomStore::new(db.clone())),
            Arc::new(SqlitePaymentHistoryStore::new(db.clone())),
        ));
        let tokens = Arc::new(TokenCodec::from_config(&config.auth));
        Self {
            config,
            db,
            tokens,
            rooms,
        }
    }

    /// Replace the room service, e.g. with a fake in tests
    pub fn with_room_service(mut self, rooms: Arc<dyn RoomService>) -> Self {
        self.rooms = rooms;
        self
    }
}
