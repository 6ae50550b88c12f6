//! Business logic sitting between HTTP handlers and the stores.

mod rooms;

pub use rooms::{DefaultRoomService, RoomService};
