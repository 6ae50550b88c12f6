//! Database models split into domain-specific modules.

pub mod payment_history;
pub mod room;
pub mod user;

pub use payment_history::*;
pub use room::*;
pub use user::*;
