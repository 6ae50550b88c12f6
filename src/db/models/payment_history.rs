//! Payment history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A payment made for a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaymentHistory {
    pub id: String,
    pub room_id: String,
    /// Renter name at the time of payment
    pub renter: String,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
    /// Period covered by the payment
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
