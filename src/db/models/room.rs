//! Room and stay models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::PaymentHistory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub room_number: i64,
    pub room_image: Option<String>,
    pub renter: Option<String>,
    /// Renter's ID card reference. Only exposed through [`DetailedRoom`].
    #[serde(skip_serializing, default)]
    pub id_card: Option<String>,
    pub price: i64,
    pub already_paid_this_month: bool,
    pub available: bool,
    pub first_check_in: Option<DateTime<Utc>>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A room together with its ID card and payment history.
///
/// Assembled per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRoom {
    pub id: String,
    pub id_card: Option<String>,
    pub room_image: Option<String>,
    pub room_number: i64,
    pub renter: Option<String>,
    pub price: i64,
    pub already_paid_this_month: bool,
    pub available: bool,
    pub first_check_in: Option<DateTime<Utc>>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub payment_history: Vec<PaymentHistory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DetailedRoom {
    pub fn new(room: Room, payment_history: Vec<PaymentHistory>) -> Self {
        Self {
            id: room.id,
            id_card: room.id_card,
            room_image: room.room_image,
            room_number: room.room_number,
            renter: room.renter,
            price: room.price,
            already_paid_this_month: room.already_paid_this_month,
            available: room.available,
            first_check_in: room.first_check_in,
            check_in: room.check_in,
            check_out: room.check_out,
            payment_history,
            created_at: room.created_at,
            updated_at: room.updated_at,
            deleted_at: room.deleted_at,
        }
    }
}

/// New renter details for a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRenter {
    pub id: String,
    pub renter: String,
    pub id_card: String,
}

/// Body of `PUT /api/rooms/:id/renter`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRenterRequest {
    pub renter: String,
    pub id_card: String,
}

impl UpdateRenterRequest {
    /// Surrounding whitespace is dropped from both fields
    pub fn into_update(self, id: String) -> UpdateRenter {
        UpdateRenter {
            id,
            renter: self.renter.trim().to_string(),
            id_card: self.id_card.trim().to_string(),
        }
    }
}

/// New stay period for a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendStay {
    pub id: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl ExtendStay {
    /// Check-out may equal check-in but never precede it
    pub fn is_valid_period(&self) -> bool {
        self.check_out >= self.check_in
    }
}

/// Body of `POST /api/rooms/:id/extend`
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendStayRequest {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl ExtendStayRequest {
    pub fn into_extension(self, id: String) -> ExtendStay {
        ExtendStay {
            id,
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}
