//! Payment history lookups.

use async_trait::async_trait;

use super::{DbPool, PaymentHistory, StoreError};
use crate::context::RequestContext;

#[async_trait]
pub trait PaymentHistoryStore: Send + Sync {
    /// Payments for a room, oldest first. Unknown rooms yield an empty vec.
    async fn fetch_all_by_room_id(
        &self,
        ctx: &RequestContext,
        room_id: &str,
    ) -> Result<Vec<PaymentHistory>, StoreError>;
}

pub struct SqlitePaymentHistoryStore {
    db: DbPool,
}

impl SqlitePaymentHistoryStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentHistoryStore for SqlitePaymentHistoryStore {
    async fn fetch_all_by_room_id(
        &self,
        ctx: &RequestContext,
        room_id: &str,
    ) -> Result<Vec<PaymentHistory>, StoreError> {
        ctx.run(
            sqlx::query_as::<_, PaymentHistory>(
                r#"
                SELECT id, room_id, renter, amount, paid_at, period_start, period_end, created_at
                FROM payment_histories
                WHERE room_id = ?
                ORDER BY paid_at ASC, created_at ASC
                "#,
            )
            .bind(room_id)
            .fetch_all(&self.db),
        )
        .await
    }
}
