//! Room persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{DbPool, Room, StoreError, UpdateRenter};
use crate::context::RequestContext;

const ROOM_COLUMNS: &str = "id, room_number, room_image, renter, id_card, price, \
     already_paid_this_month, available, first_check_in, check_in, check_out, \
     created_at, updated_at, deleted_at";

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// All live rooms ordered by room number. An empty table yields an empty vec.
    async fn fetch_all(&self, ctx: &RequestContext) -> Result<Vec<Room>, StoreError>;

    /// `Ok(None)` when no room has this id.
    async fn fetch_one(&self, ctx: &RequestContext, id: &str) -> Result<Option<Room>, StoreError>;

    /// Set renter and ID card, returning the room as stored afterwards.
    async fn update_renter(
        &self,
        ctx: &RequestContext,
        update: &UpdateRenter,
    ) -> Result<Option<Room>, StoreError>;

    /// Mark the room paid for the current period and move its stay window.
    async fn extend_stay(
        &self,
        ctx: &RequestContext,
        id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Option<Room>, StoreError>;
}

pub struct SqliteRoomStore {
    db: DbPool,
}

impl SqliteRoomStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

async fn select_room(db: &DbPool, id: &str) -> Result<Option<Room>, sqlx::Error> {
    let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ? AND deleted_at IS NULL");
    sqlx::query_as::<_, Room>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

#[async_trait]
impl RoomStore for SqliteRoomStore {
    async fn fetch_all(&self, ctx: &RequestContext) -> Result<Vec<Room>, StoreError> {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE deleted_at IS NULL ORDER BY room_number ASC"
        );
        ctx.run(sqlx::query_as::<_, Room>(&sql).fetch_all(&self.db))
            .await
    }

    async fn fetch_one(&self, ctx: &RequestContext, id: &str) -> Result<Option<Room>, StoreError> {
        ctx.run(select_room(&self.db, id)).await
    }

    async fn update_renter(
        &self,
        ctx: &RequestContext,
        update: &UpdateRenter,
    ) -> Result<Option<Room>, StoreError> {
        ctx.run(async {
            sqlx::query(
                r#"
                UPDATE rooms
                SET renter = ?, id_card = ?, updated_at = ?
                WHERE id = ? AND deleted_at IS NULL
                "#,
            )
            .bind(&update.renter)
            .bind(&update.id_card)
            .bind(Utc::now())
            .bind(&update.id)
            .execute(&self.db)
            .await?;

            select_room(&self.db, &update.id).await
        })
        .await
    }

    async fn extend_stay(
        &self,
        ctx: &RequestContext,
        id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Option<Room>, StoreError> {
        ctx.run(async {
            sqlx::query(
                r#"
                UPDATE rooms
                SET already_paid_this_month = 1,
                    check_in = ?,
                    check_out = ?,
                    first_check_in = COALESCE(first_check_in, ?),
                    updated_at = ?
                WHERE id = ? AND deleted_at IS NULL
                "#,
            )
            .bind(check_in)
            .bind(check_out)
            .bind(check_in)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db)
            .await?;

            select_room(&self.db, id).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::TimeZone;

    async fn insert_room(db: &DbPool, id: &str, number: i64) {
        sqlx::query("INSERT INTO rooms (id, room_number, price) VALUES (?, ?, ?)")
            .bind(id)
            .bind(number)
            .bind(1_000_000_i64)
            .execute(db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_all_empty_table() {
        let store = SqliteRoomStore::new(test_pool().await);
        let rooms = store.fetch_all(&RequestContext::new()).await.unwrap();
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_sorted_by_room_number() {
        let db = test_pool().await;
        insert_room(&db, "c", 12).await;
        insert_room(&db, "a", 2).await;
        insert_room(&db, "b", 7).await;

        let store = SqliteRoomStore::new(db);
        let numbers: Vec<i64> = store
            .fetch_all(&RequestContext::new())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.room_number)
            .collect();
        assert_eq!(numbers, vec![2, 7, 12]);
    }

    #[tokio::test]
    async fn test_soft_deleted_rooms_are_hidden() {
        let db = test_pool().await;
        insert_room(&db, "gone", 1).await;
        insert_room(&db, "here", 2).await;
        sqlx::query("UPDATE rooms SET deleted_at = ? WHERE id = 'gone'")
            .bind(Utc::now())
            .execute(&db)
            .await
            .unwrap();

        let store = SqliteRoomStore::new(db);
        let ctx = RequestContext::new();
        assert_eq!(store.fetch_all(&ctx).await.unwrap().len(), 1);
        assert!(store.fetch_one(&ctx, "gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_one_unknown_is_none() {
        let store = SqliteRoomStore::new(test_pool().await);
        let room = store.fetch_one(&RequestContext::new(), "missing").await.unwrap();
        assert!(room.is_none());
    }

    #[tokio::test]
    async fn test_update_renter_persists() {
        let db = test_pool().await;
        insert_room(&db, "room-1", 101).await;
        let store = SqliteRoomStore::new(db);
        let ctx = RequestContext::new();

        let update = UpdateRenter {
            id: "room-1".to_string(),
            renter: "Siti".to_string(),
            id_card: "3174-1234".to_string(),
        };
        let updated = store.update_renter(&ctx, &update).await.unwrap().unwrap();
        assert_eq!(updated.renter.as_deref(), Some("Siti"));

        let fetched = store.fetch_one(&ctx, "room-1").await.unwrap().unwrap();
        assert_eq!(fetched.renter.as_deref(), Some("Siti"));
        assert_eq!(fetched.id_card.as_deref(), Some("3174-1234"));
    }

    #[tokio::test]
    async fn test_update_renter_unknown_room() {
        let store = SqliteRoomStore::new(test_pool().await);
        let update = UpdateRenter {
            id: "missing".to_string(),
            renter: "Siti".to_string(),
            id_card: "3174-1234".to_string(),
        };
        let result = store.update_renter(&RequestContext::new(), &update).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_extend_stay_marks_paid_and_moves_window() {
        let db = test_pool().await;
        insert_room(&db, "room-1", 101).await;
        let store = SqliteRoomStore::new(db);
        let ctx = RequestContext::new();

        let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap();
        store
            .extend_stay(&ctx, "room-1", check_in, check_out)
            .await
            .unwrap()
            .unwrap();

        let room = store.fetch_one(&ctx, "room-1").await.unwrap().unwrap();
        assert!(room.already_paid_this_month);
        assert_eq!(room.check_in, Some(check_in));
        assert_eq!(room.check_out, Some(check_out));
        assert_eq!(room.first_check_in, Some(check_in));

        // A later extension keeps the original first check-in
        let next_out = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let room = store
            .extend_stay(&ctx, "room-1", check_out, next_out)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.first_check_in, Some(check_in));
        assert_eq!(room.check_in, Some(check_out));
    }

    #[tokio::test]
    async fn test_extend_stay_unknown_room() {
        let store = SqliteRoomStore::new(test_pool().await);
        let now = Utc::now();
        let result = store
            .extend_stay(&RequestContext::new(), "missing", now, now)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts_query() {
        let store = SqliteRoomStore::new(test_pool().await);
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = store.fetch_all(&ctx).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_store_error() {
        let db = test_pool().await;
        db.close().await;

        let store = SqliteRoomStore::new(db);
        let err = store.fetch_all(&RequestContext::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
