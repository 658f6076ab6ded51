use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::utils::error::AppResult;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Marks `user_id` as attending `event_id`; joining twice is a no-op.
    async fn join(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;
    /// Removes the attendance record; leaving twice is a no-op.
    async fn leave(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;
    async fn is_attending(&self, event_id: Uuid, user_id: Uuid) -> AppResult<bool>;
    /// The full attending-set of a user in one query; callers intersect with
    /// whatever event list they have loaded.
    async fn attending_event_ids(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>>;
    async fn attendee_count(&self, event_id: Uuid) -> AppResult<i64>;
}

pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn join(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance (event_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn leave(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM attendance WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn is_attending(&self, event_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let attending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(attending)
    }

    async fn attending_event_ids(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT event_id FROM attendance WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn attendee_count(&self, event_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
