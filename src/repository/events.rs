use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, EventCategory, EventChanges, NewEvent};
use crate::utils::error::{AppError, AppResult};

/// Every SELECT carries the attendance count so the API never has to fetch
/// counts event by event.
const EVENT_COLUMNS: &str = r#"
    e.id, e.creator_id, e.title, e.description, e.location, e.date, e.time,
    e.category, e.image_url, e.image_hint, e.latitude, e.longitude,
    e.view_count, e.created_at,
    (SELECT COUNT(*) FROM attendance a WHERE a.event_id = e.id) AS attendee_count
"#;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Lists events, newest first, optionally filtered by category.
    async fn list(&self, category: Option<EventCategory>) -> AppResult<Vec<Event>>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Event>>;
    /// Fetches an event and bumps its view counter in the same statement.
    async fn record_view(&self, id: Uuid) -> AppResult<Option<Event>>;
    async fn create(&self, event: NewEvent) -> AppResult<Event>;
    /// Replaces an event's fields. Fails with Forbidden if `requester` is not
    /// the creator, NotFound if the event does not exist.
    async fn update(&self, id: Uuid, requester: Uuid, changes: EventChanges) -> AppResult<Event>;
    /// Deletes an event; attendance rows cascade. Same ownership rules as
    /// `update`.
    async fn delete(&self, id: Uuid, requester: Uuid) -> AppResult<()>;
}

pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn creator_of(&self, id: Uuid) -> AppResult<Option<Uuid>> {
        let creator = sqlx::query_scalar::<_, Uuid>("SELECT creator_id FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(creator)
    }

    /// NotFound / Forbidden mapping shared by update and delete.
    async fn check_ownership(&self, id: Uuid, requester: Uuid) -> AppResult<()> {
        match self.creator_of(id).await? {
            None => Err(AppError::NotFound(format!("Event {} was not found", id))),
            Some(creator) if creator != requester => Err(AppError::Forbidden(
                "Only the event creator can modify this event".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self, category: Option<EventCategory>) -> AppResult<Vec<Event>> {
        let events = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM events e WHERE e.category = $1 ORDER BY e.created_at DESC"
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {EVENT_COLUMNS} FROM events e ORDER BY e.created_at DESC");
                sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(events)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<Event>> {
        let sql = format!(
            r#"
            WITH viewed AS (
                UPDATE events SET view_count = view_count + 1
                WHERE id = $1
                RETURNING *
            )
            SELECT {EVENT_COLUMNS} FROM viewed e
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO events
                    (creator_id, title, description, location, date, time,
                     category, image_url, image_hint, latitude, longitude)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT {EVENT_COLUMNS} FROM inserted e
            "#
        );
        let created = sqlx::query_as::<_, Event>(&sql)
            .bind(event.creator_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(&event.time)
            .bind(event.category)
            .bind(&event.image_url)
            .bind(&event.image_hint)
            .bind(event.latitude)
            .bind(event.longitude)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, requester: Uuid, changes: EventChanges) -> AppResult<Event> {
        self.check_ownership(id, requester).await?;

        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE events SET
                    title = $2, description = $3, location = $4, date = $5,
                    time = $6, category = $7, image_url = $8, image_hint = $9,
                    latitude = $10, longitude = $11
                WHERE id = $1
                RETURNING *
            )
            SELECT {EVENT_COLUMNS} FROM updated e
            "#
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.location)
            .bind(changes.date)
            .bind(&changes.time)
            .bind(changes.category)
            .bind(&changes.image_url)
            .bind(&changes.image_hint)
            .bind(changes.latitude)
            .bind(changes.longitude)
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid, requester: Uuid) -> AppResult<()> {
        self.check_ownership(id, requester).await?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
