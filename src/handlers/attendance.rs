use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthorizedUser;
use crate::registry::AppRegistry;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
struct AttendanceStatus {
    attending: bool,
    attendee_count: i64,
}

#[derive(Serialize)]
struct AttendingEvents {
    event_ids: Vec<Uuid>,
}

async fn ensure_event_exists(registry: &AppRegistry, event_id: Uuid) -> AppResult<()> {
    registry
        .event_store()
        .find(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} was not found", event_id)))?;
    Ok(())
}

/// Join is idempotent; attending an event twice is not an error.
pub async fn join_event(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    ensure_event_exists(&registry, event_id).await?;
    registry.attendance_store().join(event_id, user.id).await?;

    tracing::info!(event_id = %event_id, user_id = %user.id, "User attending event");
    Ok(empty_success("You are attending this event"))
}

/// Leave is idempotent; leaving an event never joined is a no-op.
pub async fn leave_event(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    ensure_event_exists(&registry, event_id).await?;
    registry.attendance_store().leave(event_id, user.id).await?;

    tracing::info!(event_id = %event_id, user_id = %user.id, "User left event");
    Ok(empty_success("You are no longer attending this event"))
}

pub async fn attendance_status(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    ensure_event_exists(&registry, event_id).await?;

    let store = registry.attendance_store();
    let status = AttendanceStatus {
        attending: store.is_attending(event_id, user.id).await?,
        attendee_count: store.attendee_count(event_id).await?,
    };

    Ok(success(status, "Attendance status"))
}

/// The caller's full attending-set in one batched query.
pub async fn my_attending(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    let ids = registry
        .attendance_store()
        .attending_event_ids(user.id)
        .await?;

    let mut event_ids: Vec<Uuid> = ids.into_iter().collect();
    event_ids.sort();

    Ok(success(AttendingEvents { event_ids }, "Attending events"))
}
