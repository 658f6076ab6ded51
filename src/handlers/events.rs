use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthorizedUser;
use crate::models::{EventCategory, EventChanges, NewEvent};
use crate::registry::AppRegistry;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, empty_success, success};

const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub category: Option<String>,
}

/// Shared body for create and update; mirrors the event form fields.
#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub image_url: String,
    pub image_hint: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

struct ValidatedEvent {
    date: NaiveDate,
    category: EventCategory,
}

fn validate_payload(payload: &EventPayload) -> AppResult<ValidatedEvent> {
    if payload.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title is required".to_string()));
    }
    if payload.description.trim().len() < MIN_DESCRIPTION_LEN {
        return Err(AppError::ValidationError(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_LEN
        )));
    }
    if payload.location.trim().is_empty() {
        return Err(AppError::ValidationError("Location is required".to_string()));
    }
    if payload.time.trim().is_empty() {
        return Err(AppError::ValidationError("Time is required".to_string()));
    }
    if payload.image_url.trim().is_empty() {
        return Err(AppError::ValidationError("Image is required".to_string()));
    }
    if payload.image_hint.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Image hint is required".to_string(),
        ));
    }

    let date = NaiveDate::parse_from_str(payload.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError("Date must be YYYY-MM-DD".to_string()))?;

    let category = payload
        .category
        .parse::<EventCategory>()
        .map_err(|_| AppError::ValidationError("Unknown event category".to_string()))?;

    Ok(ValidatedEvent { date, category })
}

fn parse_category_filter(raw: Option<&str>) -> AppResult<Option<EventCategory>> {
    match raw.map(str::trim) {
        // A blank filter means the same as "All": no filter.
        None => Ok(None),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse::<EventCategory>()
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("Unknown event category '{}'", s))),
    }
}

pub async fn list_events(
    State(registry): State<AppRegistry>,
    Query(query): Query<EventListQuery>,
) -> AppResult<Response> {
    let category = parse_category_filter(query.category.as_deref())?;
    let events = registry.event_store().list(category).await?;
    Ok(success(events, "Events fetched"))
}

pub async fn get_event(
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    // Detail views count as a view.
    let event = registry
        .event_store()
        .record_view(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} was not found", event_id)))?;

    Ok(success(event, "Event fetched"))
}

pub async fn create_event(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(payload): Json<EventPayload>,
) -> AppResult<Response> {
    let validated = validate_payload(&payload)?;

    let event = registry
        .event_store()
        .create(NewEvent {
            creator_id: user.id,
            title: payload.title.trim().to_string(),
            description: payload.description.trim().to_string(),
            location: payload.location.trim().to_string(),
            date: validated.date,
            time: payload.time.trim().to_string(),
            category: validated.category,
            image_url: payload.image_url.trim().to_string(),
            image_hint: payload.image_hint.trim().to_string(),
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
        .await?;

    tracing::info!(event_id = %event.id, creator_id = %user.id, "Event created");
    Ok(created(event, "Event created"))
}

pub async fn update_event(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> AppResult<Response> {
    let validated = validate_payload(&payload)?;

    let event = registry
        .event_store()
        .update(
            event_id,
            user.id,
            EventChanges {
                title: payload.title.trim().to_string(),
                description: payload.description.trim().to_string(),
                location: payload.location.trim().to_string(),
                date: validated.date,
                time: payload.time.trim().to_string(),
                category: validated.category,
                image_url: payload.image_url.trim().to_string(),
                image_hint: payload.image_hint.trim().to_string(),
                latitude: payload.latitude,
                longitude: payload.longitude,
            },
        )
        .await?;

    Ok(success(event, "Event updated"))
}

pub async fn delete_event(
    AuthorizedUser(user): AuthorizedUser,
    State(registry): State<AppRegistry>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    registry.event_store().delete(event_id, user.id).await?;

    tracing::info!(event_id = %event_id, "Event deleted");
    Ok(empty_success("Event deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> EventPayload {
        EventPayload {
            title: "Indie Rock Night".to_string(),
            description: "An unforgettable evening of indie rock".to_string(),
            location: "The Underground, New York, NY".to_string(),
            date: "2026-09-15".to_string(),
            time: "8:00 PM".to_string(),
            category: "Rock".to_string(),
            image_url: "https://example.com/poster.jpg".to_string(),
            image_hint: "rock band".to_string(),
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
        }
    }

    #[test]
    fn accepts_a_complete_payload() {
        let validated = validate_payload(&valid_payload()).unwrap();
        assert_eq!(validated.category, EventCategory::Rock);
        assert_eq!(
            validated.date,
            NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
        );
    }

    #[test]
    fn rejects_blank_title() {
        let mut payload = valid_payload();
        payload.title = "   ".to_string();
        assert!(matches!(
            validate_payload(&payload),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_short_description() {
        let mut payload = valid_payload();
        payload.description = "too short".to_string().chars().take(5).collect();
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn rejects_malformed_date() {
        let mut payload = valid_payload();
        payload.date = "15/09/2026".to_string();
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn rejects_unknown_category() {
        let mut payload = valid_payload();
        payload.category = "Jazz".to_string();
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn category_filter_treats_all_as_no_filter() {
        assert_eq!(parse_category_filter(Some("All")).unwrap(), None);
        assert_eq!(parse_category_filter(None).unwrap(), None);
        assert_eq!(parse_category_filter(Some("")).unwrap(), None);
        assert_eq!(parse_category_filter(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_category_filter(Some("Electronic")).unwrap(),
            Some(EventCategory::Electronic)
        );
        assert!(parse_category_filter(Some("Jazz")).is_err());
    }
}
