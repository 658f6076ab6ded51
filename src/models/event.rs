use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed category enumeration events are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
pub enum EventCategory {
    Rock,
    Pop,
    Electronic,
}

impl EventCategory {
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Rock,
        EventCategory::Pop,
        EventCategory::Electronic,
    ];
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventCategory::Rock => "Rock",
            EventCategory::Pop => "Pop",
            EventCategory::Electronic => "Electronic",
        };
        f.write_str(name)
    }
}

impl FromStr for EventCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rock" => Ok(EventCategory::Rock),
            "pop" => Ok(EventCategory::Pop),
            "electronic" => Ok(EventCategory::Electronic),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    /// Display time as entered by the creator, e.g. "8:00 PM".
    pub time: String,
    pub category: EventCategory,
    pub image_url: String,
    pub image_hint: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    /// Number of attendance rows, joined in by the list/detail queries.
    pub attendee_count: i64,
}

/// Write model for event creation.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub category: EventCategory,
    pub image_url: String,
    pub image_hint: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Write model for event updates; every field is replaced.
#[derive(Debug, Clone)]
pub struct EventChanges {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub category: EventCategory,
    pub image_url: String,
    pub image_hint: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
