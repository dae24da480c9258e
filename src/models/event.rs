use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Wire format of `event_begin`.
pub const EVENT_BEGIN_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An event row joined with the name of its area.
///
/// `area_name` is read through the area reference and cannot be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub max_tickets: Option<i64>,
    pub ticket_price: Option<f64>,
    pub status: String,
    pub event_begin: DateTime<Utc>,
    pub event_manager: Option<Uuid>,
    pub area_id: Option<Uuid>,
    pub area_name: Option<String>,
}

impl Event {
    pub fn event_begin_string(&self) -> String {
        format_event_begin(&self.event_begin)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub max_tickets: Option<i64>,
    pub ticket_price: Option<f64>,
    pub status: String,
    pub event_begin: DateTime<Utc>,
    pub event_manager: Option<Uuid>,
    pub area_id: Option<Uuid>,
}

/// Body accepted by POST and PUT once it has passed the event schema.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub name: String,
    pub status: String,
    pub event_begin: String,
    pub area_name: String,
    #[serde(default)]
    pub max_tickets: Option<i64>,
    #[serde(default)]
    pub ticket_price: Option<f64>,
}

pub fn parse_event_begin(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, EVENT_BEGIN_FORMAT).map(|naive| naive.and_utc())
}

pub fn format_event_begin(value: &DateTime<Utc>) -> String {
    value.format(EVENT_BEGIN_FORMAT).to_string()
}
