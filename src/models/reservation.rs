use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}
