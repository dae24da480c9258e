use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub reservation_id: Uuid,
    /// Free-text category such as "VIP".
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub ticket_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub reservation_id: Uuid,
    pub ticket_type: Option<String>,
}
