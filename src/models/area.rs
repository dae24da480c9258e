use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::DEFAULT_COUNTRY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArea {
    pub name: String,
    pub country: String,
}

/// Body accepted by POST and PUT once it has passed the area schema.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaPayload {
    pub name: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl From<AreaPayload> for NewArea {
    fn from(payload: AreaPayload) -> Self {
        Self {
            name: payload.name,
            country: payload.country,
        }
    }
}
