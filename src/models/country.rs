use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Keyed by its name. Owns areas; users reference it weakly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub country: String,
    pub timezone: Option<String>,
    pub currency: Option<String>,
}
