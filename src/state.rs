use std::sync::Arc;

use sqlx::SqlitePool;

use crate::schema::{SchemaError, SchemaRegistry};

/// Everything a handler needs, built once at startup and shared by clone.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub schemas: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Result<Self, SchemaError> {
        Ok(Self {
            db,
            schemas: Arc::new(SchemaRegistry::new()?),
        })
    }
}
