use thiserror::Error;

/// Storage failures, with constraint violations split out so handlers can
/// turn them into client-facing status codes.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let message = db_err.message().to_string();
            if db_err.is_unique_violation() {
                return DbError::UniqueViolation(message);
            }
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKeyViolation(message);
            }
            if db_err.is_check_violation() {
                return DbError::CheckViolation(message);
            }
        }
        DbError::Sqlx(err)
    }
}
