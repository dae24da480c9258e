use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use super::policy::{self, Key, Table};
use super::DbResult;
use crate::models::{NewUser, User};

const SELECT_USER: &str =
    "SELECT id, first_name, last_name, birth_date, email, nationality FROM users";

pub async fn insert(conn: &mut SqliteConnection, input: &NewUser) -> DbResult<User> {
    let user = User {
        id: Uuid::new_v4(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        birth_date: input.birth_date,
        email: input.email.clone(),
        nationality: input.nationality.clone(),
    };

    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, birth_date, email, nationality) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.birth_date)
    .bind(&user.email)
    .bind(&user.nationality)
    .execute(conn)
    .await?;

    info!(user_id = %user.id, "Created user");
    Ok(user)
}

pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> DbResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?"))
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> DbResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Deletes the user with their reservations. Events they managed stay unmanaged.
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> DbResult<bool> {
    let removed = policy::delete_where(conn, Table::Users, "id", &Key::Id(id)).await?;
    if removed > 0 {
        info!(user_id = %id, "Deleted user");
    }
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
