use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use super::policy::{self, Key, Table};
use super::DbResult;
use crate::models::{Area, NewArea};

const SELECT_AREA: &str = "SELECT id, name, country FROM areas";

pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Area>> {
    let areas = sqlx::query_as::<_, Area>(&format!("{SELECT_AREA} ORDER BY rowid"))
        .fetch_all(conn)
        .await?;
    Ok(areas)
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<Area>> {
    let area = sqlx::query_as::<_, Area>(&format!("{SELECT_AREA} WHERE name = ?"))
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(area)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> DbResult<Option<Area>> {
    let area = sqlx::query_as::<_, Area>(&format!("{SELECT_AREA} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(area)
}

pub async fn insert(conn: &mut SqliteConnection, input: &NewArea) -> DbResult<Area> {
    let area = Area {
        id: Uuid::new_v4(),
        name: input.name.clone(),
        country: input.country.clone(),
    };

    sqlx::query("INSERT INTO areas (id, name, country) VALUES (?, ?, ?)")
        .bind(area.id)
        .bind(&area.name)
        .bind(&area.country)
        .execute(conn)
        .await?;

    info!(area_id = %area.id, area = %area.name, "Created area");
    Ok(area)
}

/// Replaces every mutable field. Events follow the rename because they
/// reference the area by id.
pub async fn update(conn: &mut SqliteConnection, id: Uuid, input: &NewArea) -> DbResult<bool> {
    let result = sqlx::query("UPDATE areas SET name = ?, country = ? WHERE id = ?")
        .bind(&input.name)
        .bind(&input.country)
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() > 0 {
        info!(area_id = %id, area = %input.name, "Updated area");
    }
    Ok(result.rows_affected() > 0)
}

/// Deletes the area; its events stay and lose their area reference.
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> DbResult<bool> {
    let removed = policy::delete_where(conn, Table::Areas, "id", &Key::Id(id)).await?;
    if removed > 0 {
        info!(area_id = %id, "Deleted area");
    }
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM areas")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
