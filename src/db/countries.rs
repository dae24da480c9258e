use sqlx::SqliteConnection;
use tracing::info;

use super::policy::{self, Key, Table};
use super::DbResult;
use crate::models::Country;

pub async fn insert(conn: &mut SqliteConnection, country: &Country) -> DbResult<()> {
    sqlx::query("INSERT INTO countries (country, timezone, currency) VALUES (?, ?, ?)")
        .bind(&country.country)
        .bind(&country.timezone)
        .bind(&country.currency)
        .execute(conn)
        .await?;

    info!(country = %country.country, "Created country");
    Ok(())
}

pub async fn find(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<Country>> {
    let country = sqlx::query_as::<_, Country>(
        "SELECT country, timezone, currency FROM countries WHERE country = ?",
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;
    Ok(country)
}

pub async fn exists(conn: &mut SqliteConnection, name: &str) -> DbResult<bool> {
    Ok(find(conn, name).await?.is_some())
}

pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Country>> {
    let countries = sqlx::query_as::<_, Country>(
        "SELECT country, timezone, currency FROM countries ORDER BY country",
    )
    .fetch_all(conn)
    .await?;
    Ok(countries)
}

/// Deletes the country and its areas; users of that nationality keep their rows.
pub async fn delete(conn: &mut SqliteConnection, name: &str) -> DbResult<bool> {
    let removed =
        policy::delete_where(conn, Table::Countries, "country", &Key::Name(name.to_string()))
            .await?;
    if removed > 0 {
        info!(country = %name, "Deleted country");
    }
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
