use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use super::policy::{self, Key, Table};
use super::DbResult;
use crate::models::{NewReservation, Reservation};

const SELECT_RESERVATION: &str =
    "SELECT id, user_id, event_id, paid, created_at FROM reservations";

pub async fn insert(
    conn: &mut SqliteConnection,
    input: &NewReservation,
) -> DbResult<Reservation> {
    let reservation = Reservation {
        id: Uuid::new_v4(),
        user_id: input.user_id,
        event_id: input.event_id,
        paid: input.paid,
        created_at: input.created_at,
    };

    sqlx::query(
        "INSERT INTO reservations (id, user_id, event_id, paid, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(reservation.id)
    .bind(reservation.user_id)
    .bind(reservation.event_id)
    .bind(reservation.paid)
    .bind(reservation.created_at)
    .execute(conn)
    .await?;

    info!(reservation_id = %reservation.id, event_id = %reservation.event_id, "Created reservation");
    Ok(reservation)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> DbResult<Option<Reservation>> {
    let reservation =
        sqlx::query_as::<_, Reservation>(&format!("{SELECT_RESERVATION} WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(reservation)
}

pub async fn list_for_event(
    conn: &mut SqliteConnection,
    event_id: Uuid,
) -> DbResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "{SELECT_RESERVATION} WHERE event_id = ? ORDER BY rowid"
    ))
    .bind(event_id)
    .fetch_all(conn)
    .await?;
    Ok(reservations)
}

pub async fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> DbResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "{SELECT_RESERVATION} WHERE user_id = ? ORDER BY rowid"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(reservations)
}

/// Deletes the reservation and every ticket issued on it.
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> DbResult<bool> {
    let removed = policy::delete_where(conn, Table::Reservations, "id", &Key::Id(id)).await?;
    if removed > 0 {
        info!(reservation_id = %id, "Deleted reservation");
    }
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
