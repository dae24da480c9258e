use sqlx::SqliteConnection;
use uuid::Uuid;

use super::policy::{self, Key, Table};
use super::DbResult;
use crate::models::{NewTicket, Ticket};

pub async fn insert(conn: &mut SqliteConnection, input: &NewTicket) -> DbResult<Ticket> {
    let ticket = Ticket {
        id: Uuid::new_v4(),
        reservation_id: input.reservation_id,
        ticket_type: input.ticket_type.clone(),
    };

    sqlx::query("INSERT INTO tickets (id, reservation_id, type) VALUES (?, ?, ?)")
        .bind(ticket.id)
        .bind(ticket.reservation_id)
        .bind(&ticket.ticket_type)
        .execute(conn)
        .await?;

    Ok(ticket)
}

pub async fn list_for_reservation(
    conn: &mut SqliteConnection,
    reservation_id: Uuid,
) -> DbResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(
        "SELECT id, reservation_id, type FROM tickets WHERE reservation_id = ? ORDER BY rowid",
    )
    .bind(reservation_id)
    .fetch_all(conn)
    .await?;
    Ok(tickets)
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> DbResult<bool> {
    let removed = policy::delete_where(conn, Table::Tickets, "id", &Key::Id(id)).await?;
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
