use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use super::policy::{self, Key, Table};
use super::{DbError, DbResult};
use crate::models::{Event, NewEvent};

const SELECT_EVENT: &str = "SELECT e.id, e.name, e.max_tickets, e.ticket_price, e.status, \
     e.event_begin, e.event_manager, e.area_id, a.name AS area_name \
     FROM events e LEFT JOIN areas a ON a.id = e.area_id";

pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(&format!("{SELECT_EVENT} ORDER BY e.rowid"))
        .fetch_all(conn)
        .await?;
    Ok(events)
}

/// Events whose area is currently named `area`. Empty when the area does not exist.
pub async fn list_by_area_name(conn: &mut SqliteConnection, area: &str) -> DbResult<Vec<Event>> {
    let events =
        sqlx::query_as::<_, Event>(&format!("{SELECT_EVENT} WHERE a.name = ? ORDER BY e.rowid"))
            .bind(area)
            .fetch_all(conn)
            .await?;
    Ok(events)
}

pub async fn list_managed_by(conn: &mut SqliteConnection, user_id: Uuid) -> DbResult<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(&format!(
        "{SELECT_EVENT} WHERE e.event_manager = ? ORDER BY e.rowid"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(events)
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(&format!("{SELECT_EVENT} WHERE e.name = ?"))
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(event)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> DbResult<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(&format!("{SELECT_EVENT} WHERE e.id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(event)
}

pub async fn insert(conn: &mut SqliteConnection, input: &NewEvent) -> DbResult<Event> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO events \
         (id, name, max_tickets, ticket_price, status, event_begin, event_manager, area_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.max_tickets)
    .bind(input.ticket_price)
    .bind(&input.status)
    .bind(input.event_begin)
    .bind(input.event_manager)
    .bind(input.area_id)
    .execute(&mut *conn)
    .await?;

    info!(event_id = %id, event = %input.name, "Created event");
    find_by_id(conn, id)
        .await?
        .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
}

/// Full replace of the event row.
pub async fn update(conn: &mut SqliteConnection, id: Uuid, input: &NewEvent) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE events SET name = ?, max_tickets = ?, ticket_price = ?, status = ?, \
         event_begin = ?, event_manager = ?, area_id = ? WHERE id = ?",
    )
    .bind(&input.name)
    .bind(input.max_tickets)
    .bind(input.ticket_price)
    .bind(&input.status)
    .bind(input.event_begin)
    .bind(input.event_manager)
    .bind(input.area_id)
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() > 0 {
        info!(event_id = %id, event = %input.name, "Updated event");
    }
    Ok(result.rows_affected() > 0)
}

/// Deletes the event together with its reservations and their tickets.
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> DbResult<bool> {
    let removed = policy::delete_where(conn, Table::Events, "id", &Key::Id(id)).await?;
    if removed > 0 {
        info!(event_id = %id, "Deleted event");
    }
    Ok(removed > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(conn)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{areas, memory_pool};
    use crate::models::event::parse_event_begin;
    use crate::models::NewArea;

    fn new_event(name: &str, area_id: Option<Uuid>) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            max_tickets: Some(150),
            ticket_price: Some(19.0),
            status: "Cancelled".to_string(),
            event_begin: parse_event_begin("2024-06-21T18:30:00Z").unwrap(),
            event_manager: None,
            area_id,
        }
    }

    #[tokio::test]
    async fn test_area_name_follows_area() {
        let pool = memory_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let area = areas::insert(
            &mut conn,
            &NewArea {
                name: "test-area-1".to_string(),
                country: "Finland".to_string(),
            },
        )
        .await
        .unwrap();
        let event = insert(&mut conn, &new_event("test-event-1", Some(area.id)))
            .await
            .unwrap();
        assert_eq!(event.area_name.as_deref(), Some("test-area-1"));

        let renamed = NewArea {
            name: "renamed-area".to_string(),
            country: "Finland".to_string(),
        };
        areas::update(&mut conn, area.id, &renamed).await.unwrap();

        let event = find_by_name(&mut conn, "test-event-1").await.unwrap().unwrap();
        assert_eq!(event.area_name.as_deref(), Some("renamed-area"));
        assert_eq!(list_by_area_name(&mut conn, "renamed-area").await.unwrap().len(), 1);
        assert!(list_by_area_name(&mut conn, "test-area-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_event_begin_round_trips() {
        let pool = memory_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let event = insert(&mut conn, &new_event("test-event-1", None)).await.unwrap();
        assert_eq!(event.event_begin_string(), "2024-06-21T18:30:00Z");
        assert_eq!(event.area_name, None);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let pool = memory_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let event = insert(&mut conn, &new_event("test-event-1", None)).await.unwrap();
        let mut replacement = new_event("test-event-modified", None);
        replacement.max_tickets = None;
        replacement.ticket_price = None;
        assert!(update(&mut conn, event.id, &replacement).await.unwrap());

        let updated = find_by_id(&mut conn, event.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "test-event-modified");
        assert_eq!(updated.max_tickets, None);
        assert_eq!(updated.ticket_price, None);
    }
}
