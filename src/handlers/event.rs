use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::warn;
use uuid::Uuid;

use crate::constants::EVENT_PROFILE;
use crate::db::{areas, events, WriteTransaction};
use crate::handlers::json_body;
use crate::models::event::parse_event_begin;
use crate::models::{Event, EventPayload, NewEvent};
use crate::schema::Resource;
use crate::state::AppState;
use crate::utils::builder::{event_summary, NearbyControls};
use crate::utils::error::AppError;
use crate::utils::mason::{Control, MasonDocument};
use crate::utils::response::{created, mason_response, no_content};
use crate::utils::urls;

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let events = events::list(&mut conn).await?;

    let mut body = MasonDocument::new();
    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::events()));
    body.add_control_add_event();
    body.set_items(events.iter().map(event_summary).collect());

    Ok(mason_response(StatusCode::OK, body))
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload = read_event(&state, &headers, &body)?;

    let mut tx = WriteTransaction::begin(&state.db).await?;
    let input = resolve_event(&mut tx, payload, None).await?;
    let event = events::insert(&mut tx, &input).await.map_err(|e| {
        AppError::unique(e, || format!("Event with name '{}' already exists.", input.name))
    })?;
    tx.commit().await?;

    Ok(created(urls::event(&event.name)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let event = find_event(&mut conn, &event).await?;

    Ok(mason_response(StatusCode::OK, event_representation(&event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut tx = WriteTransaction::begin(&state.db).await?;
    let existing = find_event(&mut tx, &event).await?;

    let payload = read_event(&state, &headers, &body)?;
    let input = resolve_event(&mut tx, payload, existing.event_manager).await?;
    events::update(&mut tx, existing.id, &input).await.map_err(|e| {
        AppError::unique(e, || format!("Event with name '{}' already exists.", input.name))
    })?;
    tx.commit().await?;

    Ok(no_content())
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = WriteTransaction::begin(&state.db).await?;
    let existing = find_event(&mut tx, &event).await?;
    events::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    Ok(no_content())
}

fn event_representation(event: &Event) -> MasonDocument {
    let mut body = MasonDocument::new()
        .with_field("name", event.name.as_str())
        .with_field("max_tickets", event.max_tickets)
        .with_field("ticket_price", event.ticket_price)
        .with_field("status", event.status.as_str())
        .with_field("event_begin", event.event_begin_string())
        .with_field("area_name", event.area_name.clone());

    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::event(&event.name)));
    body.add_control("profile", Control::new(EVENT_PROFILE));
    body.add_control("collection", Control::new(urls::events()));
    body.add_control_edit_event(&event.name);
    body.add_control_delete_event(&event.name);
    if let Some(area) = &event.area_name {
        body.add_control_area(area);
        body.add_control_events_by_area(area);
    }
    body
}

async fn find_event(conn: &mut SqliteConnection, name: &str) -> Result<Event, AppError> {
    events::find_by_name(conn, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No event was found with the name {name}")))
}

fn read_event(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<EventPayload, AppError> {
    let document: Value = json_body(headers, body)?;
    state.schemas.validate(Resource::Event, &document)?;

    serde_json::from_value(document).map_err(|e| AppError::InvalidDocument(e.to_string()))
}

/// Turns a validated payload into a row, linking `area_name` to an area.
///
/// An unknown area name is stored as no area at all.
async fn resolve_event(
    conn: &mut SqliteConnection,
    payload: EventPayload,
    event_manager: Option<Uuid>,
) -> Result<NewEvent, AppError> {
    let event_begin = parse_event_begin(&payload.event_begin).map_err(|e| {
        AppError::InvalidDocument(format!(
            "'{}' is not a valid event_begin: {e}",
            payload.event_begin
        ))
    })?;

    let area = areas::find_by_name(conn, &payload.area_name).await?;
    if area.is_none() {
        warn!(event = %payload.name, area = %payload.area_name, "Event refers to an unknown area, storing it unassigned");
    }

    Ok(NewEvent {
        name: payload.name,
        max_tickets: payload.max_tickets,
        ticket_price: payload.ticket_price,
        status: payload.status,
        event_begin,
        event_manager,
        area_id: area.map(|a| a.id),
    })
}
