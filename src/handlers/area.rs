use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use sqlx::SqliteConnection;
use tracing::info;

use crate::constants::AREA_PROFILE;
use crate::db::{areas, countries, WriteTransaction};
use crate::handlers::json_body;
use crate::models::{Area, AreaPayload, NewArea};
use crate::schema::Resource;
use crate::state::AppState;
use crate::utils::builder::{area_summary, NearbyControls};
use crate::utils::error::AppError;
use crate::utils::mason::{Control, MasonDocument};
use crate::utils::response::{created, mason_response, no_content};
use crate::utils::urls;

pub async fn list_areas(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let areas = areas::list(&mut conn).await?;

    let mut body = MasonDocument::new();
    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::areas()));
    body.add_control_add_area();
    body.add_control_areas_collection();
    body.set_items(areas.iter().map(area_summary).collect());

    Ok(mason_response(StatusCode::OK, body))
}

pub async fn create_area(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let input = read_area(&state, &headers, &body)?;

    let mut tx = WriteTransaction::begin(&state.db).await?;
    require_country(&mut tx, &input.country).await?;
    let area = areas::insert(&mut tx, &input).await.map_err(|e| {
        AppError::unique(e, || format!("Area with name '{}' already exists.", input.name))
    })?;
    tx.commit().await?;

    Ok(created(urls::area(&area.name)))
}

pub async fn get_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let area = find_area(&mut conn, &area).await?;

    Ok(mason_response(StatusCode::OK, area_representation(&area)))
}

pub async fn update_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut tx = WriteTransaction::begin(&state.db).await?;
    let existing = find_area(&mut tx, &area).await?;

    let input = read_area(&state, &headers, &body)?;
    require_country(&mut tx, &input.country).await?;
    areas::update(&mut tx, existing.id, &input).await.map_err(|e| {
        AppError::unique(e, || format!("Area with name '{}' already exists.", input.name))
    })?;
    tx.commit().await?;

    Ok(no_content())
}

pub async fn delete_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = WriteTransaction::begin(&state.db).await?;
    let existing = find_area(&mut tx, &area).await?;
    areas::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(area = %existing.name, "Area removed, its events are now unassigned");
    Ok(no_content())
}

fn area_representation(area: &Area) -> MasonDocument {
    let mut body = MasonDocument::new()
        .with_field("name", area.name.as_str())
        .with_field("country", area.country.as_str());

    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::area(&area.name)));
    body.add_control("profile", Control::new(AREA_PROFILE));
    body.add_control("collection", Control::new(urls::areas()));
    body.add_control_edit_area(&area.name);
    body.add_control_delete_area(&area.name);
    body.add_control_events_by_area(&area.name);
    body
}

async fn find_area(conn: &mut SqliteConnection, name: &str) -> Result<Area, AppError> {
    areas::find_by_name(conn, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No area was found with the name {name}")))
}

fn read_area(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<NewArea, AppError> {
    let document = json_body(headers, body)?;
    state.schemas.validate(Resource::Area, &document)?;

    let payload: AreaPayload = serde_json::from_value(document)
        .map_err(|e| AppError::InvalidDocument(e.to_string()))?;
    Ok(payload.into())
}

async fn require_country(conn: &mut SqliteConnection, country: &str) -> Result<(), AppError> {
    if countries::exists(conn, country).await? {
        Ok(())
    } else {
        Err(AppError::UnknownReference(format!(
            "No country was found with the name {country}"
        )))
    }
}
