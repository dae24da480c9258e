use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::constants::EVENT_PROFILE;
use crate::db::events;
use crate::state::AppState;
use crate::utils::builder::NearbyControls;
use crate::utils::error::AppError;
use crate::utils::mason::{Control, MasonDocument};
use crate::utils::response::mason_response;
use crate::utils::urls;

/// Events hosted by an area.
///
/// The area name is a filter, not a lookup: an area without events, or one
/// that does not exist, yields an empty list.
pub async fn list_events_by_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let events = events::list_by_area_name(&mut conn, &area).await?;

    let mut body = MasonDocument::new();
    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::events_by_area(&area)));
    body.add_control("up", Control::new(urls::area(&area)));
    body.add_control_add_event();

    let items = events
        .iter()
        .map(|event| {
            let mut item = MasonDocument::new().with_field("name", event.name.as_str());
            item.add_control("self", Control::new(urls::event(&event.name)));
            item.add_control("profile", Control::new(EVENT_PROFILE));
            item.add_control_area(&area);
            item
        })
        .collect();
    body.set_items(items);

    Ok(mason_response(StatusCode::OK, body))
}
