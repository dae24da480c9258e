use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::constants::LINK_RELATIONS_URL;
use crate::handlers::{area, entry_point, event, events_by_area, link_relations, profile};
use crate::state::AppState;

/// Routes without middleware.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(entry_point))
        .route(
            "/api/areas/",
            get(area::list_areas).post(area::create_area),
        )
        .route(
            "/api/areas/:area/",
            get(area::get_area)
                .put(area::update_area)
                .delete(area::delete_area),
        )
        .route(
            "/api/areas/:area/events/",
            get(events_by_area::list_events_by_area),
        )
        .route(
            "/api/events/",
            get(event::list_events).post(event::create_event),
        )
        .route(
            "/api/events/:event/",
            get(event::get_event)
                .put(event::update_event)
                .delete(event::delete_event),
        )
        .route("/profiles/:profile/", get(profile))
        .route(LINK_RELATIONS_URL, get(link_relations))
        .with_state(state)
}

pub fn create_routes(state: AppState, cors_origins: &str) -> Router {
    api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(cors_origins))
}
