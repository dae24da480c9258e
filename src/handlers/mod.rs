use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use serde_json::Value;

use crate::utils::builder::NearbyControls;
use crate::utils::error::AppError;
use crate::utils::mason::{Control, MasonDocument};
use crate::utils::response::{mason_response, placeholder};
use crate::utils::urls;

pub mod area;
pub mod event;
pub mod events_by_area;

pub async fn entry_point() -> Response {
    let mut body = MasonDocument::new();
    body.add_nearby_namespace();
    body.add_control("self", Control::new(urls::entry_point()));
    body.add_control_areas_all();
    body.add_control_events_all();
    mason_response(StatusCode::OK, body)
}

pub async fn profile(Path(profile): Path<String>) -> Response {
    placeholder(format!("Profile documentation for '{profile}' will be published here."))
}

pub async fn link_relations() -> Response {
    placeholder("Link relations of the nearby namespace will be documented here.".to_string())
}

/// Reads a request body as a JSON document.
///
/// A body that is not declared as JSON, or does not parse, is an unsupported
/// media type.
pub(crate) fn json_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, AppError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json {
        return Err(AppError::UnsupportedMediaType("Requests must be JSON".to_string()));
    }

    serde_json::from_slice(body)
        .map_err(|_| AppError::UnsupportedMediaType("Requests must be JSON".to_string()))
}
