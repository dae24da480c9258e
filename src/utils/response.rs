use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::constants::{ERROR_PROFILE, MASON};
use crate::utils::mason::{Control, MasonDocument};

/// Serializes a Mason document with the Mason media type.
pub fn mason_response(status: StatusCode, body: MasonDocument) -> Response {
    (status, [(CONTENT_TYPE, MASON)], Json(body)).into_response()
}

pub fn created(location: String) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)]).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

pub fn placeholder(text: String) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}

/// Builds the uniform error document: `@error` plus a link to the error profile.
pub fn error_document(title: &str, detail: &str) -> MasonDocument {
    let mut body = MasonDocument::new();
    body.add_error(title, detail);
    body.add_control("profile", Control::new(ERROR_PROFILE));
    body
}

pub fn create_error_response(status: StatusCode, title: &str, detail: &str) -> Response {
    mason_response(status, error_document(title, detail))
}
