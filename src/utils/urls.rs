//! URI construction for every routed resource. Natural keys are percent-encoded
//! as single path segments.

use urlencoding::encode;

pub fn entry_point() -> String {
    "/api/".to_string()
}

pub fn areas() -> String {
    "/api/areas/".to_string()
}

pub fn area(name: &str) -> String {
    format!("/api/areas/{}/", encode(name))
}

pub fn events() -> String {
    "/api/events/".to_string()
}

pub fn event(name: &str) -> String {
    format!("/api/events/{}/", encode(name))
}

pub fn events_by_area(area: &str) -> String {
    format!("/api/areas/{}/events/", encode(area))
}
