//! HTTP tests for the area and event resources.
//!
//! Each test gets its own in-memory database seeded with three areas, each
//! hosting one event.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use nearby_events::constants::MASON;
use nearby_events::db::{self, areas, events};
use nearby_events::models::event::parse_event_begin;
use nearby_events::models::{NewArea, NewEvent};
use nearby_events::routes::api_routes;
use nearby_events::state::AppState;
use nearby_events::utils::mason::MasonDocument;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt; // For oneshot()

async fn populate(pool: &SqlitePool) {
    let mut conn = pool.acquire().await.unwrap();
    for i in 1..=3 {
        let area = areas::insert(
            &mut conn,
            &NewArea {
                name: format!("test-area-{i}"),
                country: "Finland".to_string(),
            },
        )
        .await
        .unwrap();
        events::insert(
            &mut conn,
            &NewEvent {
                name: format!("test-event-{i}"),
                max_tickets: Some(150),
                ticket_price: Some(19.0),
                status: "Cancelled".to_string(),
                event_begin: parse_event_begin("2030-01-01T12:00:00Z").unwrap(),
                event_manager: None,
                area_id: Some(area.id),
            },
        )
        .await
        .unwrap();
    }
}

async fn test_app() -> Router {
    let pool = db::memory_pool().await.unwrap();
    populate(&pool).await;
    api_routes(AppState::new(pool).unwrap())
}

fn area_json(number: u32) -> Value {
    json!({"name": format!("extra-area-{number}")})
}

fn event_json(number: u32) -> Value {
    json!({
        "name": format!("extra-event-{number}"),
        "max_tickets": 2,
        "ticket_price": 50,
        "status": "Cancelled",
        "event_begin": "2018-02-02T18:00:00Z",
        "area_name": "test-area-3"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, "GET", uri, None).await
}

async fn document(response: Response) -> MasonDocument {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// Follows a control and asserts it answers 200.
async fn check_get_control(app: &Router, doc: &MasonDocument, name: &str) {
    let control = doc.control(name).unwrap_or_else(|| panic!("missing control {name}"));
    assert_eq!(control.effective_method(), "GET");
    assert_eq!(get(app, &control.href).await.status(), StatusCode::OK, "{name}");
}

async fn check_namespace(app: &Router, doc: &MasonDocument) {
    let href = &doc.namespaces["nearby"].name;
    assert_eq!(get(app, href).await.status(), StatusCode::OK);
}

mod entry_point {
    use super::*;

    #[tokio::test]
    async fn test_links_to_collections() {
        let app = test_app().await;
        let resp = get(&app, "/api/").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = document(resp).await;
        check_namespace(&app, &body).await;
        check_get_control(&app, &body, "self").await;
        assert_eq!(body.control("self").unwrap().href, "/api/");
        check_get_control(&app, &body, "nearby:areas-all").await;
        check_get_control(&app, &body, "nearby:events-all").await;
    }

    #[tokio::test]
    async fn test_profiles_answer() {
        let app = test_app().await;
        for profile in ["/profiles/area/", "/profiles/event/", "/profiles/error/"] {
            assert_eq!(get(&app, profile).await.status(), StatusCode::OK);
        }
    }
}

mod area_collection {
    use super::*;

    const RESOURCE_URL: &str = "/api/areas/";

    #[tokio::test]
    async fn test_get() {
        let app = test_app().await;
        let resp = get(&app, RESOURCE_URL).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], MASON);

        let body = document(resp).await;
        check_namespace(&app, &body).await;
        check_get_control(&app, &body, "self").await;

        let items = body.items.clone().unwrap();
        assert_eq!(items.len(), 3);
        for item in &items {
            assert!(item.get("name").is_some());
            assert!(item.get("country").is_none(), "list items stay shallow");
            check_get_control(&app, item, "self").await;
            check_get_control(&app, item, "profile").await;
        }

        let add = body.control("nearby:add-area").unwrap();
        assert_eq!(add.effective_method(), "POST");
        assert_eq!(add.encoding.as_deref(), Some("json"));
        assert!(add.schema.is_some());

        let template = body.control("nearby:areas-collection").unwrap();
        assert!(template.is_href_template);
    }

    #[tokio::test]
    async fn test_post_valid_request() {
        let app = test_app().await;
        let resp = send(&app, "POST", RESOURCE_URL, Some(json!({"name": "test-area-9"}))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let location = location(&resp);
        assert!(location.ends_with("/api/areas/test-area-9/"));

        let resp = get(&app, &location).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = document(resp).await;
        assert_eq!(body.get("name"), Some(&json!("test-area-9")));
        assert_eq!(body.get("country"), Some(&json!("Finland")));
    }

    #[tokio::test]
    async fn test_post_through_add_control() {
        let app = test_app().await;
        let body = document(get(&app, RESOURCE_URL).await).await;
        let add = body.control("nearby:add-area").unwrap();

        let resp = send(&app, add.effective_method(), &add.href, Some(area_json(1))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_post_wrong_mediatype() {
        let app = test_app().await;
        let resp = send_raw(&app, "POST", RESOURCE_URL, &area_json(1).to_string()).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], MASON);
    }

    #[tokio::test]
    async fn test_post_missing_field() {
        let app = test_app().await;
        let resp = send(&app, "POST", RESOURCE_URL, Some(json!({"wrong_name": "extra-area-1"}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = document(resp).await;
        let error = body.error.as_ref().unwrap();
        assert_eq!(error.message, "Invalid JSON document");
        assert!(error.messages[0].contains("name"));
        assert_eq!(body.control("profile").unwrap().href, "/profiles/error/");
    }

    #[tokio::test]
    async fn test_post_unknown_country() {
        let app = test_app().await;
        let payload = json!({"name": "Stockholm", "country": "Sweden"});
        let resp = send(&app, "POST", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/api/areas/Stockholm/").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_duplicate_yields_one_conflict() {
        let app = test_app().await;
        let first = send(&app, "POST", RESOURCE_URL, Some(area_json(1))).await;
        let second = send(&app, "POST", RESOURCE_URL, Some(area_json(1))).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let body = document(second).await;
        assert!(body.error.unwrap().messages[0].contains("extra-area-1"));

        let items = document(get(&app, RESOURCE_URL).await).await.items.unwrap();
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_post_name_with_spaces_round_trips() {
        let app = test_app().await;
        let resp = send(&app, "POST", RESOURCE_URL, Some(json!({"name": "Oulu - Keskusta"}))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let location = location(&resp);
        assert_eq!(location, "/api/areas/Oulu%20-%20Keskusta/");
        let body = document(get(&app, &location).await).await;
        assert_eq!(body.get("name"), Some(&json!("Oulu - Keskusta")));
    }
}

mod area_item {
    use super::*;

    const RESOURCE_URL: &str = "/api/areas/test-area-1/";
    const INVALID_URL: &str = "/api/areas/non-area-x/";

    #[tokio::test]
    async fn test_get() {
        let app = test_app().await;
        let resp = get(&app, RESOURCE_URL).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = document(resp).await;
        assert_eq!(body.get("name"), Some(&json!("test-area-1")));
        check_namespace(&app, &body).await;
        for control in ["self", "profile", "collection", "nearby:events-by-area"] {
            check_get_control(&app, &body, control).await;
        }

        let edit = body.control("edit").unwrap();
        assert_eq!(edit.effective_method(), "PUT");
        assert_eq!(edit.encoding.as_deref(), Some("json"));
        assert!(edit.schema.is_some());

        let delete = body.control("nearby:delete").unwrap();
        assert_eq!(delete.effective_method(), "DELETE");
        assert!(delete.schema.is_none());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let app = test_app().await;
        let resp = get(&app, INVALID_URL).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = document(resp).await;
        assert_eq!(body.error.unwrap().message, "Not found");
    }

    #[tokio::test]
    async fn test_put_wrong_mediatype() {
        let app = test_app().await;
        let resp = send_raw(&app, "PUT", RESOURCE_URL, &area_json(1).to_string()).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_put_missing() {
        let app = test_app().await;
        let resp = send(&app, "PUT", INVALID_URL, Some(area_json(1))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_invalid_schema() {
        let app = test_app().await;
        let resp = send(&app, "PUT", RESOURCE_URL, Some(json!({"name": 5}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_valid_renames_event_area() {
        let app = test_app().await;
        let resp = send(&app, "PUT", RESOURCE_URL, Some(json!({"name": "test-area-modified"}))).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        assert_eq!(get(&app, RESOURCE_URL).await.status(), StatusCode::NOT_FOUND);
        let event = document(get(&app, "/api/events/test-event-1/").await).await;
        assert_eq!(event.get("area_name"), Some(&json!("test-area-modified")));
    }

    #[tokio::test]
    async fn test_put_duplicate_rolls_back() {
        let app = test_app().await;
        let resp = send(&app, "PUT", RESOURCE_URL, Some(json!({"name": "test-area-2"}))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(get(&app, RESOURCE_URL).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_valid() {
        let app = test_app().await;
        let resp = send(&app, "DELETE", RESOURCE_URL, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(get(&app, RESOURCE_URL).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let app = test_app().await;
        let resp = send(&app, "DELETE", INVALID_URL, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_keeps_events_without_area() {
        let app = test_app().await;
        let resp = send(&app, "DELETE", "/api/areas/test-area-1/", None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = get(&app, "/api/events/test-event-1/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let event = document(resp).await;
        assert_eq!(event.get("area_name"), Some(&Value::Null));
        assert!(event.control("nearby:area").is_none());
    }
}

mod event_collection {
    use super::*;

    const RESOURCE_URL: &str = "/api/events/";

    #[tokio::test]
    async fn test_get() {
        let app = test_app().await;
        let resp = get(&app, RESOURCE_URL).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = document(resp).await;
        check_get_control(&app, &body, "self").await;
        let items = body.items.clone().unwrap();
        assert_eq!(items.len(), 3);
        for item in &items {
            assert!(item.get("name").is_some());
            check_get_control(&app, item, "self").await;
        }

        let add = body.control("nearby:add-event").unwrap();
        assert_eq!(add.effective_method(), "POST");
        assert_eq!(add.schema.as_ref().unwrap()["required"][2], "event_begin");
    }

    #[tokio::test]
    async fn test_post_valid_request() {
        let app = test_app().await;
        let resp = send(&app, "POST", RESOURCE_URL, Some(event_json(1))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let location = location(&resp);
        assert!(location.ends_with("/api/events/extra-event-1/"));

        let body = document(get(&app, &location).await).await;
        assert_eq!(body.get("name"), Some(&json!("extra-event-1")));
        assert_eq!(body.get("area_name"), Some(&json!("test-area-3")));
        assert_eq!(body.get("event_begin"), Some(&json!("2018-02-02T18:00:00Z")));
        assert_eq!(body.get("max_tickets"), Some(&json!(2)));
        assert_eq!(body.control("nearby:area").unwrap().href, "/api/areas/test-area-3/");
    }

    #[tokio::test]
    async fn test_post_unknown_area_is_stored_unassigned() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload["area_name"] = json!("nowhere");

        let resp = send(&app, "POST", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = document(get(&app, &location(&resp)).await).await;
        assert_eq!(body.get("area_name"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_post_wrong_mediatype() {
        let app = test_app().await;
        let resp = send_raw(&app, "POST", RESOURCE_URL, "").await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_post_missing_field() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload.as_object_mut().unwrap().remove("name");

        let resp = send(&app, "POST", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_malformed_event_begin() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload["event_begin"] = json!("2018.2.2");

        let resp = send(&app, "POST", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_valid_request_duplicate() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload["name"] = json!("test-event-1");

        let resp = send(&app, "POST", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(document(resp).await.error.unwrap().message, "Already exists");
    }
}

mod event_item {
    use super::*;

    const RESOURCE_URL: &str = "/api/events/test-event-1/";
    const INVALID_URL: &str = "/api/events/non-event-x/";

    #[tokio::test]
    async fn test_get() {
        let app = test_app().await;
        let resp = get(&app, RESOURCE_URL).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = document(resp).await;
        assert_eq!(body.get("name"), Some(&json!("test-event-1")));
        assert_eq!(body.get("status"), Some(&json!("Cancelled")));
        assert_eq!(body.get("area_name"), Some(&json!("test-area-1")));
        for control in ["self", "profile", "collection", "nearby:area", "nearby:events-by-area"] {
            check_get_control(&app, &body, control).await;
        }
        assert_eq!(body.control("edit").unwrap().effective_method(), "PUT");
        assert_eq!(body.control("nearby:delete").unwrap().effective_method(), "DELETE");
    }

    #[tokio::test]
    async fn test_put_wrong_mediatype() {
        let app = test_app().await;
        let resp = send_raw(&app, "PUT", RESOURCE_URL, "").await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_put_missing() {
        let app = test_app().await;
        let resp = send(&app, "PUT", INVALID_URL, Some(event_json(1))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_valid() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload["name"] = json!("test-event-modified");
        let resp = send(&app, "PUT", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let body = document(get(&app, "/api/events/test-event-modified/").await).await;
        assert_eq!(body.get("area_name"), Some(&json!("test-area-3")));
        assert_eq!(body.get("ticket_price"), Some(&json!(50.0)));

        let mut payload = event_json(1);
        payload.as_object_mut().unwrap().remove("area_name");
        let resp = send(&app, "PUT", "/api/events/test-event-modified/", Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_duplicate() {
        let app = test_app().await;
        let mut payload = event_json(1);
        payload["name"] = json!("test-event-2");
        let resp = send(&app, "PUT", RESOURCE_URL, Some(payload)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_valid() {
        let app = test_app().await;
        let body = document(get(&app, RESOURCE_URL).await).await;
        let delete = body.control("nearby:delete").unwrap();

        let resp = send(&app, delete.effective_method(), &delete.href, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(get(&app, RESOURCE_URL).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let app = test_app().await;
        let resp = send(&app, "DELETE", INVALID_URL, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

mod events_by_area {
    use super::*;

    #[tokio::test]
    async fn test_get() {
        let app = test_app().await;
        let resp = get(&app, "/api/areas/test-area-2/events/").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = document(resp).await;
        check_get_control(&app, &body, "self").await;
        check_get_control(&app, &body, "up").await;

        let items = body.items.clone().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("name"), Some(&json!("test-event-2")));
        check_get_control(&app, &items[0], "self").await;
        assert_eq!(
            items[0].control("nearby:area").unwrap().href,
            "/api/areas/test-area-2/"
        );
    }

    #[tokio::test]
    async fn test_empty_area_is_empty_list() {
        let app = test_app().await;
        let resp = send(&app, "POST", "/api/areas/", Some(json!({"name": "quiet-area"}))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = get(&app, "/api/areas/quiet-area/events/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(document(resp).await.items, Some(vec![]));
    }

    #[tokio::test]
    async fn test_unknown_area_is_empty_list() {
        let app = test_app().await;
        let resp = get(&app, "/api/areas/non-area-x/events/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(document(resp).await.items, Some(vec![]));
    }
}

mod concurrent_writes {
    use super::*;
    use nearby_events::config::Config;
    use tempfile::TempDir;
    use tokio::task::JoinSet;

    const WRITERS: usize = 8;
    const ROUNDS: usize = 5;

    /// A file-backed database so several pooled connections share one store.
    async fn file_app(dir: &TempDir) -> Router {
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("nearby.db").display()),
            max_connections: WRITERS as u32,
            ..Config::default()
        };
        let pool = db::connect(&config).await.unwrap();
        db::migrate(&pool).await.unwrap();
        api_routes(AppState::new(pool).unwrap())
    }

    async fn post_areas(app: &Router, names: Vec<String>) -> Vec<StatusCode> {
        let mut writers = JoinSet::new();
        for name in names {
            let app = app.clone();
            writers.spawn(async move {
                send(&app, "POST", "/api/areas/", Some(json!({"name": name})))
                    .await
                    .status()
            });
        }

        let mut statuses = Vec::new();
        while let Some(status) = writers.join_next().await {
            statuses.push(status.unwrap());
        }
        statuses
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_name_race_has_one_winner() {
        let dir = TempDir::new().unwrap();
        let app = file_app(&dir).await;

        for round in 0..ROUNDS {
            let names = vec![format!("contested-{round}"); WRITERS];
            let statuses = post_areas(&app, names).await;

            let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
            let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
            assert_eq!(created, 1, "round {round}: {statuses:?}");
            assert_eq!(conflicts, WRITERS - 1, "round {round}: {statuses:?}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_names_all_created() {
        let dir = TempDir::new().unwrap();
        let app = file_app(&dir).await;

        for round in 0..ROUNDS {
            let names = (0..WRITERS).map(|i| format!("area-{round}-{i}")).collect();
            let statuses = post_areas(&app, names).await;
            assert!(
                statuses.iter().all(|s| *s == StatusCode::CREATED),
                "round {round}: {statuses:?}"
            );
        }

        let body = document(get(&app, "/api/areas/").await).await;
        assert_eq!(body.items.unwrap().len(), WRITERS * ROUNDS);
    }
}
