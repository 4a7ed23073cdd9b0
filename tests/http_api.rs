//! The versioned REST API wired the way the binary wires it, backed by
//! in-memory adapters.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use tracking_service::adapters::http::{api_router, with_middleware, RecordHandlers, RecordServices};
use tracking_service::adapters::{InMemoryEventBus, InMemoryRecordStore};
use tracking_service::application::EventDispatcher;
use tracking_service::config::ServerConfig;
use tracking_service::domain::records::TrackedRecord;

const CHILD: &str = "5a62be07de34500146d9c544";
const INSTITUTION: &str = "5a62be07de34500146d9c624";

fn handlers<R: TrackedRecord>(dispatcher: &EventDispatcher) -> RecordHandlers<R> {
    RecordHandlers::new(Arc::new(InMemoryRecordStore::<R>::new()), dispatcher.clone())
}

fn app() -> (Router, Arc<InMemoryEventBus>, EventDispatcher) {
    let bus = Arc::new(InMemoryEventBus::new());
    let (dispatcher, _) = EventDispatcher::spawn(bus.clone());
    let services = RecordServices {
        sleep: handlers(&dispatcher),
        physical_activities: handlers(&dispatcher),
        body_fats: handlers(&dispatcher),
        logs: handlers(&dispatcher),
        environments: handlers(&dispatcher),
    };
    let router = with_middleware(api_router(services), &ServerConfig::default());
    (router, bus, dispatcher)
}

fn post(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn every_child_collection_accepts_records() {
    let (app, bus, dispatcher) = app();

    let requests = [
        (
            "physicalactivities",
            json!({
                "start_time": "2018-12-14T12:52:59Z",
                "end_time": "2018-12-14T13:12:37Z",
                "duration": 1178000,
                "name": "walk",
                "calories": 200,
                "steps": 1000
            }),
        ),
        (
            "bodyfats",
            json!({
                "timestamp": "2018-11-19T14:40:00Z",
                "type": "body_fat",
                "value": 20.5,
                "unit": "%"
            }),
        ),
        (
            "logs",
            json!({ "date": "2018-03-10", "type": "steps", "value": 1200 }),
        ),
    ];

    for (collection, body) in requests {
        let response = app
            .clone()
            .oneshot(post(&format!("/v1/children/{}/{}", CHILD, collection), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{}", collection);
        assert_eq!(body_json(response).await["child_id"], CHILD);
    }

    dispatcher.flush().await.unwrap();
    assert!(bus.has_event("PhysicalActivitySaveEvent"));
    assert!(bus.has_event("BodyFatSaveEvent"));
    assert!(bus.has_event("LogSaveEvent"));
}

#[tokio::test]
async fn request_id_becomes_the_event_correlation_id() {
    let (app, bus, dispatcher) = app();

    let mut request = post(
        &format!("/v1/children/{}/logs", CHILD),
        json!({ "date": "2018-03-10", "type": "calories", "value": 300 }),
    );
    request
        .headers_mut()
        .insert("x-request-id", "trace-abc".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-request-id"], "trace-abc");

    dispatcher.flush().await.unwrap();
    let events = bus.events_named("LogSaveEvent");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("trace-abc"));
}

#[tokio::test]
async fn batch_is_created_even_when_items_fail() {
    let (app, _, _) = app();

    let response = app
        .oneshot(post(
            &format!("/v1/institutions/{}/environments", INSTITUTION),
            json!([
                {
                    "timestamp": "2018-11-19T14:40:00Z",
                    "location": { "local": "indoor", "room": "room 01" },
                    "measurements": [{ "type": "humidity", "value": 42.2, "unit": "%" }]
                },
                {
                    "timestamp": "2018-11-19T14:45:00Z",
                    "location": { "local": "indoor", "room": "room 01" },
                    "measurements": [{ "type": "Temperatures", "value": 35.6, "unit": "°C" }]
                }
            ]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"].as_array().unwrap().len(), 1);
    assert_eq!(body["error"][0]["code"], 400);
    assert_eq!(body["error"][0]["item"]["measurements"][0]["type"], "Temperatures");
}

#[tokio::test]
async fn environments_have_no_item_read_route() {
    let (app, _, _) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/v1/institutions/{}/environments/5a62be07de34500146d9c600",
                    INSTITUTION
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_collection_is_not_found() {
    let (app, _, _) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/children/{}/heartrates", CHILD))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
