//! HTTP routes for record endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::domain::environment::Environment;
use crate::domain::records::TrackedRecord;

use super::handlers::{
    add_records, get_record, list_records, remove_record, update_record, RecordHandlers,
};

/// Collection and item routes of a child-owned record kind.
///
/// Expects to be nested under a path capturing the subject id first.
pub fn record_routes<R: TrackedRecord>(handlers: RecordHandlers<R>) -> Router {
    Router::new()
        .route("/", post(add_records::<R>).get(list_records::<R>))
        .route(
            "/:id",
            get(get_record::<R>)
                .patch(update_record::<R>)
                .delete(remove_record::<R>),
        )
        .with_state(handlers)
}

/// Institution environments: add, list and delete only.
pub fn environment_routes(handlers: RecordHandlers<Environment>) -> Router {
    Router::new()
        .route(
            "/",
            post(add_records::<Environment>).get(list_records::<Environment>),
        )
        .route("/:id", delete(remove_record::<Environment>))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryRecordStore};
    use crate::application::EventDispatcher;
    use crate::domain::log::Log;
    use crate::domain::records::MultiStatus;
    use crate::domain::sleep::Sleep;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;
    use tower::ServiceExt;
    use crate::ports::RecordRepository;

    const CHILD: &str = "5a62be07de34500146d9c544";
    const INSTITUTION: &str = "5a62be07de34500146d9c624";

    fn app<R: TrackedRecord>(
        kind_path: &str,
    ) -> (Router, InMemoryRecordStore<R>, Arc<InMemoryEventBus>) {
        let store = InMemoryRecordStore::<R>::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let (dispatcher, _) = EventDispatcher::spawn(bus.clone());
        let handlers = RecordHandlers::new(Arc::new(store.clone()), dispatcher);
        let router = Router::new().nest(
            &format!("/v1/children/:child_id/{}", kind_path),
            record_routes(handlers),
        );
        (router, store, bus)
    }

    fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
        Request::builder()
            .method(method)
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

    fn sleep_body() -> JsonValue {
        json!({
            "start_time": "2018-08-18T01:40:30Z",
            "end_time": "2018-08-18T09:52:30Z",
            "duration": 29520000,
            "type": "stages",
            "pattern": {
                "data_set": [
                    { "start_time": "2018-08-18T01:40:30Z", "name": "deep", "duration": 29520000 }
                ]
            }
        })
    }

    #[tokio::test]
    async fn post_single_returns_created_record() {
        let (app, store, _) = app::<Sleep>("sleep");

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/children/{}/sleep", CHILD),
                sleep_body(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["id"].is_string());
        assert_eq!(body["child_id"], CHILD);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn post_batch_returns_multi_status() {
        let (app, _, _) = app::<Sleep>("sleep");

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/children/{}/sleep", CHILD),
                json!([sleep_body(), {}]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let status: MultiStatus<JsonValue> =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(status.success.len(), 1);
        assert_eq!(status.error.len(), 1);
        assert_eq!(status.error[0].item, json!({}));
    }

    #[tokio::test]
    async fn post_invalid_single_returns_error_body() {
        let (app, _, _) = app::<Sleep>("sleep");

        let mut body = sleep_body();
        body["end_time"] = json!("2018-08-18T00:00:00Z");
        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/children/{}/sleep", CHILD),
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Date field is invalid...");
    }

    #[tokio::test]
    async fn post_scalar_body_is_bad_request() {
        let (app, _, _) = app::<Sleep>("sleep");

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/children/{}/sleep", CHILD),
                json!(7),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_unparseable_body_is_bad_request() {
        let (app, _, _) = app::<Sleep>("sleep");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/v1/children/{}/sleep", CHILD))
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_post_is_conflict() {
        let (app, _, _) = app::<Sleep>("sleep");
        let uri = format!("/v1/children/{}/sleep", CHILD);

        let first = app
            .clone()
            .oneshot(json_request("POST", &uri, sleep_body()))
            .await
            .unwrap();
        let second = app
            .oneshot(json_request("POST", &uri, sleep_body()))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn list_returns_records_with_total_count() {
        let (app, store, _) = app::<Log>("logs");
        for day in ["2018-03-10", "2018-03-11"] {
            store
                .create(&Log::new(day, crate::domain::log::LogType::Steps, 10.0, CHILD))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/children/{}/logs?limit=1", CHILD))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-total-count"], "2");
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_patch_and_delete_one_record() {
        let (app, store, _) = app::<Sleep>("sleep");
        let mut sleep = Sleep::from_json(&sleep_body());
        sleep.set_subject_id(CHILD.to_string());
        let created = store.create(&sleep).await.unwrap().unwrap();
        let uri = format!("/v1/children/{}/sleep/{}", CHILD, created.id().unwrap());

        let get = app
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::OK);

        let patch = app
            .clone()
            .oneshot(json_request("PATCH", &uri, json!({ "type": "classic" })))
            .await
            .unwrap();
        // stage phase names are not valid for classic sleep
        assert_eq!(patch.status(), StatusCode::BAD_REQUEST);

        let delete = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(delete.status(), StatusCode::NO_CONTENT);
        assert!(store.is_empty().await);

        let missing = app
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_child_id_is_bad_request() {
        let (app, _, _) = app::<Sleep>("sleep");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/children/not-an-id/sleep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Parameter {child_id} is not in valid format!");
    }

    #[tokio::test]
    async fn environment_routes_accept_institution_records() {
        let store = InMemoryRecordStore::<Environment>::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let (dispatcher, _) = EventDispatcher::spawn(bus);
        let app = Router::new().nest(
            "/v1/institutions/:institution_id/environments",
            environment_routes(RecordHandlers::new(Arc::new(store.clone()), dispatcher)),
        );

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/institutions/{}/environments", INSTITUTION),
                json!({
                    "timestamp": "2018-11-19T14:40:00Z",
                    "location": { "local": "indoor", "room": "room 01" },
                    "measurements": [
                        { "type": "temperature", "value": 35.6, "unit": "°C" },
                        { "type": "humidity", "value": 42.2, "unit": "%" }
                    ],
                    "climatized": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["institution_id"], INSTITUTION);
        assert_eq!(store.len().await, 1);
    }
}
