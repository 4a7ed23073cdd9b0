//! HTTP middleware for axum.
//!
//! Request tracing, request ids, timeouts, compression and CORS, configured
//! from [`ServerConfig`].

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;

use super::records::{REQUEST_ID_HEADER, TOTAL_COUNT_HEADER};

/// Wraps `router` in the service's middleware stack.
///
/// The request id is assigned before tracing so every span and every
/// published event carries it.
pub fn with_middleware(router: Router, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(CompressionLayer::new())
            .layer(cors_layer(config))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}

/// CORS from the configured origin list; any origin when unset.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
