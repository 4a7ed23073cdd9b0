//! HTTP adapters - REST API implementations.
//!
//! Child-owned kinds live under `/v1/children/:child_id/<collection>`,
//! environments under `/v1/institutions/:institution_id/environments`.

pub mod middleware;
pub mod records;

use axum::Router;

use crate::domain::activity::PhysicalActivity;
use crate::domain::body_fat::BodyFat;
use crate::domain::environment::Environment;
use crate::domain::log::Log;
use crate::domain::sleep::Sleep;

pub use middleware::{cors_layer, with_middleware};
pub use records::{environment_routes, record_routes, RecordHandlers};

/// Handler sets for every record kind the API serves.
#[derive(Clone)]
pub struct RecordServices {
    pub sleep: RecordHandlers<Sleep>,
    pub physical_activities: RecordHandlers<PhysicalActivity>,
    pub body_fats: RecordHandlers<BodyFat>,
    pub logs: RecordHandlers<Log>,
    pub environments: RecordHandlers<Environment>,
}

/// Versioned API router without middleware.
pub fn api_router(services: RecordServices) -> Router {
    Router::new()
        .nest("/v1/children/:child_id/sleep", record_routes(services.sleep))
        .nest(
            "/v1/children/:child_id/physicalactivities",
            record_routes(services.physical_activities),
        )
        .nest(
            "/v1/children/:child_id/bodyfats",
            record_routes(services.body_fats),
        )
        .nest("/v1/children/:child_id/logs", record_routes(services.logs))
        .nest(
            "/v1/institutions/:institution_id/environments",
            environment_routes(services.environments),
        )
}
