use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::RawPatientInput;
use super::service::{EstimationError, RecoveryEstimationService};

/// Router builder exposing the estimator over HTTP.
pub fn estimation_router(service: Arc<RecoveryEstimationService>) -> Router {
    Router::new()
        .route("/api/v1/estimates", post(estimate_handler))
        .route("/api/v1/ruleset", get(ruleset_handler))
        .with_state(service)
}

pub(crate) async fn estimate_handler(
    State(service): State<Arc<RecoveryEstimationService>>,
    payload: Result<axum::Json<RawPatientInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(axum::Json(input)) => input,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.estimate(&input) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(EstimationError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ruleset_handler(
    State(service): State<Arc<RecoveryEstimationService>>,
) -> Response {
    let registry = service.registry().snapshot();
    (StatusCode::OK, axum::Json(registry.to_document())).into_response()
}
