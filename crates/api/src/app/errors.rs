use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hotelier_infra::ServiceError;
use hotelier_rooms::ValidationError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(e) => validation_error(&e),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "inventory store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "internal store error")
        }
    }
}

/// 422 with the usual `error`/`message` pair plus a field-keyed `errors` map.
pub fn validation_error(err: &ValidationError) -> axum::response::Response {
    let code = match err {
        ValidationError::InvalidField { .. } | ValidationError::InvalidFields(_) => "invalid_field",
        ValidationError::InvalidPairing { .. } => "invalid_pairing",
        ValidationError::DuplicatePairing { .. } => "duplicate_pairing",
        ValidationError::CapacityExceeded { .. } => "capacity_exceeded",
        ValidationError::CapacityBelowConfigured { .. } => "capacity_below_configured",
        ValidationError::UniqueFieldConflict { .. } => "unique_field_conflict",
    };
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": code,
            "message": err.to_string(),
            "errors": err.field_errors(),
        })),
    )
        .into_response()
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
