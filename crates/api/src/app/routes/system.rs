use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Room types, the accommodations each allows, and every accommodation.
pub async fn room_catalog(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.room_catalog())
}
