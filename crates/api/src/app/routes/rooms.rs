//! Room configurations, always addressed under their hotel.
//!
//! A room id that exists but belongs to a different hotel is reported as 404.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/:room_id", get(get_room).put(update_room).delete(delete_room))
}

pub async fn list_rooms(
    Extension(services): Extension<Arc<AppServices>>,
    Path(hotel_id): Path<String>,
) -> axum::response::Response {
    let hotel_id = match dto::parse_hotel_id(&hotel_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.list_room_configurations(hotel_id).await {
        Ok(rooms) => Json(rooms).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path(hotel_id): Path<String>,
    body: Result<Json<dto::RoomRequest>, JsonRejection>,
) -> axum::response::Response {
    let hotel_id = match dto::parse_hotel_id(&hotel_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.add_room_configuration(hotel_id, body.into()).await {
        Ok(room) => (StatusCode::CREATED, Json(room)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path((hotel_id, room_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (hotel_id, room_id) = match (dto::parse_hotel_id(&hotel_id), dto::parse_room_id(&room_id)) {
        (Ok(h), Ok(r)) => (h, r),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    match services.get_room_configuration(hotel_id, room_id).await {
        Ok(room) => Json(room).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path((hotel_id, room_id)): Path<(String, String)>,
    body: Result<Json<dto::RoomRequest>, JsonRejection>,
) -> axum::response::Response {
    let (hotel_id, room_id) = match (dto::parse_hotel_id(&hotel_id), dto::parse_room_id(&room_id)) {
        (Ok(h), Ok(r)) => (h, r),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services
        .update_room_configuration(hotel_id, room_id, body.into())
        .await
    {
        Ok(room) => Json(room).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path((hotel_id, room_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (hotel_id, room_id) = match (dto::parse_hotel_id(&hotel_id), dto::parse_room_id(&room_id)) {
        (Ok(h), Ok(r)) => (h, r),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    match services.delete_room_configuration(hotel_id, room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
