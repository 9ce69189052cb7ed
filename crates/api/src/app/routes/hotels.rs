use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::routes::rooms;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_hotels).post(create_hotel))
        .route("/:hotel_id", get(get_hotel).put(update_hotel).delete(delete_hotel))
        .nest("/:hotel_id/rooms", rooms::router())
}

pub async fn list_hotels(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListHotelsQuery>,
) -> axum::response::Response {
    match services.list_hotels(query.search.as_deref()).await {
        Ok(hotels) => Json(hotels).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_hotel(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::HotelRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.create_hotel(body.into()).await {
        Ok(hotel) => (StatusCode::CREATED, Json(hotel)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_hotel(
    Extension(services): Extension<Arc<AppServices>>,
    Path(hotel_id): Path<String>,
) -> axum::response::Response {
    let hotel_id = match dto::parse_hotel_id(&hotel_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_hotel(hotel_id).await {
        Ok(hotel) => Json(hotel).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_hotel(
    Extension(services): Extension<Arc<AppServices>>,
    Path(hotel_id): Path<String>,
    body: Result<Json<dto::HotelRequest>, JsonRejection>,
) -> axum::response::Response {
    let hotel_id = match dto::parse_hotel_id(&hotel_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.update_hotel(hotel_id, body.into()).await {
        Ok(hotel) => Json(hotel).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_hotel(
    Extension(services): Extension<Arc<AppServices>>,
    Path(hotel_id): Path<String>,
) -> axum::response::Response {
    let hotel_id = match dto::parse_hotel_id(&hotel_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.delete_hotel(hotel_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
