use axum::{Router, routing::get};

pub mod hotels;
pub mod rooms;
pub mod system;

/// Router for all inventory endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/config/rooms", get(system::room_catalog))
        .nest("/hotels", hotels::router())
}
