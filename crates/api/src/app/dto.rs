use axum::http::StatusCode;
use serde::Deserialize;

use hotelier_core::{HotelId, RoomConfigurationId};
use hotelier_rooms::{HotelFields, RoomFields};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Missing fields default to empty so they come back as field errors, not a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HotelRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub tax_id: String,
    pub max_rooms: i64,
}

impl From<HotelRequest> for HotelFields {
    fn from(value: HotelRequest) -> Self {
        HotelFields {
            name: value.name,
            address: value.address,
            city: value.city,
            tax_id: value.tax_id,
            max_rooms: value.max_rooms,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomRequest {
    pub room_type: String,
    pub accommodation: String,
    pub quantity: i64,
}

impl From<RoomRequest> for RoomFields {
    fn from(value: RoomRequest) -> Self {
        RoomFields {
            room_type: value.room_type,
            accommodation: value.accommodation,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListHotelsQuery {
    pub search: Option<String>,
}

// -------------------------
// Path parsing
// -------------------------

pub fn parse_hotel_id(raw: &str) -> Result<HotelId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid hotel id"))
}

pub fn parse_room_id(raw: &str) -> Result<RoomConfigurationId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid room configuration id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_hotel_fields_deserialize_as_blank() {
        let req: HotelRequest = serde_json::from_value(serde_json::json!({"name": "Barú"})).unwrap();
        let fields = HotelFields::from(req);
        assert_eq!(fields.name, "Barú");
        assert_eq!(fields.city, "");
        assert_eq!(fields.max_rooms, 0);
    }

    #[test]
    fn bad_ids_are_rejected() {
        assert!(parse_hotel_id("not-a-uuid").is_err());
        assert!(parse_room_id(&RoomConfigurationId::new().to_string()).is_ok());
    }
}
