//! Hotel entity and its input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hotelier_core::HotelId;

use crate::error::ValidationError;
use crate::room::{RoomConfiguration, configured_total};

pub const NAME_MAX_LEN: usize = 255;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const CITY_MAX_LEN: usize = 100;
pub const TAX_ID_MAX_LEN: usize = 20;
pub const MAX_ROOMS_LIMIT: u32 = 1000;

/// Hotel as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub tax_id: String,
    pub max_rooms: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    pub fn new(id: HotelId, profile: HotelProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: profile.name,
            address: profile.address,
            city: profile.city,
            tax_id: profile.tax_id,
            max_rooms: profile.max_rooms,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields, keeping identity and creation time.
    pub fn with_profile(&self, profile: HotelProfile, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            ..Self::new(self.id, profile, self.created_at)
        }
    }

    /// Case-insensitive substring match over name, city and tax id.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.city, &self.tax_id]
            .iter()
            .any(|v| v.to_lowercase().contains(&needle))
    }
}

/// Raw hotel input as received from a client.
///
/// `max_rooms` is signed so that negative input is reported as a field error
/// instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub tax_id: String,
    pub max_rooms: i64,
}

/// Validated, trimmed hotel fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelProfile {
    pub name: String,
    pub address: String,
    pub city: String,
    pub tax_id: String,
    pub max_rooms: u32,
}

impl HotelFields {
    /// Trim and check every field, reporting all failures together.
    pub fn validate(self) -> Result<HotelProfile, ValidationError> {
        let checked = (
            required_text("name", &self.name, NAME_MAX_LEN),
            required_text("address", &self.address, ADDRESS_MAX_LEN),
            required_text("city", &self.city, CITY_MAX_LEN),
            required_text("tax_id", &self.tax_id, TAX_ID_MAX_LEN),
            max_rooms(self.max_rooms),
        );
        match checked {
            (Ok(name), Ok(address), Ok(city), Ok(tax_id), Ok(max_rooms)) => Ok(HotelProfile {
                name,
                address,
                city,
                tax_id,
                max_rooms,
            }),
            (name, address, city, tax_id, max_rooms) => {
                let failures = [name.err(), address.err(), city.err(), tax_id.err(), max_rooms.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                Err(ValidationError::from_field_failures(failures))
            }
        }
    }
}

fn max_rooms(value: i64) -> Result<u32, ValidationError> {
    if value < 1 {
        return Err(ValidationError::invalid_field("max_rooms", "a hotel must have at least 1 room"));
    }
    if value > i64::from(MAX_ROOMS_LIMIT) {
        return Err(ValidationError::invalid_field(
            "max_rooms",
            format!("a hotel may have at most {MAX_ROOMS_LIMIT} rooms"),
        ));
    }
    Ok(value as u32)
}

fn required_text(field: &'static str, value: &str, max_len: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::invalid_field(field, format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::invalid_field(
            field,
            format!("{field} must be at most {max_len} characters"),
        ));
    }
    Ok(value.to_string())
}

/// A hotel together with its room configurations and derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelInventory {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub configured_total: u32,
    /// `max_rooms - configured_total`, deliberately unclamped.
    pub available: i64,
    pub rooms: Vec<RoomConfiguration>,
}

impl HotelInventory {
    pub fn new(hotel: Hotel, rooms: Vec<RoomConfiguration>) -> Self {
        let configured_total = configured_total(&rooms, None);
        let available = i64::from(hotel.max_rooms) - i64::from(configured_total);
        Self {
            hotel,
            configured_total,
            available,
            rooms,
        }
    }
}
