//! Room configuration entity and its input parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hotelier_core::{HotelId, RoomConfigurationId};

use crate::catalog::{Accommodation, RoomType};
use crate::error::ValidationError;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 200;

/// A (type, accommodation, quantity) line owned by exactly one hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfiguration {
    pub id: RoomConfigurationId,
    pub hotel_id: HotelId,
    pub room_type: RoomType,
    pub accommodation: Accommodation,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomConfiguration {
    pub fn new(id: RoomConfigurationId, hotel_id: HotelId, spec: RoomSpec, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hotel_id,
            room_type: spec.room_type,
            accommodation: spec.accommodation,
            quantity: spec.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite type, accommodation and quantity in place.
    pub fn with_spec(&self, spec: RoomSpec, now: DateTime<Utc>) -> Self {
        Self {
            room_type: spec.room_type,
            accommodation: spec.accommodation,
            quantity: spec.quantity,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn spec(&self) -> RoomSpec {
        RoomSpec {
            room_type: self.room_type,
            accommodation: self.accommodation,
            quantity: self.quantity,
        }
    }
}

/// The values a room configuration is created or updated with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RoomSpec {
    pub room_type: RoomType,
    pub accommodation: Accommodation,
    pub quantity: u32,
}

impl RoomSpec {
    pub fn new(room_type: RoomType, accommodation: Accommodation, quantity: u32) -> Self {
        Self {
            room_type,
            accommodation,
            quantity,
        }
    }
}

/// Raw room input as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFields {
    pub room_type: String,
    pub accommodation: String,
    pub quantity: i64,
}

impl RoomFields {
    /// Resolve names against the known enumerations and range-check quantity.
    ///
    /// Every bad field is reported. Pairing validity is not checked here;
    /// that is the rule engine's job.
    pub fn parse(&self) -> Result<RoomSpec, ValidationError> {
        let room_type = self.room_type.parse::<RoomType>().map_err(|_| {
            ValidationError::invalid_field("room_type", format!("room_type must be one of {}", names(&RoomType::ALL)))
        });
        let accommodation = self.accommodation.parse::<Accommodation>().map_err(|_| {
            ValidationError::invalid_field(
                "accommodation",
                format!("accommodation must be one of {}", names(&Accommodation::ALL)),
            )
        });
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| (MIN_QUANTITY..=MAX_QUANTITY).contains(q))
            .ok_or_else(quantity_out_of_range);

        match (room_type, accommodation, quantity) {
            (Ok(room_type), Ok(accommodation), Ok(quantity)) => Ok(RoomSpec::new(room_type, accommodation, quantity)),
            (room_type, accommodation, quantity) => {
                let failures = [room_type.err(), accommodation.err(), quantity.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                Err(ValidationError::from_field_failures(failures))
            }
        }
    }
}

fn quantity_out_of_range() -> ValidationError {
    ValidationError::invalid_field(
        "quantity",
        format!("quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}"),
    )
}

fn names<T: core::fmt::Display>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Sum of quantities, optionally leaving one configuration out.
pub fn configured_total(rooms: &[RoomConfiguration], exclude: Option<RoomConfigurationId>) -> u32 {
    rooms
        .iter()
        .filter(|r| Some(r.id) != exclude)
        .map(|r| r.quantity)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(room_type: &str, accommodation: &str, quantity: i64) -> RoomFields {
        RoomFields {
            room_type: room_type.to_string(),
            accommodation: accommodation.to_string(),
            quantity,
        }
    }

    #[test]
    fn parse_resolves_names() {
        let spec = raw("SUITE", "triple", 4).parse().unwrap();
        assert_eq!(spec, RoomSpec::new(RoomType::Suite, Accommodation::Triple, 4));
    }

    #[test]
    fn parse_does_not_check_pairing() {
        assert!(raw("STANDARD", "QUADRUPLE", 1).parse().is_ok());
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(raw("PENTHOUSE", "SINGLE", 1).parse().unwrap_err().field(), "room_type");
        assert_eq!(raw("SUITE", "KING", 1).parse().unwrap_err().field(), "accommodation");
    }

    #[test]
    fn parse_range_checks_quantity() {
        for bad in [0, -1, 201, i64::MAX] {
            assert_eq!(raw("SUITE", "SINGLE", bad).parse().unwrap_err().field(), "quantity");
        }
        assert!(raw("SUITE", "SINGLE", 200).parse().is_ok());
    }

    #[test]
    fn parse_reports_every_bad_field() {
        let err = raw("PENTHOUSE", "KING", 0).parse().unwrap_err();
        let errors = err.field_errors();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["accommodation", "quantity", "room_type"]
        );
        assert_eq!(errors["quantity"], vec!["quantity must be between 1 and 200".to_string()]);
    }

    #[test]
    fn configured_total_honours_exclusion() {
        let now = Utc::now();
        let hotel_id = HotelId::new();
        let a = RoomConfiguration::new(
            RoomConfigurationId::new(),
            hotel_id,
            RoomSpec::new(RoomType::Standard, Accommodation::Single, 8),
            now,
        );
        let b = RoomConfiguration::new(
            RoomConfigurationId::new(),
            hotel_id,
            RoomSpec::new(RoomType::Junior, Accommodation::Triple, 3),
            now,
        );
        let rooms = vec![a.clone(), b];
        assert_eq!(configured_total(&rooms, None), 11);
        assert_eq!(configured_total(&rooms, Some(a.id)), 3);
    }
}
