//! Rule engine: pure checks a room configuration must pass before it is stored.
//!
//! Checks run in a fixed order so that the reported error is deterministic:
//!
//! ```text
//! pairing → uniqueness → capacity
//! ```
//!
//! An invalid pairing is always reported before a capacity problem, even when
//! both would fail. The quantity range belongs to [`RoomFields::parse`], so a
//! [`RoomSpec`] reaching these checks is already in range.
//!
//! [`RoomFields::parse`]: crate::room::RoomFields::parse

use hotelier_core::{HotelId, RoomConfigurationId};

use crate::catalog::{Accommodation, RoomType};
use crate::error::ValidationError;
use crate::hotel::Hotel;
use crate::room::{RoomConfiguration, RoomSpec};

/// Fails when `accommodation` is not offered for `room_type`.
pub fn validate_pairing(room_type: RoomType, accommodation: Accommodation) -> Result<(), ValidationError> {
    if room_type.allows(accommodation) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPairing {
            room_type,
            accommodation,
        })
    }
}

/// Fails when another configuration of `hotel_id` already uses the pair.
///
/// `exclude` lets an update compare against everything but itself.
pub fn validate_uniqueness(
    hotel_id: HotelId,
    room_type: RoomType,
    accommodation: Accommodation,
    existing: &[RoomConfiguration],
    exclude: Option<RoomConfigurationId>,
) -> Result<(), ValidationError> {
    let conflict = existing.iter().find(|r| {
        r.hotel_id == hotel_id
            && Some(r.id) != exclude
            && r.room_type == room_type
            && r.accommodation == accommodation
    });

    match conflict {
        Some(r) => Err(ValidationError::DuplicatePairing {
            room_type,
            accommodation,
            conflicting_id: Some(r.id),
        }),
        None => Ok(()),
    }
}

/// Fails when the hotel's total, with `candidate_quantity` in place of the
/// excluded configuration, would exceed `max_rooms`.
pub fn validate_capacity(
    hotel: &Hotel,
    existing: &[RoomConfiguration],
    candidate_quantity: u32,
    exclude: Option<RoomConfigurationId>,
) -> Result<(), ValidationError> {
    let current: u32 = existing
        .iter()
        .filter(|r| r.hotel_id == hotel.id && Some(r.id) != exclude)
        .map(|r| r.quantity)
        .sum();
    let attempted = current.saturating_add(candidate_quantity);

    if attempted > hotel.max_rooms {
        return Err(ValidationError::CapacityExceeded {
            attempted,
            limit: hotel.max_rooms,
        });
    }
    Ok(())
}

/// Run every check for a create (`exclude = None`) or update (`exclude = Some(id)`).
pub fn validate_room(
    hotel: &Hotel,
    existing: &[RoomConfiguration],
    spec: &RoomSpec,
    exclude: Option<RoomConfigurationId>,
) -> Result<(), ValidationError> {
    validate_pairing(spec.room_type, spec.accommodation)?;
    validate_uniqueness(hotel.id, spec.room_type, spec.accommodation, existing, exclude)?;
    validate_capacity(hotel, existing, spec.quantity, exclude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotel::HotelFields;
    use chrono::Utc;

    fn hotel(max_rooms: i64) -> Hotel {
        let profile = HotelFields {
            name: "Decameron Barú".to_string(),
            address: "Playa Blanca".to_string(),
            city: "Cartagena".to_string(),
            tax_id: "55667788-9".to_string(),
            max_rooms,
        }
        .validate()
        .unwrap();
        Hotel::new(HotelId::new(), profile, Utc::now())
    }

    fn room(hotel: &Hotel, room_type: RoomType, accommodation: Accommodation, quantity: u32) -> RoomConfiguration {
        RoomConfiguration::new(
            RoomConfigurationId::new(),
            hotel.id,
            RoomSpec::new(room_type, accommodation, quantity),
            Utc::now(),
        )
    }

    #[test]
    fn junior_single_is_an_invalid_pairing() {
        let err = validate_pairing(RoomType::Junior, Accommodation::Single).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPairing {
                room_type: RoomType::Junior,
                accommodation: Accommodation::Single,
            }
        );
    }

    #[test]
    fn capacity_reports_attempted_total_and_limit() {
        let h = hotel(10);
        let existing = vec![room(&h, RoomType::Standard, Accommodation::Single, 8)];

        let err = validate_capacity(&h, &existing, 3, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CapacityExceeded {
                attempted: 11,
                limit: 10
            }
        );
        assert!(validate_capacity(&h, &existing, 2, None).is_ok());
    }

    #[test]
    fn capacity_excludes_the_record_being_updated() {
        let h = hotel(10);
        let existing = vec![room(&h, RoomType::Standard, Accommodation::Single, 8)];
        assert!(validate_capacity(&h, &existing, 10, Some(existing[0].id)).is_ok());
        assert!(validate_capacity(&h, &existing, 11, Some(existing[0].id)).is_err());
    }

    #[test]
    fn capacity_ignores_other_hotels_rooms() {
        let h = hotel(10);
        let other = hotel(100);
        let existing = vec![room(&other, RoomType::Suite, Accommodation::Double, 50)];
        assert!(validate_capacity(&h, &existing, 10, None).is_ok());
    }

    #[test]
    fn duplicate_pairing_names_the_conflicting_record() {
        let h = hotel(50);
        let existing = vec![room(&h, RoomType::Standard, Accommodation::Single, 5)];

        let err =
            validate_uniqueness(h.id, RoomType::Standard, Accommodation::Single, &existing, None).unwrap_err();
        match err {
            ValidationError::DuplicatePairing { conflicting_id, .. } => {
                assert_eq!(conflicting_id, Some(existing[0].id))
            }
            other => panic!("expected DuplicatePairing, got {other:?}"),
        }

        assert!(
            validate_uniqueness(
                h.id,
                RoomType::Standard,
                Accommodation::Single,
                &existing,
                Some(existing[0].id)
            )
            .is_ok()
        );
    }

    #[test]
    fn same_pair_in_another_hotel_is_not_a_duplicate() {
        let h = hotel(50);
        let other = hotel(50);
        let existing = vec![room(&other, RoomType::Standard, Accommodation::Single, 5)];
        assert!(validate_uniqueness(h.id, RoomType::Standard, Accommodation::Single, &existing, None).is_ok());
    }

    #[test]
    fn pairing_is_reported_before_capacity() {
        let h = hotel(1);
        let existing = vec![room(&h, RoomType::Standard, Accommodation::Single, 1)];
        let spec = RoomSpec::new(RoomType::Standard, Accommodation::Quadruple, 5);

        let err = validate_room(&h, &existing, &spec, None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPairing { .. }));
    }

    #[test]
    fn uniqueness_is_reported_before_capacity() {
        let h = hotel(5);
        let existing = vec![room(&h, RoomType::Suite, Accommodation::Triple, 5)];
        let spec = RoomSpec::new(RoomType::Suite, Accommodation::Triple, 5);

        let err = validate_room(&h, &existing, &spec, None).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicatePairing { .. }));
    }

    #[test]
    fn pairing_is_reported_first_for_any_quantity() {
        let h = hotel(500);
        let spec = RoomSpec::new(RoomType::Junior, Accommodation::Single, crate::room::MAX_QUANTITY + 1);
        let err = validate_room(&h, &[], &spec, None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPairing { .. }));
    }

    #[test]
    fn validate_room_checks_capacity_last() {
        let h = hotel(10);
        let existing = vec![room(&h, RoomType::Standard, Accommodation::Single, 8)];
        let spec = RoomSpec::new(RoomType::Suite, Accommodation::Double, 3);
        let err = validate_room(&h, &existing, &spec, None).unwrap_err();
        assert_eq!(err, ValidationError::CapacityExceeded { attempted: 11, limit: 10 });
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_room_type() -> impl Strategy<Value = RoomType> {
            proptest::sample::select(RoomType::ALL.to_vec())
        }

        fn any_accommodation() -> impl Strategy<Value = Accommodation> {
            proptest::sample::select(Accommodation::ALL.to_vec())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: pairing validation agrees with the static table for every pair.
            #[test]
            fn pairing_agrees_with_table(room_type in any_room_type(), accommodation in any_accommodation()) {
                let allowed = crate::catalog::allowed_accommodations(room_type).contains(&accommodation);
                let result = validate_pairing(room_type, accommodation);
                prop_assert_eq!(result.is_ok(), allowed);
                if let Err(err) = result {
                    let is_invalid_pairing = matches!(err, ValidationError::InvalidPairing { .. });
                    prop_assert!(is_invalid_pairing);
                }
            }

            /// Property: capacity passes exactly when existing + candidate <= max_rooms.
            #[test]
            fn capacity_is_a_simple_sum(
                max_rooms in 1i64..=1000,
                quantities in proptest::collection::vec(1u32..=200, 0..6),
                candidate in 1u32..=200,
            ) {
                let h = hotel(max_rooms);
                let pairs: Vec<(RoomType, Accommodation)> = RoomType::ALL
                    .iter()
                    .flat_map(|t| t.allowed_accommodations().iter().map(move |a| (*t, *a)))
                    .collect();
                let existing: Vec<RoomConfiguration> = quantities
                    .iter()
                    .zip(pairs)
                    .map(|(q, (t, a))| room(&h, t, a, *q))
                    .collect();
                let total: u32 = quantities.iter().take(existing.len()).sum::<u32>() + candidate;

                let result = validate_capacity(&h, &existing, candidate, None);
                prop_assert_eq!(result.is_ok(), total <= h.max_rooms);
            }
        }
    }
}
