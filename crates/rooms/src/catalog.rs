//! Room types, accommodations, and the static pairing table.

use std::collections::BTreeMap;

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use hotelier_core::DomainError;

/// Category of room.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Standard,
    Junior,
    Suite,
}

/// Bed/occupancy layout of a room.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Accommodation {
    Single,
    Double,
    Triple,
    Quadruple,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Junior, RoomType::Suite];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "STANDARD",
            RoomType::Junior => "JUNIOR",
            RoomType::Suite => "SUITE",
        }
    }

    /// Accommodations this room type may be configured with.
    pub fn allowed_accommodations(&self) -> &'static [Accommodation] {
        allowed_accommodations(*self)
    }

    pub fn allows(&self, accommodation: Accommodation) -> bool {
        self.allowed_accommodations().contains(&accommodation)
    }
}

impl Accommodation {
    pub const ALL: [Accommodation; 4] = [
        Accommodation::Single,
        Accommodation::Double,
        Accommodation::Triple,
        Accommodation::Quadruple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Accommodation::Single => "SINGLE",
            Accommodation::Double => "DOUBLE",
            Accommodation::Triple => "TRIPLE",
            Accommodation::Quadruple => "QUADRUPLE",
        }
    }
}

impl core::fmt::Display for RoomType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for Accommodation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RoomType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::invalid_value(format!("unknown room type: {s}")))
    }
}

impl FromStr for Accommodation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Accommodation::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::invalid_value(format!("unknown accommodation: {s}")))
    }
}

/// The static room type → accommodation table.
pub fn allowed_accommodations(room_type: RoomType) -> &'static [Accommodation] {
    use Accommodation::*;

    match room_type {
        RoomType::Standard => &[Single, Double],
        RoomType::Junior => &[Triple, Quadruple],
        RoomType::Suite => &[Single, Double, Triple],
    }
}

/// Table lookup by raw name; unrecognized room types allow nothing.
pub fn allowed_accommodations_for(room_type: &str) -> &'static [Accommodation] {
    room_type
        .parse::<RoomType>()
        .map(allowed_accommodations)
        .unwrap_or(&[])
}

/// Payload of the room configuration lookup endpoint.
///
/// Built from the same table the rule engine validates against, so clients that
/// mirror the rules for form hints cannot drift from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCatalog {
    pub room_types: Vec<RoomType>,
    pub allowed_accommodations: BTreeMap<RoomType, Vec<Accommodation>>,
    pub all_accommodations: Vec<Accommodation>,
}

impl RoomCatalog {
    pub fn current() -> Self {
        Self {
            room_types: RoomType::ALL.to_vec(),
            allowed_accommodations: RoomType::ALL
                .into_iter()
                .map(|t| (t, allowed_accommodations(t).to_vec()))
                .collect(),
            all_accommodations: Accommodation::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_product_rules() {
        use Accommodation::*;
        assert_eq!(allowed_accommodations(RoomType::Standard), &[Single, Double]);
        assert_eq!(allowed_accommodations(RoomType::Junior), &[Triple, Quadruple]);
        assert_eq!(allowed_accommodations(RoomType::Suite), &[Single, Double, Triple]);
    }

    #[test]
    fn unknown_room_type_allows_nothing() {
        assert!(allowed_accommodations_for("PENTHOUSE").is_empty());
        assert!(allowed_accommodations_for("").is_empty());
        assert_eq!(allowed_accommodations_for("junior").len(), 2);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(" suite ".parse::<RoomType>().unwrap(), RoomType::Suite);
        assert_eq!("Quadruple".parse::<Accommodation>().unwrap(), Accommodation::Quadruple);
        assert!("KING".parse::<Accommodation>().is_err());
    }

    #[test]
    fn catalog_serializes_with_upper_case_names() {
        let json = serde_json::to_value(RoomCatalog::current()).unwrap();
        assert_eq!(json["room_types"], serde_json::json!(["STANDARD", "JUNIOR", "SUITE"]));
        assert_eq!(
            json["allowed_accommodations"]["JUNIOR"],
            serde_json::json!(["TRIPLE", "QUADRUPLE"])
        );
        assert_eq!(
            json["all_accommodations"],
            serde_json::json!(["SINGLE", "DOUBLE", "TRIPLE", "QUADRUPLE"])
        );
    }
}
