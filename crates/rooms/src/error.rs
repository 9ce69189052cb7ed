//! Validation failures surfaced to callers.

use std::collections::BTreeMap;

use thiserror::Error;

use hotelier_core::RoomConfigurationId;

use crate::catalog::{Accommodation, RoomType};

/// A proposed hotel or room configuration was rejected.
///
/// Every variant is recoverable by the caller: it names the offending request
/// field and carries the values needed to correct the input and resubmit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A single field is missing, malformed, or out of range.
    #[error("{field}: {message}")]
    InvalidField { field: &'static str, message: String },

    /// Several fields failed at once; messages keyed by field.
    #[error("invalid fields: {}", join_keys(.0))]
    InvalidFields(BTreeMap<&'static str, Vec<String>>),

    /// The accommodation is not offered for the room type.
    #[error("accommodation {accommodation} is not allowed for room type {room_type}")]
    InvalidPairing {
        room_type: RoomType,
        accommodation: Accommodation,
    },

    /// The hotel already has a configuration for this type/accommodation pair.
    #[error("hotel already has a {room_type}/{accommodation} room configuration")]
    DuplicatePairing {
        room_type: RoomType,
        accommodation: Accommodation,
        /// `None` when the conflict was detected by the store rather than in-process.
        conflicting_id: Option<RoomConfigurationId>,
    },

    /// Adding the candidate quantity would push the hotel past `max_rooms`.
    #[error("room total {attempted} exceeds hotel capacity of {limit}")]
    CapacityExceeded { attempted: u32, limit: u32 },

    /// A hotel update would set `max_rooms` below the rooms already configured.
    #[error("max_rooms {requested} is below the {configured} rooms already configured")]
    CapacityBelowConfigured { configured: u32, requested: u32 },

    /// Hotel name or tax id is already used by another hotel.
    #[error("{field} {value:?} is already used by another hotel")]
    UniqueFieldConflict { field: &'static str, value: String },
}

impl ValidationError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Merge per-field failures. A single failure is returned unchanged.
    pub fn from_field_failures(mut failures: Vec<ValidationError>) -> Self {
        if failures.len() == 1 {
            return failures.remove(0);
        }
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for failure in failures {
            for (field, messages) in failure.field_errors() {
                map.entry(field).or_default().extend(messages);
            }
        }
        Self::InvalidFields(map)
    }

    /// The request field this error should be reported against.
    ///
    /// For `InvalidFields` this is the alphabetically first field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidField { field, .. } => *field,
            ValidationError::InvalidFields(map) => map.keys().next().copied().unwrap_or("fields"),
            ValidationError::InvalidPairing { .. } | ValidationError::DuplicatePairing { .. } => {
                "accommodation"
            }
            ValidationError::CapacityExceeded { .. } => "quantity",
            ValidationError::CapacityBelowConfigured { .. } => "max_rooms",
            ValidationError::UniqueFieldConflict { field, .. } => *field,
        }
    }

    /// Field-keyed message map for transport layers.
    pub fn field_errors(&self) -> BTreeMap<&'static str, Vec<String>> {
        let message = match self {
            ValidationError::InvalidFields(map) => return map.clone(),
            ValidationError::InvalidField { message, .. } => message.clone(),
            other => other.to_string(),
        };
        BTreeMap::from([(self.field(), vec![message])])
    }
}

fn join_keys(map: &BTreeMap<&'static str, Vec<String>>) -> String {
    map.keys().copied().collect::<Vec<_>>().join(", ")
}
