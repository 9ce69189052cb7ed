//! Room inventory domain module.
//!
//! This crate contains the business rules for hotels and their room
//! configurations, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage). The rule engine in [`rules`] is what every mutating
//! operation must pass before anything is persisted.

pub mod catalog;
pub mod error;
pub mod hotel;
pub mod room;
pub mod rules;

pub use catalog::{Accommodation, RoomCatalog, RoomType, allowed_accommodations, allowed_accommodations_for};
pub use error::ValidationError;
pub use hotel::{Hotel, HotelFields, HotelInventory, HotelProfile};
pub use room::{RoomConfiguration, RoomFields, RoomSpec, configured_total};
pub use rules::{validate_capacity, validate_pairing, validate_room, validate_uniqueness};
