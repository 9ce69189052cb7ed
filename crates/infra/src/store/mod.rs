//! Persistence collaborator for hotels and their room configurations.
//!
//! Stores are the last line of defense for the inventory invariants. Whatever
//! the service checked in-process, a store must still reject at write time:
//!
//! - a second hotel with the same `name` or `tax_id`
//! - a second room configuration with the same `(hotel_id, room_type, accommodation)`
//! - a room write or hotel update that would leave the hotel's configured total above `max_rooms`
//!
//! and must cascade hotel deletion to the hotel's room configurations.

use std::sync::Arc;

use thiserror::Error;

use hotelier_core::{HotelId, RoomConfigurationId};
use hotelier_rooms::{Hotel, RoomConfiguration};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;

/// Storage-level uniqueness constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueConstraint {
    HotelName,
    HotelTaxId,
    RoomPairing,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unique constraint violated: {0:?}")]
    UniqueViolation(UniqueConstraint),

    /// The write would push the hotel's configured total past its `max_rooms`.
    #[error("capacity exceeded: {attempted} > {limit}")]
    CapacityExceeded { attempted: u32, limit: u32 },

    /// The record (or the hotel owning it) does not exist.
    #[error("not found")]
    NotFound,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Async CRUD interface over hotels and room configurations.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// All hotels, oldest first.
    async fn list_hotels(&self) -> Result<Vec<Hotel>, StoreError>;

    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError>;

    async fn insert_hotel(&self, hotel: &Hotel) -> Result<(), StoreError>;

    /// Replace a hotel's fields. Fails with `CapacityExceeded` when the new
    /// `max_rooms` is below the rooms already configured.
    async fn update_hotel(&self, hotel: &Hotel) -> Result<(), StoreError>;

    /// Delete a hotel and every room configuration it owns.
    async fn delete_hotel(&self, id: HotelId) -> Result<(), StoreError>;

    /// Room configurations of one hotel, oldest first.
    async fn list_rooms(&self, hotel_id: HotelId) -> Result<Vec<RoomConfiguration>, StoreError>;

    async fn get_room(&self, id: RoomConfigurationId) -> Result<Option<RoomConfiguration>, StoreError>;

    async fn insert_room(&self, room: &RoomConfiguration) -> Result<(), StoreError>;

    /// Overwrite a room configuration in place (same id, same hotel).
    async fn update_room(&self, room: &RoomConfiguration) -> Result<(), StoreError>;

    async fn delete_room(&self, id: RoomConfigurationId) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn list_hotels(&self) -> Result<Vec<Hotel>, StoreError> {
        (**self).list_hotels().await
    }

    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError> {
        (**self).get_hotel(id).await
    }

    async fn insert_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        (**self).insert_hotel(hotel).await
    }

    async fn update_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        (**self).update_hotel(hotel).await
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<(), StoreError> {
        (**self).delete_hotel(id).await
    }

    async fn list_rooms(&self, hotel_id: HotelId) -> Result<Vec<RoomConfiguration>, StoreError> {
        (**self).list_rooms(hotel_id).await
    }

    async fn get_room(&self, id: RoomConfigurationId) -> Result<Option<RoomConfiguration>, StoreError> {
        (**self).get_room(id).await
    }

    async fn insert_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        (**self).insert_room(room).await
    }

    async fn update_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        (**self).update_room(room).await
    }

    async fn delete_room(&self, id: RoomConfigurationId) -> Result<(), StoreError> {
        (**self).delete_room(id).await
    }
}
