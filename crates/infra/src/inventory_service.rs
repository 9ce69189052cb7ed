//! Inventory service (application-level orchestration).
//!
//! The service owns the mutation pipeline for hotels and their room
//! configurations. Every write follows the same shape:
//!
//! ```text
//! Raw fields
//!   ↓
//! 1. Validate and trim fields (pure)
//!   ↓
//! 2. Take the per-hotel lock
//!   ↓
//! 3. Load the hotel and its current room configurations
//!   ↓
//! 4. Run the rule engine: pairing → uniqueness → capacity (pure)
//!   ↓
//! 5. Write through the store, which re-checks its own constraints
//! ```
//!
//! Field validation reports every bad field at once. After that the first
//! failing check is returned and nothing is written.
//!
//! Lock entries exist only for hotels that exist: an id is resolved before
//! its entry is created, and the entry is dropped once the hotel is gone.
//!
//! ## Races
//!
//! The per-hotel lock serializes writers inside one process. Writers in other
//! processes (or a store shared between services) can still interleave between
//! step 3 and step 5; the store rejects those writes and the service reports
//! them with the same `ValidationError` shapes as the in-process checks, with
//! `conflicting_id: None` where the store cannot name the other record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

use hotelier_core::{HotelId, RoomConfigurationId};
use hotelier_rooms::{
    Hotel, HotelFields, HotelInventory, HotelProfile, RoomCatalog, RoomConfiguration, RoomFields, RoomSpec,
    ValidationError, configured_total, validate_room,
};

use crate::store::{InventoryStore, StoreError, UniqueConstraint};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The hotel or room configuration does not exist (or the room belongs to another hotel).
    #[error("not found")]
    NotFound,

    /// The store failed for a reason the caller cannot fix.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Hotel and room configuration operations over an [`InventoryStore`].
///
/// `S` is usually `InMemoryInventoryStore`, `PostgresInventoryStore` or an
/// `Arc<dyn InventoryStore>` chosen at startup.
pub struct InventoryService<S> {
    store: S,
    hotel_locks: Mutex<HashMap<HotelId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S> InventoryService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            hotel_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The static room type → accommodation table.
    pub fn room_catalog(&self) -> RoomCatalog {
        RoomCatalog::current()
    }

    fn hotel_lock(&self, hotel_id: HotelId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.hotel_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(hotel_id).or_default().clone()
    }

    fn forget_hotel_lock(&self, hotel_id: HotelId) {
        let mut locks = self.hotel_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.remove(&hotel_id);
    }

    #[cfg(test)]
    pub(crate) fn tracked_hotel_locks(&self) -> usize {
        self.hotel_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    async fn require_hotel(&self, hotel_id: HotelId) -> ServiceResult<Hotel> {
        self.store.get_hotel(hotel_id).await?.ok_or(ServiceError::NotFound)
    }

    /// Take the hotel's lock and return the hotel as read under it.
    ///
    /// Unknown ids fail before a lock entry is created. A hotel deleted while
    /// waiting for the lock has its entry removed again.
    async fn lock_existing_hotel(&self, hotel_id: HotelId) -> ServiceResult<(Hotel, OwnedMutexGuard<()>)> {
        self.require_hotel(hotel_id).await?;
        let guard = self.hotel_lock(hotel_id).lock_owned().await;

        match self.store.get_hotel(hotel_id).await {
            Ok(Some(hotel)) => Ok((hotel, guard)),
            Ok(None) => {
                drop(guard);
                self.forget_hotel_lock(hotel_id);
                Err(ServiceError::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn inventory_of(&self, hotel: Hotel) -> ServiceResult<HotelInventory> {
        let rooms = self.store.list_rooms(hotel.id).await?;
        Ok(HotelInventory::new(hotel, rooms))
    }

    /// Hotels with nested rooms and derived totals, oldest first.
    ///
    /// `search` keeps hotels whose name, city or tax id contains it, ignoring case.
    pub async fn list_hotels(&self, search: Option<&str>) -> ServiceResult<Vec<HotelInventory>> {
        let hotels = self.store.list_hotels().await?;
        let mut out = Vec::with_capacity(hotels.len());
        for hotel in hotels {
            if search.is_some_and(|needle| !hotel.matches(needle)) {
                continue;
            }
            out.push(self.inventory_of(hotel).await?);
        }
        Ok(out)
    }

    pub async fn get_hotel(&self, id: HotelId) -> ServiceResult<HotelInventory> {
        let hotel = self.require_hotel(id).await?;
        self.inventory_of(hotel).await
    }

    pub async fn create_hotel(&self, fields: HotelFields) -> ServiceResult<HotelInventory> {
        let profile = fields.validate()?;
        let existing = self.store.list_hotels().await?;
        check_unique_fields(&profile, &existing, None)?;

        let hotel = Hotel::new(HotelId::new(), profile, Utc::now());
        self.store
            .insert_hotel(&hotel)
            .await
            .map_err(|e| hotel_write_error(e, &hotel))?;

        info!(hotel_id = %hotel.id, name = %hotel.name, max_rooms = hotel.max_rooms, "hotel created");
        Ok(HotelInventory::new(hotel, Vec::new()))
    }

    /// Replace a hotel's fields.
    ///
    /// Lowering `max_rooms` below the rooms already configured is rejected.
    pub async fn update_hotel(&self, id: HotelId, fields: HotelFields) -> ServiceResult<HotelInventory> {
        let profile = fields.validate()?;

        let (current, _guard) = self.lock_existing_hotel(id).await?;
        let existing = self.store.list_hotels().await?;
        check_unique_fields(&profile, &existing, Some(id))?;

        let rooms = self.store.list_rooms(id).await?;
        let configured = configured_total(&rooms, None);
        if configured > profile.max_rooms {
            return Err(ValidationError::CapacityBelowConfigured {
                configured,
                requested: profile.max_rooms,
            }
            .into());
        }

        let updated = current.with_profile(profile, Utc::now());
        self.store
            .update_hotel(&updated)
            .await
            .map_err(|e| hotel_write_error(e, &updated))?;

        info!(hotel_id = %id, max_rooms = updated.max_rooms, "hotel updated");
        Ok(HotelInventory::new(updated, rooms))
    }

    /// Delete a hotel and all of its room configurations.
    pub async fn delete_hotel(&self, id: HotelId) -> ServiceResult<()> {
        let (_, guard) = self.lock_existing_hotel(id).await?;
        let deleted = self.store.delete_hotel(id).await;
        drop(guard);
        self.forget_hotel_lock(id);
        deleted?;

        info!(hotel_id = %id, "hotel deleted");
        Ok(())
    }

    pub async fn list_room_configurations(&self, hotel_id: HotelId) -> ServiceResult<Vec<RoomConfiguration>> {
        self.require_hotel(hotel_id).await?;
        Ok(self.store.list_rooms(hotel_id).await?)
    }

    /// Fetch a room configuration, requiring it to belong to `hotel_id`.
    pub async fn get_room_configuration(
        &self,
        hotel_id: HotelId,
        room_id: RoomConfigurationId,
    ) -> ServiceResult<RoomConfiguration> {
        match self.store.get_room(room_id).await? {
            Some(room) if room.hotel_id == hotel_id => Ok(room),
            _ => Err(ServiceError::NotFound),
        }
    }

    pub async fn add_room_configuration(
        &self,
        hotel_id: HotelId,
        fields: RoomFields,
    ) -> ServiceResult<RoomConfiguration> {
        let (hotel, _guard) = self.lock_existing_hotel(hotel_id).await?;
        let spec = fields.parse()?;
        let existing = self.store.list_rooms(hotel_id).await?;
        validate_room(&hotel, &existing, &spec, None)?;

        let room = RoomConfiguration::new(RoomConfigurationId::new(), hotel_id, spec, Utc::now());
        self.store
            .insert_room(&room)
            .await
            .map_err(|e| room_write_error(e, &room.spec()))?;

        info!(
            hotel_id = %hotel_id,
            room_id = %room.id,
            room_type = %room.room_type,
            accommodation = %room.accommodation,
            quantity = room.quantity,
            "room configuration added"
        );
        Ok(room)
    }

    /// Overwrite a room configuration in place.
    ///
    /// The record's own quantity and pair are left out of the checks, so
    /// resubmitting unchanged values always succeeds.
    pub async fn update_room_configuration(
        &self,
        hotel_id: HotelId,
        room_id: RoomConfigurationId,
        fields: RoomFields,
    ) -> ServiceResult<RoomConfiguration> {
        let (hotel, _guard) = self.lock_existing_hotel(hotel_id).await?;
        let current = self.get_room_configuration(hotel_id, room_id).await?;
        let spec = fields.parse()?;
        let existing = self.store.list_rooms(hotel_id).await?;
        validate_room(&hotel, &existing, &spec, Some(room_id))?;

        let updated = current.with_spec(spec, Utc::now());
        self.store
            .update_room(&updated)
            .await
            .map_err(|e| room_write_error(e, &spec))?;

        info!(
            hotel_id = %hotel_id,
            room_id = %room_id,
            quantity = updated.quantity,
            "room configuration updated"
        );
        Ok(updated)
    }

    pub async fn delete_room_configuration(
        &self,
        hotel_id: HotelId,
        room_id: RoomConfigurationId,
    ) -> ServiceResult<()> {
        let (_, _guard) = self.lock_existing_hotel(hotel_id).await?;
        self.get_room_configuration(hotel_id, room_id).await?;
        self.store.delete_room(room_id).await?;

        info!(hotel_id = %hotel_id, room_id = %room_id, "room configuration deleted");
        Ok(())
    }
}

/// Exact, case-sensitive comparison of name and tax id against other hotels.
fn check_unique_fields(profile: &HotelProfile, existing: &[Hotel], exclude: Option<HotelId>) -> ServiceResult<()> {
    for other in existing.iter().filter(|h| Some(h.id) != exclude) {
        if other.name == profile.name {
            return Err(ValidationError::UniqueFieldConflict {
                field: "name",
                value: profile.name.clone(),
            }
            .into());
        }
        if other.tax_id == profile.tax_id {
            return Err(ValidationError::UniqueFieldConflict {
                field: "tax_id",
                value: profile.tax_id.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn hotel_write_error(err: StoreError, hotel: &Hotel) -> ServiceError {
    let translated = match &err {
        StoreError::UniqueViolation(UniqueConstraint::HotelName) => ValidationError::UniqueFieldConflict {
            field: "name",
            value: hotel.name.clone(),
        },
        StoreError::UniqueViolation(UniqueConstraint::HotelTaxId) => ValidationError::UniqueFieldConflict {
            field: "tax_id",
            value: hotel.tax_id.clone(),
        },
        StoreError::CapacityExceeded { attempted, limit } => ValidationError::CapacityBelowConfigured {
            configured: *attempted,
            requested: *limit,
        },
        _ => return err.into(),
    };
    warn!(hotel_id = %hotel.id, error = %err, "hotel write rejected by store after passing checks");
    translated.into()
}

fn room_write_error(err: StoreError, spec: &RoomSpec) -> ServiceError {
    let translated = match &err {
        StoreError::UniqueViolation(UniqueConstraint::RoomPairing) => ValidationError::DuplicatePairing {
            room_type: spec.room_type,
            accommodation: spec.accommodation,
            conflicting_id: None,
        },
        StoreError::CapacityExceeded { attempted, limit } => ValidationError::CapacityExceeded {
            attempted: *attempted,
            limit: *limit,
        },
        _ => return err.into(),
    };
    warn!(
        room_type = %spec.room_type,
        accommodation = %spec.accommodation,
        error = %err,
        "room write rejected by store after passing checks"
    );
    translated.into()
}
