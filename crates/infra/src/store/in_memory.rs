//! In-memory inventory store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use hotelier_core::{HotelId, RoomConfigurationId};
use hotelier_rooms::{Hotel, RoomConfiguration, configured_total};

use super::{InventoryStore, StoreError, UniqueConstraint};

#[derive(Debug, Default)]
struct State {
    hotels: HashMap<HotelId, Hotel>,
    rooms: HashMap<RoomConfigurationId, RoomConfiguration>,
}

impl State {
    fn rooms_of(&self, hotel_id: HotelId) -> Vec<RoomConfiguration> {
        let mut rooms: Vec<RoomConfiguration> = self
            .rooms
            .values()
            .filter(|r| r.hotel_id == hotel_id)
            .cloned()
            .collect();
        rooms.sort_by_key(|r| (r.created_at, r.id));
        rooms
    }

    fn check_hotel_unique(&self, hotel: &Hotel) -> Result<(), StoreError> {
        for other in self.hotels.values().filter(|h| h.id != hotel.id) {
            if other.name == hotel.name {
                return Err(StoreError::UniqueViolation(UniqueConstraint::HotelName));
            }
            if other.tax_id == hotel.tax_id {
                return Err(StoreError::UniqueViolation(UniqueConstraint::HotelTaxId));
            }
        }
        Ok(())
    }

    /// Same checks the relational schema and the locking transaction apply.
    fn check_room_write(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        let hotel = self.hotels.get(&room.hotel_id).ok_or(StoreError::NotFound)?;
        let siblings = self.rooms_of(room.hotel_id);

        if siblings
            .iter()
            .any(|r| r.id != room.id && r.room_type == room.room_type && r.accommodation == room.accommodation)
        {
            return Err(StoreError::UniqueViolation(UniqueConstraint::RoomPairing));
        }

        let attempted = configured_total(&siblings, Some(room.id)).saturating_add(room.quantity);
        if attempted > hotel.max_rooms {
            return Err(StoreError::CapacityExceeded {
                attempted,
                limit: hotel.max_rooms,
            });
        }
        Ok(())
    }
}

/// `RwLock`-guarded maps enforcing the same constraints as the Postgres schema.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, StoreError> {
        let state = self.read()?;
        let mut hotels: Vec<Hotel> = state.hotels.values().cloned().collect();
        hotels.sort_by_key(|h| (h.created_at, h.id));
        Ok(hotels)
    }

    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError> {
        Ok(self.read()?.hotels.get(&id).cloned())
    }

    async fn insert_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.check_hotel_unique(hotel)?;
        state.hotels.insert(hotel.id, hotel.clone());
        Ok(())
    }

    async fn update_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.hotels.contains_key(&hotel.id) {
            return Err(StoreError::NotFound);
        }
        state.check_hotel_unique(hotel)?;

        let configured = configured_total(&state.rooms_of(hotel.id), None);
        if configured > hotel.max_rooms {
            return Err(StoreError::CapacityExceeded {
                attempted: configured,
                limit: hotel.max_rooms,
            });
        }

        state.hotels.insert(hotel.id, hotel.clone());
        Ok(())
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.hotels.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        state.rooms.retain(|_, r| r.hotel_id != id);
        Ok(())
    }

    async fn list_rooms(&self, hotel_id: HotelId) -> Result<Vec<RoomConfiguration>, StoreError> {
        Ok(self.read()?.rooms_of(hotel_id))
    }

    async fn get_room(&self, id: RoomConfigurationId) -> Result<Option<RoomConfiguration>, StoreError> {
        Ok(self.read()?.rooms.get(&id).cloned())
    }

    async fn insert_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.check_room_write(room)?;
        state.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn update_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        let mut state = self.write()?;
        match state.rooms.get(&room.id) {
            Some(existing) if existing.hotel_id == room.hotel_id => {}
            _ => return Err(StoreError::NotFound),
        }
        state.check_room_write(room)?;
        state.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn delete_room(&self, id: RoomConfigurationId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.rooms.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
