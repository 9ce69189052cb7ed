//! Postgres-backed inventory store.
//!
//! Uniqueness and cascade are enforced by the schema in
//! `migrations/0001_inventory.sql`. Capacity cannot be expressed as a table
//! constraint, so every room write (and every hotel update) runs in a
//! transaction that first takes a row lock on the owning hotel:
//!
//! ```text
//! BEGIN
//!   SELECT max_rooms FROM hotels WHERE id = $1 FOR UPDATE
//!   SELECT SUM(quantity) ... (excluding the row being written)
//!   INSERT / UPDATE
//! COMMIT
//! ```
//!
//! Concurrent writers for the same hotel queue on that lock, so the capacity
//! check and the write are serialized per hotel across processes.
//!
//! ## Error Mapping
//!
//! | PostgreSQL Error Code | Constraint | StoreError |
//! |-----------------------|------------|------------|
//! | `23505` | `hotels_name_key` | `UniqueViolation(HotelName)` |
//! | `23505` | `hotels_tax_id_key` | `UniqueViolation(HotelTaxId)` |
//! | `23505` | `room_configurations_pairing_key` | `UniqueViolation(RoomPairing)` |
//! | `23503` | hotel foreign key | `NotFound` |
//! | any other | | `Backend` |

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use tracing::instrument;
use uuid::Uuid;

use hotelier_core::{HotelId, RoomConfigurationId};
use hotelier_rooms::{Accommodation, Hotel, RoomConfiguration, RoomType};

use super::{InventoryStore, StoreError, UniqueConstraint};

const SCHEMA: &str = include_str!("../../migrations/0001_inventory.sql");

/// Postgres inventory store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and constraints if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    /// Lock the hotel row and return its `max_rooms`.
    async fn lock_hotel(
        tx: &mut Transaction<'_, Postgres>,
        hotel_id: HotelId,
    ) -> Result<u32, StoreError> {
        let row = sqlx::query("SELECT max_rooms FROM hotels WHERE id = $1 FOR UPDATE")
            .bind(hotel_id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("lock_hotel", e))?
            .ok_or(StoreError::NotFound)?;
        let max_rooms: i32 = row
            .try_get("max_rooms")
            .map_err(|e| map_sqlx_error("lock_hotel", e))?;
        to_u32("max_rooms", max_rooms)
    }

    async fn configured_total(
        tx: &mut Transaction<'_, Postgres>,
        hotel_id: HotelId,
        exclude: Option<RoomConfigurationId>,
    ) -> Result<u32, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::BIGINT AS total
            FROM room_configurations
            WHERE hotel_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(hotel_id.as_uuid())
        .bind(exclude.map(Uuid::from))
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("configured_total", e))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("configured_total", e))?;
        u32::try_from(total).map_err(|_| StoreError::Backend(format!("configured total out of range: {total}")))
    }

    async fn check_capacity(
        tx: &mut Transaction<'_, Postgres>,
        room: &RoomConfiguration,
    ) -> Result<(), StoreError> {
        let limit = Self::lock_hotel(tx, room.hotel_id).await?;
        let attempted = Self::configured_total(tx, room.hotel_id, Some(room.id))
            .await?
            .saturating_add(room.quantity);
        if attempted > limit {
            return Err(StoreError::CapacityExceeded { attempted, limit });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), err)]
    async fn list_hotels(&self) -> Result<Vec<Hotel>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, address, city, tax_id, max_rooms, created_at, updated_at
            FROM hotels
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_hotels", e))?;

        rows.iter().map(hotel_from_row).collect()
    }

    #[instrument(skip(self), fields(hotel_id = %id), err)]
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, address, city, tax_id, max_rooms, created_at, updated_at
            FROM hotels
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_hotel", e))?;

        row.as_ref().map(hotel_from_row).transpose()
    }

    #[instrument(skip(self, hotel), fields(hotel_id = %hotel.id), err)]
    async fn insert_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO hotels (id, name, address, city, tax_id, max_rooms, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(hotel.id.as_uuid())
        .bind(&hotel.name)
        .bind(&hotel.address)
        .bind(&hotel.city)
        .bind(&hotel.tax_id)
        .bind(to_i32("max_rooms", hotel.max_rooms)?)
        .bind(hotel.created_at)
        .bind(hotel.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_hotel", e))?;
        Ok(())
    }

    #[instrument(skip(self, hotel), fields(hotel_id = %hotel.id), err)]
    async fn update_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error("begin", e))?;

        Self::lock_hotel(&mut tx, hotel.id).await?;
        let configured = Self::configured_total(&mut tx, hotel.id, None).await?;
        if configured > hotel.max_rooms {
            return Err(StoreError::CapacityExceeded {
                attempted: configured,
                limit: hotel.max_rooms,
            });
        }

        sqlx::query(
            r#"
            UPDATE hotels
            SET name = $2, address = $3, city = $4, tax_id = $5, max_rooms = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(hotel.id.as_uuid())
        .bind(&hotel.name)
        .bind(&hotel.address)
        .bind(&hotel.city)
        .bind(&hotel.tax_id)
        .bind(to_i32("max_rooms", hotel.max_rooms)?)
        .bind(hotel.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_hotel", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    #[instrument(skip(self), fields(hotel_id = %id), err)]
    async fn delete_hotel(&self, id: HotelId) -> Result<(), StoreError> {
        // Rooms go with the hotel via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_hotel", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(hotel_id = %hotel_id), err)]
    async fn list_rooms(&self, hotel_id: HotelId) -> Result<Vec<RoomConfiguration>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, hotel_id, room_type, accommodation, quantity, created_at, updated_at
            FROM room_configurations
            WHERE hotel_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(hotel_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_rooms", e))?;

        rows.iter().map(room_from_row).collect()
    }

    #[instrument(skip(self), fields(room_id = %id), err)]
    async fn get_room(&self, id: RoomConfigurationId) -> Result<Option<RoomConfiguration>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, hotel_id, room_type, accommodation, quantity, created_at, updated_at
            FROM room_configurations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_room", e))?;

        row.as_ref().map(room_from_row).transpose()
    }

    #[instrument(skip(self, room), fields(room_id = %room.id, hotel_id = %room.hotel_id), err)]
    async fn insert_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error("begin", e))?;
        Self::check_capacity(&mut tx, room).await?;

        sqlx::query(
            r#"
            INSERT INTO room_configurations
                (id, hotel_id, room_type, accommodation, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(room.id.as_uuid())
        .bind(room.hotel_id.as_uuid())
        .bind(room.room_type.as_str())
        .bind(room.accommodation.as_str())
        .bind(to_i32("quantity", room.quantity)?)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_room", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    #[instrument(skip(self, room), fields(room_id = %room.id, hotel_id = %room.hotel_id), err)]
    async fn update_room(&self, room: &RoomConfiguration) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error("begin", e))?;
        Self::check_capacity(&mut tx, room).await?;

        let result = sqlx::query(
            r#"
            UPDATE room_configurations
            SET room_type = $3, accommodation = $4, quantity = $5, updated_at = $6
            WHERE id = $1 AND hotel_id = $2
            "#,
        )
        .bind(room.id.as_uuid())
        .bind(room.hotel_id.as_uuid())
        .bind(room.room_type.as_str())
        .bind(room.accommodation.as_str())
        .bind(to_i32("quantity", room.quantity)?)
        .bind(room.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_room", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    #[instrument(skip(self), fields(room_id = %id), err)]
    async fn delete_room(&self, id: RoomConfigurationId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM room_configurations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_room", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// SQLx row types

#[derive(Debug)]
struct HotelRow {
    id: Uuid,
    name: String,
    address: String,
    city: String,
    tax_id: String,
    max_rooms: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for HotelRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(HotelRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            tax_id: row.try_get("tax_id")?,
            max_rooms: row.try_get("max_rooms")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<HotelRow> for Hotel {
    type Error = StoreError;

    fn try_from(row: HotelRow) -> Result<Self, Self::Error> {
        Ok(Hotel {
            id: HotelId::from_uuid(row.id),
            name: row.name,
            address: row.address,
            city: row.city,
            tax_id: row.tax_id,
            max_rooms: to_u32("max_rooms", row.max_rooms)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug)]
struct RoomRow {
    id: Uuid,
    hotel_id: Uuid,
    room_type: String,
    accommodation: String,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for RoomRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(RoomRow {
            id: row.try_get("id")?,
            hotel_id: row.try_get("hotel_id")?,
            room_type: row.try_get("room_type")?,
            accommodation: row.try_get("accommodation")?,
            quantity: row.try_get("quantity")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<RoomRow> for RoomConfiguration {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let room_type: RoomType = row
            .room_type
            .parse()
            .map_err(|e| StoreError::Backend(format!("corrupt room row {}: {e}", row.id)))?;
        let accommodation: Accommodation = row
            .accommodation
            .parse()
            .map_err(|e| StoreError::Backend(format!("corrupt room row {}: {e}", row.id)))?;
        Ok(RoomConfiguration {
            id: RoomConfigurationId::from_uuid(row.id),
            hotel_id: HotelId::from_uuid(row.hotel_id),
            room_type,
            accommodation,
            quantity: to_u32("quantity", row.quantity)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn hotel_from_row(row: &PgRow) -> Result<Hotel, StoreError> {
    let row = <HotelRow as sqlx::FromRow<'_, PgRow>>::from_row(row).map_err(|e| map_sqlx_error("decode_hotel", e))?;
    Hotel::try_from(row)
}

fn room_from_row(row: &PgRow) -> Result<RoomConfiguration, StoreError> {
    let row = <RoomRow as sqlx::FromRow<'_, PgRow>>::from_row(row).map_err(|e| map_sqlx_error("decode_room", e))?;
    RoomConfiguration::try_from(row)
}

fn to_i32(column: &str, value: u32) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Backend(format!("{column} out of range: {value}")))
}

fn to_u32(column: &str, value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Backend(format!("{column} out of range: {value}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            match classify_database_error(code.as_deref(), db_err.constraint()) {
                Some(mapped) => mapped,
                None if code.as_deref() == Some("23505") => StoreError::Backend(format!(
                    "unexpected unique violation in {}: {}",
                    operation,
                    db_err.message()
                )),
                None => StoreError::Backend(format!("database error in {}: {}", operation, db_err.message())),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// SQLSTATE and constraint name to a domain-visible store error.
///
/// `None` means the failure has no domain meaning and is reported as `Backend`.
fn classify_database_error(code: Option<&str>, constraint: Option<&str>) -> Option<StoreError> {
    match (code?, constraint) {
        ("23505", Some("hotels_name_key")) => Some(StoreError::UniqueViolation(UniqueConstraint::HotelName)),
        ("23505", Some("hotels_tax_id_key")) => Some(StoreError::UniqueViolation(UniqueConstraint::HotelTaxId)),
        ("23505", Some("room_configurations_pairing_key")) => {
            Some(StoreError::UniqueViolation(UniqueConstraint::RoomPairing))
        }
        // Only FK in the schema is room → hotel.
        ("23503", _) => Some(StoreError::NotFound),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_row(room_type: &str, accommodation: &str, quantity: i32) -> RoomRow {
        let now = Utc::now();
        RoomRow {
            id: *RoomConfigurationId::new().as_uuid(),
            hotel_id: *HotelId::new().as_uuid(),
            room_type: room_type.to_string(),
            accommodation: accommodation.to_string(),
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unique_violations_map_by_constraint_name() {
        assert_eq!(
            classify_database_error(Some("23505"), Some("hotels_name_key")),
            Some(StoreError::UniqueViolation(UniqueConstraint::HotelName))
        );
        assert_eq!(
            classify_database_error(Some("23505"), Some("hotels_tax_id_key")),
            Some(StoreError::UniqueViolation(UniqueConstraint::HotelTaxId))
        );
        assert_eq!(
            classify_database_error(Some("23505"), Some("room_configurations_pairing_key")),
            Some(StoreError::UniqueViolation(UniqueConstraint::RoomPairing))
        );
        assert_eq!(classify_database_error(Some("23505"), Some("hotels_pkey")), None);
        assert_eq!(classify_database_error(Some("23505"), None), None);
    }

    #[test]
    fn foreign_key_violation_is_not_found() {
        assert_eq!(
            classify_database_error(Some("23503"), Some("room_configurations_hotel_id_fkey")),
            Some(StoreError::NotFound)
        );
        assert_eq!(classify_database_error(Some("23503"), None), Some(StoreError::NotFound));
    }

    #[test]
    fn other_database_errors_are_unclassified() {
        assert_eq!(classify_database_error(Some("40001"), None), None);
        assert_eq!(classify_database_error(None, Some("hotels_name_key")), None);
    }

    #[test]
    fn non_database_errors_become_backend() {
        assert_eq!(
            map_sqlx_error("insert_room", sqlx::Error::PoolClosed),
            StoreError::Backend("connection pool closed in insert_room".to_string())
        );
        assert!(matches!(
            map_sqlx_error("get_hotel", sqlx::Error::RowNotFound),
            StoreError::Backend(msg) if msg.starts_with("sqlx error in get_hotel")
        ));
    }

    #[test]
    fn room_row_decodes_into_configuration() {
        let row = room_row("SUITE", "DOUBLE", 7);
        let id = row.id;
        let room = RoomConfiguration::try_from(row).unwrap();
        assert_eq!(*room.id.as_uuid(), id);
        assert_eq!(room.room_type, RoomType::Suite);
        assert_eq!(room.accommodation, Accommodation::Double);
        assert_eq!(room.quantity, 7);
    }

    #[test]
    fn corrupt_room_rows_are_backend_errors() {
        let rows = [
            room_row("PENTHOUSE", "DOUBLE", 1),
            room_row("SUITE", "KING", 1),
            room_row("SUITE", "DOUBLE", -3),
        ];
        for row in rows {
            let err = RoomConfiguration::try_from(row).unwrap_err();
            assert!(matches!(err, StoreError::Backend(_)), "got {err:?}");
        }
    }

    #[test]
    fn negative_max_rooms_is_a_backend_error() {
        let now = Utc::now();
        let row = HotelRow {
            id: *HotelId::new().as_uuid(),
            name: "Decameron Barú".to_string(),
            address: "Playa Blanca".to_string(),
            city: "Cartagena".to_string(),
            tax_id: "55667788-9".to_string(),
            max_rooms: -1,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            Hotel::try_from(row).unwrap_err(),
            StoreError::Backend("max_rooms out of range: -1".to_string())
        );
    }
}
