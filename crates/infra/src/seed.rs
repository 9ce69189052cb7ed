//! Demo data: five beach hotels and their room configurations.
//!
//! Everything goes through [`InventoryService`], so seeded data satisfies the
//! same pairing, uniqueness and capacity rules as user input.

use tracing::info;

use hotelier_rooms::{Accommodation, HotelFields, RoomFields, RoomType};

use crate::inventory_service::{InventoryService, ServiceResult};
use crate::store::InventoryStore;

struct DemoHotel {
    name: &'static str,
    address: &'static str,
    city: &'static str,
    tax_id: &'static str,
    max_rooms: i64,
    rooms: &'static [(RoomType, Accommodation, i64)],
}

const DEMO_HOTELS: &[DemoHotel] = &[
    DemoHotel {
        name: "Decameron Cartagena",
        address: "Calle 23 58-25",
        city: "Cartagena",
        tax_id: "12345678-9",
        max_rooms: 42,
        rooms: &[
            (RoomType::Standard, Accommodation::Single, 25),
            (RoomType::Junior, Accommodation::Triple, 12),
            (RoomType::Standard, Accommodation::Double, 5),
        ],
    },
    DemoHotel {
        name: "Decameron San Andrés",
        address: "Avenida Colombia No. 1-19",
        city: "San Andrés",
        tax_id: "98765432-1",
        max_rooms: 60,
        rooms: &[
            (RoomType::Standard, Accommodation::Single, 30),
            (RoomType::Junior, Accommodation::Triple, 20),
            (RoomType::Suite, Accommodation::Double, 10),
        ],
    },
    DemoHotel {
        name: "Decameron Marazul",
        address: "Km 14 Vía San Andrés",
        city: "San Andrés",
        tax_id: "11223344-5",
        max_rooms: 35,
        rooms: &[
            (RoomType::Standard, Accommodation::Double, 15),
            (RoomType::Junior, Accommodation::Quadruple, 15),
            (RoomType::Suite, Accommodation::Triple, 5),
        ],
    },
    DemoHotel {
        name: "Decameron Barú",
        address: "Playa Blanca, Isla Barú",
        city: "Cartagena",
        tax_id: "55667788-9",
        max_rooms: 28,
        rooms: &[
            (RoomType::Standard, Accommodation::Single, 20),
            (RoomType::Suite, Accommodation::Single, 8),
        ],
    },
    DemoHotel {
        name: "Decameron Los Cocos",
        address: "Carrera 3 No. 8-60",
        city: "Rincón del Mar",
        tax_id: "99887766-3",
        max_rooms: 50,
        rooms: &[
            (RoomType::Standard, Accommodation::Double, 25),
            (RoomType::Junior, Accommodation::Triple, 15),
        ],
    },
];

/// Seed the demo hotels unless the store already holds any hotel.
///
/// Returns the number of hotels created.
pub async fn seed_demo_data<S: InventoryStore>(service: &InventoryService<S>) -> ServiceResult<usize> {
    if !service.list_hotels(None).await?.is_empty() {
        info!("store already has hotels; skipping demo seed");
        return Ok(0);
    }

    for demo in DEMO_HOTELS {
        let hotel = service
            .create_hotel(HotelFields {
                name: demo.name.to_string(),
                address: demo.address.to_string(),
                city: demo.city.to_string(),
                tax_id: demo.tax_id.to_string(),
                max_rooms: demo.max_rooms,
            })
            .await?;

        for (room_type, accommodation, quantity) in demo.rooms {
            service
                .add_room_configuration(
                    hotel.hotel.id,
                    RoomFields {
                        room_type: room_type.to_string(),
                        accommodation: accommodation.to_string(),
                        quantity: *quantity,
                    },
                )
                .await?;
        }
    }

    info!(hotels = DEMO_HOTELS.len(), "demo data seeded");
    Ok(DEMO_HOTELS.len())
}
