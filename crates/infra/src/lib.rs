//! Infrastructure layer: persistence adapters and the inventory service.

pub mod inventory_service;
pub mod seed;
pub mod store;

pub use inventory_service::{InventoryService, ServiceError};
