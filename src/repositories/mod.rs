//! Repositorios
//!
//! Acceso a datos: el trait `VehicleRepository` y sus implementaciones
//! PostgreSQL (JSONB) y en memoria.

pub mod memory_vehicle_repository;
pub mod vehicle_repository;

pub use memory_vehicle_repository::InMemoryVehicleRepository;
pub use vehicle_repository::{PgVehicleRepository, VehicleRepository};
