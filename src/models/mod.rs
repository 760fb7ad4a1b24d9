//! Modelos del sistema
//!
//! Este módulo contiene el modelo de vehículo con sus cuatro variantes,
//! su posición y las estadísticas de flota.

pub mod engine;
pub mod location;
pub mod statistics;
pub mod vehicle;

pub use engine::EngineDetails;
pub use location::{BoundingBox, Location};
pub use statistics::VehicleStatistics;
pub use vehicle::{Vehicle, VehicleRepresentation, VehicleType};
