//! Factories del dominio
//!
//! Frontera entre datos no tipados (JSON de la API o documentos
//! almacenados) y el modelo tipado de vehículos.

pub mod vehicle_factory;

pub use vehicle_factory::VehicleFactory;
