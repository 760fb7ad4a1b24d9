//! Objetos de transporte de la API

pub mod vehicle_dto;

pub use vehicle_dto::*;
