//! Controladores
//!
//! Traducen las operaciones del servicio a envelopes de la API.

pub mod vehicle_controller;

pub use vehicle_controller::VehicleController;
