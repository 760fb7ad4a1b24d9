//! Posición geográfica de un vehículo y áreas de búsqueda

use serde::{Deserialize, Serialize};

use crate::utils::errors::AppResult;
use crate::utils::validation::validate_coordinates;

/// Coordenadas GPS en grados decimales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Crear una posición validando latitud [-90, 90] y longitud [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        let location = Self { latitude, longitude };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> AppResult<()> {
        validate_coordinates(self.latitude, self.longitude)?;
        Ok(())
    }
}

/// Rectángulo de búsqueda con límites inclusivos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    pub fn contains(&self, location: &Location) -> bool {
        location.latitude >= self.min_lat
            && location.latitude <= self.max_lat
            && location.longitude >= self.min_lng
            && location.longitude <= self.max_lng
    }
}
