//! Modelo de Vehicle
//!
//! Este módulo contiene el registro común de un vehículo (posición, datos
//! de fabricación, piezas) y su representación plana para almacenamiento
//! y transporte. Los datos específicos de cada variante viven en
//! [`crate::models::engine`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::models::engine::EngineDetails;
use crate::models::location::Location;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_not_empty, validate_positive};

/// Variante de vehículo - es el tag `type` de la representación
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Electric,
    Petrol,
    Diesel,
    Hybrid,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Electric,
        VehicleType::Petrol,
        VehicleType::Diesel,
        VehicleType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Electric => "Electric",
            VehicleType::Petrol => "Petrol",
            VehicleType::Diesel => "Diesel",
            VehicleType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InvalidType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "EV")]
    Ev,
    Petrol,
    Diesel,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartCondition {
    New,
    Good,
    Fair,
    Poor,
}

/// Datos de fabricación comunes a todas las variantes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_vehicle_details"))]
pub struct VehicleDetails {
    #[serde(with = "manufactured_date")]
    pub manufactured_date: NaiveDate,

    pub model: String,

    pub fuel_type: FuelType,

    /// Potencia en BHP
    pub bhp: f64,

    /// Par motor en Nm
    pub torque: f64,
}

fn validate_vehicle_details(details: &VehicleDetails) -> Result<(), ValidationError> {
    validate_not_empty(&details.model)?;
    validate_positive(details.bhp)?;
    validate_positive(details.torque)?;
    Ok(())
}

mod manufactured_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::validation::parse_manufactured_date;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_manufactured_date(&raw).map_err(|e| {
            serde::de::Error::custom(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid date '{}'", raw)),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehiclePart {
    pub name: String,
    pub condition: PartCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl VehiclePart {
    pub fn new(name: impl Into<String>, condition: PartCondition) -> Self {
        Self {
            name: name.into(),
            condition,
            manufacturer: None,
        }
    }
}

/// Vehículo con su variante de motor
///
/// Los accesores devuelven copias o préstamos inmutables: el estado interno
/// sólo cambia a través de `set_location`, `add_part` y
/// `update_battery_capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: Option<String>,
    location: Location,
    details: VehicleDetails,
    unique_parts: Vec<VehiclePart>,
    engine: EngineDetails,
}

impl Vehicle {
    /// Una lista de piezas vacía se sustituye por las piezas por defecto de la variante
    pub fn new(
        location: Location,
        details: VehicleDetails,
        engine: EngineDetails,
        unique_parts: Vec<VehiclePart>,
        id: Option<String>,
    ) -> Self {
        let unique_parts = if unique_parts.is_empty() {
            engine.default_parts()
        } else {
            unique_parts
        };

        Self {
            id,
            location,
            details,
            unique_parts,
            engine,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn details(&self) -> &VehicleDetails {
        &self.details
    }

    pub fn unique_parts(&self) -> &[VehiclePart] {
        &self.unique_parts
    }

    pub fn engine(&self) -> &EngineDetails {
        &self.engine
    }

    /// Sustituye la posición; si las coordenadas son inválidas no toca la actual
    pub fn set_location(&mut self, location: Location) -> AppResult<()> {
        location.validate()?;
        self.location = location;
        Ok(())
    }

    pub fn add_part(&mut self, part: VehiclePart) {
        self.unique_parts.push(part);
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.engine.vehicle_type()
    }

    pub fn engine_details(&self) -> Map<String, Value> {
        self.engine.to_map()
    }

    pub fn to_representation(&self) -> VehicleRepresentation {
        VehicleRepresentation {
            id: self.id.clone(),
            vehicle_type: self.vehicle_type(),
            location: self.location,
            details: self.details.clone(),
            unique_parts: self.unique_parts.clone(),
            engine_details: self.engine_details(),
        }
    }

    // Cálculos por variante. Devuelven None cuando no aplican.

    pub fn update_battery_capacity(&mut self, capacity: f64) -> AppResult<()> {
        match &mut self.engine {
            EngineDetails::Electric(motor) => motor.set_battery_capacity(capacity),
            other => Err(AppError::Validation(format!(
                "Battery capacity can only be updated on Electric vehicles, not {}",
                other.vehicle_type()
            ))),
        }
    }

    pub fn calculate_range_percentage(&self) -> Option<f64> {
        match &self.engine {
            EngineDetails::Electric(motor) => Some(motor.range_percentage()),
            _ => None,
        }
    }

    pub fn calculate_power_per_liter(&self) -> Option<f64> {
        match &self.engine {
            EngineDetails::Petrol(ice) => Some(ice.power_per_liter(self.details.bhp)),
            _ => None,
        }
    }

    pub fn needs_spark_plug_replacement(&self, mileage: f64) -> Option<bool> {
        match &self.engine {
            EngineDetails::Petrol(_) => {
                Some(crate::models::engine::IceDetails::needs_spark_plug_replacement(mileage))
            }
            _ => None,
        }
    }

    pub fn calculate_torque_per_liter(&self) -> Option<f64> {
        match &self.engine {
            EngineDetails::Diesel(diesel) => Some(diesel.torque_per_liter(self.details.torque)),
            _ => None,
        }
    }

    pub fn needs_glow_plug_replacement(&self, mileage: f64) -> Option<bool> {
        match &self.engine {
            EngineDetails::Diesel(_) => Some(
                crate::models::engine::DieselEngineDetails::needs_glow_plug_replacement(mileage),
            ),
            _ => None,
        }
    }

    pub fn is_turbo_charged(&self) -> Option<bool> {
        match &self.engine {
            EngineDetails::Diesel(diesel) => Some(diesel.turbo_charged),
            _ => None,
        }
    }

    pub fn total_power(&self) -> Option<f64> {
        match &self.engine {
            EngineDetails::Hybrid(hybrid) => Some(hybrid.total_power(self.details.bhp)),
            _ => None,
        }
    }

    pub fn is_plug_in_hybrid(&self) -> Option<bool> {
        match &self.engine {
            EngineDetails::Hybrid(hybrid) => Some(hybrid.is_plug_in()),
            _ => None,
        }
    }

    pub fn calculate_fuel_efficiency_boost(&self) -> Option<&'static str> {
        match &self.engine {
            EngineDetails::Hybrid(hybrid) => Some(hybrid.hybrid_type.fuel_efficiency_boost()),
            _ => None,
        }
    }
}

/// Representación plana - forma canónica en base de datos y en la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRepresentation {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub location: Location,
    pub details: VehicleDetails,
    pub unique_parts: Vec<VehiclePart>,
    pub engine_details: Map<String, Value>,
}
