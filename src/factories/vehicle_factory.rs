//! Factory de vehículos
//!
//! `validate` es una comprobación barata de forma que nunca falla;
//! `create` construye la variante correcta y aplica los invariantes
//! del modelo (rango de coordenadas, esquema del motor, datos de fabricación).

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::models::engine::EngineDetails;
use crate::models::location::Location;
use crate::models::vehicle::{Vehicle, VehicleDetails, VehiclePart, VehicleRepresentation, VehicleType};
use crate::utils::errors::{AppError, AppResult};

pub struct VehicleFactory;

impl VehicleFactory {
    /// Validar los datos antes de construir
    ///
    /// Devuelve `false` si falta `type`, `location`, `details` o
    /// `engineDetails`, si el tipo no es una de las cuatro variantes o si
    /// alguna coordenada no es numérica. No comprueba rangos ni el esquema
    /// del motor: eso queda para `create`.
    pub fn validate(data: &Value) -> bool {
        let present = |key: &str| data.get(key).map_or(false, |v| !v.is_null());

        if !["type", "location", "details", "engineDetails"]
            .into_iter()
            .all(present)
        {
            return false;
        }

        let known_type = data
            .get("type")
            .and_then(Value::as_str)
            .map_or(false, |t| t.parse::<VehicleType>().is_ok());
        if !known_type {
            return false;
        }

        let location = &data["location"];
        location["latitude"].is_number() && location["longitude"].is_number()
    }

    /// Construir un vehículo a partir de datos no tipados
    ///
    /// Ruta sin comprobación previa: para datos externos llamar antes a
    /// [`VehicleFactory::validate`].
    pub fn create(data: &Value) -> AppResult<Vehicle> {
        let vehicle_type = Self::vehicle_type(data)?;

        let location: Location = required(data, "location")?;
        location.validate()?;

        let details: VehicleDetails = required(data, "details")?;
        details.validate()?;

        let engine_payload = data
            .get("engineDetails")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| AppError::Validation("Missing engineDetails".to_string()))?;
        let engine = EngineDetails::from_value(vehicle_type, engine_payload)?;

        let unique_parts: Vec<VehiclePart> = optional(data, "uniqueParts")?.unwrap_or_default();

        let id = data
            .get("_id")
            .or_else(|| data.get("id"))
            .and_then(id_from_value);

        Ok(Vehicle::new(location, details, engine, unique_parts, id))
    }

    /// Reconstruir desde la representación tipada
    pub fn from_representation(representation: VehicleRepresentation) -> AppResult<Vehicle> {
        let VehicleRepresentation {
            id,
            vehicle_type,
            location,
            details,
            unique_parts,
            engine_details,
        } = representation;

        location.validate()?;
        details.validate()?;
        let engine = EngineDetails::from_value(vehicle_type, Value::Object(engine_details))?;

        Ok(Vehicle::new(location, details, engine, unique_parts, id))
    }

    fn vehicle_type(data: &Value) -> AppResult<VehicleType> {
        let tag = data.get("type");
        tag.and_then(Value::as_str)
            .and_then(|t| t.parse::<VehicleType>().ok())
            .ok_or_else(|| {
                let shown = match tag {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => "undefined".to_string(),
                };
                AppError::UnknownType(shown)
            })
    }
}

fn required<T: DeserializeOwned>(data: &Value, key: &str) -> AppResult<T> {
    match data.get(key) {
        Some(value) if !value.is_null() => parse_field(key, value),
        _ => Err(AppError::Validation(format!("Missing {}", key))),
    }
}

fn optional<T: DeserializeOwned>(data: &Value, key: &str) -> AppResult<Option<T>> {
    match data.get(key) {
        Some(value) if !value.is_null() => parse_field(key, value).map(Some),
        _ => Ok(None),
    }
}

fn parse_field<T: DeserializeOwned>(key: &str, value: &Value) -> AppResult<T> {
    T::deserialize(value).map_err(|e| AppError::Validation(format!("Invalid {}: {}", key, e)))
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
