//! Detalles de motor por variante
//!
//! Cada variante de vehículo lleva su propio esquema de motor y su lista
//! de piezas por defecto. `EngineDetails` es la suma de las cuatro.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::vehicle::{PartCondition, VehiclePart, VehicleType};
use crate::utils::errors::{AppError, AppResult};

/// Kilometraje a partir del cual se recomienda cambiar las bujías
pub const SPARK_PLUG_INTERVAL: f64 = 30_000.0;
/// Kilometraje a partir del cual se recomienda cambiar los calentadores
pub const GLOW_PLUG_INTERVAL: f64 = 100_000.0;
/// Autonomía eléctrica (km) por encima de la cual un híbrido es enchufable
pub const PLUG_IN_RANGE_THRESHOLD: f64 = 20.0;

const BHP_TO_KW: f64 = 0.746;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotorType {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "DC")]
    Dc,
    #[serde(rename = "Permanent Magnet", alias = "PermanentMagnet")]
    PermanentMagnet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineConfiguration {
    Inline,
    #[serde(rename = "V-Type", alias = "VType")]
    VType,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelInjection {
    Port,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelSystemType {
    #[serde(rename = "Common Rail", alias = "CommonRail")]
    CommonRail,
    #[serde(rename = "Direct Injection", alias = "DirectInjection")]
    DirectInjection,
    #[serde(rename = "Indirect Injection", alias = "IndirectInjection")]
    IndirectInjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HybridType {
    Parallel,
    Series,
    #[serde(rename = "Series-Parallel", alias = "SeriesParallel")]
    SeriesParallel,
}

impl HybridType {
    /// Mejora estimada de consumo frente a un motor térmico equivalente
    pub fn fuel_efficiency_boost(&self) -> &'static str {
        match self {
            HybridType::Parallel => "20-30%",
            HybridType::Series => "30-40%",
            HybridType::SeriesParallel => "40-50%",
        }
    }
}

/// Motor eléctrico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorDetails {
    pub motor_type: MotorType,
    pub voltage: f64,
    /// kWh
    pub battery_capacity: f64,
    /// km
    pub range: f64,
}

impl MotorDetails {
    pub fn set_battery_capacity(&mut self, capacity: f64) -> AppResult<()> {
        if !(capacity > 0.0) {
            return Err(AppError::Validation(
                "Battery capacity must be positive".to_string(),
            ));
        }
        self.battery_capacity = capacity;
        Ok(())
    }

    pub fn range_percentage(&self) -> f64 {
        (self.range / self.battery_capacity) * 100.0
    }
}

/// Motor de gasolina
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceDetails {
    /// cc
    pub displacement: f64,
    pub cylinders: u32,
    pub configuration: EngineConfiguration,
    pub fuel_injection: FuelInjection,
    pub compression_ratio: f64,
}

impl IceDetails {
    pub fn power_per_liter(&self, bhp: f64) -> f64 {
        bhp / (self.displacement / 1000.0)
    }

    pub fn needs_spark_plug_replacement(mileage: f64) -> bool {
        mileage > SPARK_PLUG_INTERVAL
    }
}

/// Motor diésel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieselEngineDetails {
    pub displacement: f64,
    pub cylinders: u32,
    pub configuration: EngineConfiguration,
    pub turbo_charged: bool,
    pub compression_ratio: f64,
    pub fuel_system_type: FuelSystemType,
}

impl DieselEngineDetails {
    pub fn torque_per_liter(&self, torque: f64) -> f64 {
        torque / (self.displacement / 1000.0)
    }

    pub fn needs_glow_plug_replacement(mileage: f64) -> bool {
        mileage > GLOW_PLUG_INTERVAL
    }
}

/// Sistema híbrido: motor térmico + motor eléctrico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridSystemDetails {
    pub ice_displacement: f64,
    pub ice_cylinders: u32,
    /// kW
    pub electric_motor_power: f64,
    /// kWh
    pub battery_capacity: f64,
    pub hybrid_type: HybridType,
    /// km
    pub electric_range: f64,
}

impl HybridSystemDetails {
    /// Potencia combinada en kW
    pub fn total_power(&self, bhp: f64) -> f64 {
        bhp * BHP_TO_KW + self.electric_motor_power
    }

    pub fn is_plug_in(&self) -> bool {
        self.electric_range > PLUG_IN_RANGE_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineDetails {
    Electric(MotorDetails),
    Petrol(IceDetails),
    Diesel(DieselEngineDetails),
    Hybrid(HybridSystemDetails),
}

impl EngineDetails {
    pub fn vehicle_type(&self) -> VehicleType {
        match self {
            EngineDetails::Electric(_) => VehicleType::Electric,
            EngineDetails::Petrol(_) => VehicleType::Petrol,
            EngineDetails::Diesel(_) => VehicleType::Diesel,
            EngineDetails::Hybrid(_) => VehicleType::Hybrid,
        }
    }

    /// Interpretar el payload `engineDetails` según el tag de la variante
    pub fn from_value(vehicle_type: VehicleType, value: Value) -> AppResult<Self> {
        let engine = match vehicle_type {
            VehicleType::Electric => EngineDetails::Electric(parse_engine(vehicle_type, value)?),
            VehicleType::Petrol => EngineDetails::Petrol(parse_engine(vehicle_type, value)?),
            VehicleType::Diesel => EngineDetails::Diesel(parse_engine(vehicle_type, value)?),
            VehicleType::Hybrid => EngineDetails::Hybrid(parse_engine(vehicle_type, value)?),
        };
        Ok(engine)
    }

    /// Mapa plano con los campos específicos de la variante
    pub fn to_map(&self) -> Map<String, Value> {
        let value = match self {
            EngineDetails::Electric(motor) => serde_json::to_value(motor),
            EngineDetails::Petrol(ice) => serde_json::to_value(ice),
            EngineDetails::Diesel(diesel) => serde_json::to_value(diesel),
            EngineDetails::Hybrid(hybrid) => serde_json::to_value(hybrid),
        };

        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn default_parts(&self) -> Vec<VehiclePart> {
        use PartCondition::*;

        let parts: Vec<(&str, PartCondition)> = match self {
            EngineDetails::Electric(_) => vec![
                ("Electric Motor", New),
                ("Battery Pack", New),
                ("Inverter", New),
                ("Charging Port", New),
            ],
            EngineDetails::Petrol(_) => vec![
                ("ICE (Internal Combustion Engine)", New),
                ("Spark Plugs", New),
                ("Fuel Injectors", New),
                ("Air Filter", New),
                ("Catalytic Converter", New),
            ],
            EngineDetails::Diesel(diesel) => vec![
                ("Diesel ICE", New),
                ("Glow Plugs", New),
                ("Fuel Injectors", New),
                ("Turbocharger", if diesel.turbo_charged { New } else { Poor }),
                ("DPF (Diesel Particulate Filter)", New),
                ("EGR Valve", New),
            ],
            EngineDetails::Hybrid(_) => vec![
                ("ICE (Internal Combustion Engine)", New),
                ("Electric Motor", New),
                ("Battery Pack", New),
                ("Power Control Unit", New),
                ("Regenerative Braking System", New),
                ("Spark Plugs", New),
                ("Inverter", New),
            ],
        };

        parts
            .into_iter()
            .map(|(name, condition)| VehiclePart::new(name, condition))
            .collect()
    }
}

fn parse_engine<T: DeserializeOwned>(vehicle_type: VehicleType, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Validation(format!("Invalid engineDetails for {} vehicle: {}", vehicle_type, e))
    })
}
