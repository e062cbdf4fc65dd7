//! JSON record format: the collection is an array of objects, one per vehicle,
//! discriminated by their `"type"` key.

use crate::core::collect_entries;
use crate::domain::model::{
    Engine, Transmission, Vehicle, VehicleKind, Wheel, DEFAULT_BATTERY_CAPACITY,
    DEFAULT_BUS_CAPACITY, DEFAULT_DOUBLE_DECKER, DEFAULT_MOTO_TYPE, DEFAULT_SEATS,
};
use crate::domain::ports::{DecodePolicy, VehicleCodec};
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::validate_finite;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRecord {
    pub engine_type: String,
    pub power: f64,
}

impl From<&Engine> for EngineRecord {
    fn from(engine: &Engine) -> Self {
        Self {
            engine_type: engine.engine_type().to_string(),
            power: engine.power(),
        }
    }
}

impl TryFrom<EngineRecord> for Engine {
    type Error = StoreError;

    fn try_from(record: EngineRecord) -> Result<Self> {
        Engine::new(record.engine_type, record.power)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRecord {
    pub transmission_type: String,
    pub gears: i32,
}

impl From<&Transmission> for TransmissionRecord {
    fn from(transmission: &Transmission) -> Self {
        Self {
            transmission_type: transmission.transmission_type().to_string(),
            gears: transmission.gears(),
        }
    }
}

impl TryFrom<TransmissionRecord> for Transmission {
    type Error = StoreError;

    fn try_from(record: TransmissionRecord) -> Result<Self> {
        Transmission::new(record.transmission_type, record.gears)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelRecord {
    pub size: i32,
}

impl From<&Wheel> for WheelRecord {
    fn from(wheel: &Wheel) -> Self {
        Self { size: wheel.size() }
    }
}

impl TryFrom<WheelRecord> for Wheel {
    type Error = StoreError;

    fn try_from(record: WheelRecord) -> Result<Self> {
        Wheel::new(record.size)
    }
}

/// One vehicle as it appears in the JSON document. Field order here is the
/// key order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "type", default)]
    pub tag: Option<String>,
    pub model: String,
    pub engine: EngineRecord,
    pub transmission: TransmissionRecord,
    pub wheels: Vec<WheelRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_decker: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moto_type: Option<String>,
}

/// Fails for a non-finite `battery_capacity`, which JSON would write as `null`.
impl TryFrom<&Vehicle> for VehicleRecord {
    type Error = StoreError;

    fn try_from(vehicle: &Vehicle) -> Result<Self> {
        let mut record = Self {
            tag: Some(vehicle.tag().to_string()),
            model: vehicle.model().to_string(),
            engine: vehicle.engine().into(),
            transmission: vehicle.transmission().into(),
            wheels: vehicle.wheels().iter().map(WheelRecord::from).collect(),
            seats: None,
            battery_capacity: None,
            capacity: None,
            double_decker: None,
            moto_type: None,
        };

        match vehicle.kind() {
            VehicleKind::Generic => {}
            VehicleKind::Car { seats } => {
                record.seats = Some(*seats);
            }
            VehicleKind::ElectricCar {
                seats,
                battery_capacity,
            } => {
                validate_finite("battery_capacity", *battery_capacity)?;
                record.seats = Some(*seats);
                record.battery_capacity = Some(*battery_capacity);
            }
            VehicleKind::Bus {
                capacity,
                double_decker,
            } => {
                record.capacity = Some(*capacity);
                record.double_decker = Some(*double_decker);
            }
            VehicleKind::Motorcycle { moto_type } => {
                record.moto_type = Some(moto_type.clone());
            }
        }

        Ok(record)
    }
}

impl TryFrom<VehicleRecord> for Vehicle {
    type Error = StoreError;

    fn try_from(record: VehicleRecord) -> Result<Self> {
        let engine = Engine::try_from(record.engine)?;
        let transmission = Transmission::try_from(record.transmission)?;
        let wheels = record
            .wheels
            .into_iter()
            .map(Wheel::try_from)
            .collect::<Result<Vec<_>>>()?;

        let kind = match record.tag.as_deref().unwrap_or(VehicleKind::GENERIC_TAG) {
            VehicleKind::CAR_TAG => VehicleKind::Car {
                seats: record.seats.unwrap_or(DEFAULT_SEATS),
            },
            VehicleKind::ELECTRIC_CAR_TAG => VehicleKind::ElectricCar {
                seats: record.seats.unwrap_or(DEFAULT_SEATS),
                battery_capacity: record.battery_capacity.unwrap_or(DEFAULT_BATTERY_CAPACITY),
            },
            VehicleKind::BUS_TAG => VehicleKind::Bus {
                capacity: record.capacity.unwrap_or(DEFAULT_BUS_CAPACITY),
                double_decker: record.double_decker.unwrap_or(DEFAULT_DOUBLE_DECKER),
            },
            VehicleKind::MOTORCYCLE_TAG => VehicleKind::Motorcycle {
                moto_type: record
                    .moto_type
                    .unwrap_or_else(|| DEFAULT_MOTO_TYPE.to_string()),
            },
            _ => VehicleKind::Generic,
        };

        Ok(Vehicle::new(record.model, engine, transmission, wheels, kind))
    }
}

pub fn encode_vehicle(vehicle: &Vehicle) -> Result<Value> {
    Ok(serde_json::to_value(VehicleRecord::try_from(vehicle)?)?)
}

/// Decodes one JSON object. Shape problems (absent or mistyped mandatory
/// keys) are reported as missing data; invariant violations as invalid values.
pub fn decode_vehicle(value: &Value) -> Result<Vehicle> {
    let record = VehicleRecord::deserialize(value)
        .map_err(|e| StoreError::missing_data("vehicle record", e.to_string()))?;
    Vehicle::try_from(record)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec {
    policy: DecodePolicy,
}

impl RecordCodec {
    pub fn new(policy: DecodePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }
}

impl VehicleCodec for RecordCodec {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, vehicles: &[Vehicle]) -> Result<Vec<u8>> {
        let records = vehicles
            .iter()
            .map(VehicleRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;

        Ok(buffer)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Vehicle>> {
        let document: Value = serde_json::from_slice(data)?;

        let Value::Array(items) = document else {
            return Err(StoreError::missing_data(
                "json document",
                "expected an array of vehicle records",
            ));
        };

        tracing::debug!("Decoding {} json records", items.len());

        collect_entries(
            self.format_name(),
            self.policy,
            items.iter().enumerate().map(|(index, item)| {
                decode_vehicle(item).map_err(|e| match e {
                    StoreError::MissingData { message, .. } => {
                        StoreError::missing_data(format!("record {}", index), message)
                    }
                    other => other,
                })
            }),
        )
    }
}
