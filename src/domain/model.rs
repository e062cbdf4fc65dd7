use crate::utils::error::Result;
use crate::utils::validation::{validate_at_least, validate_finite, validate_positive};

pub const DEFAULT_SEATS: i32 = 4;
pub const DEFAULT_BATTERY_CAPACITY: f64 = 0.0;
pub const DEFAULT_BUS_CAPACITY: i32 = 20;
pub const DEFAULT_DOUBLE_DECKER: bool = false;
pub const DEFAULT_MOTO_TYPE: &str = "Unknown";

pub const MIN_WHEEL_SIZE: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    engine_type: String,
    power: f64,
}

impl Engine {
    pub fn new(engine_type: impl Into<String>, power: f64) -> Result<Self> {
        validate_positive("engine.power", power)?;
        validate_finite("engine.power", power)?;
        Ok(Self {
            engine_type: engine_type.into(),
            power,
        })
    }

    pub fn engine_type(&self) -> &str {
        &self.engine_type
    }

    pub fn power(&self) -> f64 {
        self.power
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    transmission_type: String,
    gears: i32,
}

impl Transmission {
    pub fn new(transmission_type: impl Into<String>, gears: i32) -> Result<Self> {
        validate_positive("transmission.gears", gears)?;
        Ok(Self {
            transmission_type: transmission_type.into(),
            gears,
        })
    }

    pub fn transmission_type(&self) -> &str {
        &self.transmission_type
    }

    pub fn gears(&self) -> i32 {
        self.gears
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wheel {
    size: i32,
}

impl Wheel {
    pub fn new(size: i32) -> Result<Self> {
        validate_at_least("wheel.size", size, MIN_WHEEL_SIZE)?;
        Ok(Self { size })
    }

    pub fn size(&self) -> i32 {
        self.size
    }
}

/// Variant-specific part of a [`Vehicle`]. The set is closed; the tag of each
/// variant is what both codecs write as the discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleKind {
    Generic,
    Car { seats: i32 },
    ElectricCar { seats: i32, battery_capacity: f64 },
    Bus { capacity: i32, double_decker: bool },
    Motorcycle { moto_type: String },
}

impl VehicleKind {
    pub const GENERIC_TAG: &'static str = "Vehicle";
    pub const CAR_TAG: &'static str = "Car";
    pub const ELECTRIC_CAR_TAG: &'static str = "ElectricCar";
    pub const BUS_TAG: &'static str = "Bus";
    pub const MOTORCYCLE_TAG: &'static str = "Motorcycle";

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Generic => Self::GENERIC_TAG,
            Self::Car { .. } => Self::CAR_TAG,
            Self::ElectricCar { .. } => Self::ELECTRIC_CAR_TAG,
            Self::Bus { .. } => Self::BUS_TAG,
            Self::Motorcycle { .. } => Self::MOTORCYCLE_TAG,
        }
    }

    pub fn seats(&self) -> Option<i32> {
        match self {
            Self::Car { seats } | Self::ElectricCar { seats, .. } => Some(*seats),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    model: String,
    engine: Engine,
    transmission: Transmission,
    wheels: Vec<Wheel>,
    kind: VehicleKind,
}

impl Vehicle {
    pub fn new(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
        kind: VehicleKind,
    ) -> Self {
        Self {
            model: model.into(),
            engine,
            transmission,
            wheels,
            kind,
        }
    }

    pub fn generic(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
    ) -> Self {
        Self::new(model, engine, transmission, wheels, VehicleKind::Generic)
    }

    pub fn car(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
        seats: i32,
    ) -> Self {
        Self::new(model, engine, transmission, wheels, VehicleKind::Car { seats })
    }

    pub fn electric_car(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
        seats: i32,
        battery_capacity: f64,
    ) -> Self {
        Self::new(
            model,
            engine,
            transmission,
            wheels,
            VehicleKind::ElectricCar {
                seats,
                battery_capacity,
            },
        )
    }

    pub fn bus(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
        capacity: i32,
        double_decker: bool,
    ) -> Self {
        Self::new(
            model,
            engine,
            transmission,
            wheels,
            VehicleKind::Bus {
                capacity,
                double_decker,
            },
        )
    }

    pub fn motorcycle(
        model: impl Into<String>,
        engine: Engine,
        transmission: Transmission,
        wheels: Vec<Wheel>,
        moto_type: impl Into<String>,
    ) -> Self {
        Self::new(
            model,
            engine,
            transmission,
            wheels,
            VehicleKind::Motorcycle {
                moto_type: moto_type.into(),
            },
        )
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn transmission(&self) -> &Transmission {
        &self.transmission
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }
}
