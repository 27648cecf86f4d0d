//! Sensor classes and the analog points that carry them.
//!
//! A [`SensorClass`] fixes everything about a point that is not its identity
//! or its current reading: engineering units, clamp bounds, drift step, seed
//! range, and the naming templates clients see.

use bacsim_core::types::{EngineeringUnits, ObjectId, ObjectType};
use serde::{Deserialize, Serialize};

/// The physical quantity an analog point simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorClass {
    Temperature,
    Pressure,
    Humidity,
}

/// Static behaviour shared by every point of one [`SensorClass`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProfile {
    pub units: EngineeringUnits,
    pub min: f32,
    pub max: f32,
    /// Largest absolute perturbation applied per drift tick.
    pub step: f32,
    /// Range initial values are drawn from when none is configured.
    pub seed_min: f32,
    pub seed_max: f32,
    pub name_prefix: &'static str,
    pub description: &'static str,
}

static TEMPERATURE: ClassProfile = ClassProfile {
    units: EngineeringUnits::DegreesCelsius,
    min: 10.0,
    max: 35.0,
    step: 0.05,
    seed_min: 18.0,
    seed_max: 24.0,
    name_prefix: "Temp Sensor",
    description: "Air Temperature Sensor (°C)",
};

static PRESSURE: ClassProfile = ClassProfile {
    units: EngineeringUnits::Kilopascals,
    min: 60.0,
    max: 130.0,
    step: 0.3,
    seed_min: 85.0,
    seed_max: 110.0,
    name_prefix: "Pressure Sensor",
    description: "Line Pressure Sensor (kPa)",
};

static HUMIDITY: ClassProfile = ClassProfile {
    units: EngineeringUnits::PercentRelativeHumidity,
    min: 10.0,
    max: 90.0,
    step: 0.4,
    seed_min: 35.0,
    seed_max: 55.0,
    name_prefix: "Humidity Sensor",
    description: "Relative Humidity Sensor (%)",
};

impl SensorClass {
    pub const ALL: [SensorClass; 3] = [Self::Temperature, Self::Pressure, Self::Humidity];

    pub fn profile(self) -> &'static ClassProfile {
        match self {
            Self::Temperature => &TEMPERATURE,
            Self::Pressure => &PRESSURE,
            Self::Humidity => &HUMIDITY,
        }
    }

    pub fn units(self) -> EngineeringUnits {
        self.profile().units
    }

    pub fn bounds(self) -> (f32, f32) {
        let p = self.profile();
        (p.min, p.max)
    }

    /// Clamps `value` into the class bounds. Callers must reject non-finite
    /// input first; `f32::clamp` passes NaN through.
    pub fn clamp(self, value: f32) -> f32 {
        let (min, max) = self.bounds();
        value.clamp(min, max)
    }

    pub fn contains(self, value: f32) -> bool {
        let (min, max) = self.bounds();
        value.is_finite() && (min..=max).contains(&value)
    }

    /// Object name for the `ordinal`-th point of this class (1-based).
    pub fn object_name(self, ordinal: u32) -> String {
        format!("{} {ordinal}", self.profile().name_prefix)
    }

    pub fn description(self) -> &'static str {
        self.profile().description
    }
}

/// Object types that can carry a simulated analog point.
pub const fn is_point_type(object_type: ObjectType) -> bool {
    matches!(object_type, ObjectType::AnalogInput | ObjectType::AnalogValue)
}

/// Everything needed to insert a point into the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSpec {
    pub object_id: ObjectId,
    pub sensor: SensorClass,
    pub name: Option<String>,
    pub initial_value: f32,
    pub feed_field: Option<String>,
}

/// One simulated analog-input or analog-value object.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogPoint {
    pub(crate) object_id: ObjectId,
    pub(crate) sensor: SensorClass,
    pub(crate) ordinal: u32,
    pub(crate) name: Option<String>,
    pub(crate) feed_field: Option<String>,
    pub(crate) present_value: f32,
}

impl AnalogPoint {
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn sensor(&self) -> SensorClass {
        self.sensor
    }

    /// 1-based position among catalogue points of the same sensor class.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn object_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.sensor.object_name(self.ordinal),
        }
    }

    pub fn description(&self) -> &'static str {
        self.sensor.description()
    }

    pub fn units(&self) -> EngineeringUnits {
        self.sensor.units()
    }

    pub fn feed_field(&self) -> Option<&str> {
        self.feed_field.as_deref()
    }

    pub fn present_value(&self) -> f32 {
        self.present_value
    }
}
