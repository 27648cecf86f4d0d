//! Static start-up configuration.
//!
//! The configuration is read once from TOML, validated, and then used to
//! build the catalogue and pick the value source. Nothing in it can change
//! while the device runs.

use crate::error::{CatalogueError, ConfigError};
use crate::point::{is_point_type, PointSpec, SensorClass};
use bacsim_core::types::object_id::MAX_INSTANCE;
use bacsim_core::types::{ObjectId, ObjectType, Segmentation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DRIFT_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_FEED_INTERVAL_MS: u64 = 333;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub device: DeviceConfig,
    pub source: SourceConfig,
    pub points: Vec<PointConfig>,
    pub dispatch: DispatchConfig,
}

/// Identity and capability properties of the device object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub instance: u32,
    pub name: String,
    pub vendor_name: String,
    pub vendor_id: u32,
    pub model_name: String,
    pub firmware_revision: String,
    pub application_software_version: String,
    pub protocol_version: u32,
    pub protocol_revision: u32,
    pub max_apdu_length: u32,
    pub segmentation: Segmentation,
    pub database_revision: u32,
    pub serial_number: String,
    pub apdu_timeout_ms: u32,
    pub apdu_retries: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            instance: 2001,
            name: "PPFTransmitter".to_string(),
            vendor_name: "VSA".to_string(),
            vendor_id: 999,
            model_name: "PPF Environmental Transmitter".to_string(),
            firmware_revision: "2.0".to_string(),
            application_software_version: "2.0".to_string(),
            protocol_version: 1,
            protocol_revision: 22,
            max_apdu_length: 1024,
            segmentation: Segmentation::NoSegmentation,
            database_revision: 1,
            serial_number: "SN-PPF-001".to_string(),
            apdu_timeout_ms: 3000,
            apdu_retries: 3,
        }
    }
}

/// Which value source drives present-values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    /// Bounded random walk per point.
    Synthetic {
        #[serde(default = "default_drift_interval_ms")]
        interval_ms: u64,
        /// Fixed RNG seed for reproducible runs.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Relay of an external snapshot. Without a `path` the embedding process
    /// publishes snapshots in memory.
    Feed {
        #[serde(default = "default_feed_interval_ms")]
        interval_ms: u64,
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

fn default_drift_interval_ms() -> u64 {
    DEFAULT_DRIFT_INTERVAL_MS
}

fn default_feed_interval_ms() -> u64 {
    DEFAULT_FEED_INTERVAL_MS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Synthetic {
            interval_ms: DEFAULT_DRIFT_INTERVAL_MS,
            seed: None,
        }
    }
}

impl SourceConfig {
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Synthetic { interval_ms, .. } | Self::Feed { interval_ms, .. } => {
                Duration::from_millis(*interval_ms)
            }
        }
    }

    pub fn is_feed(&self) -> bool {
        matches!(self, Self::Feed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointConfig {
    #[serde(default = "default_point_type")]
    pub object_type: ObjectType,
    pub instance: u32,
    pub sensor: SensorClass,
    /// Overrides the sensor-class name template.
    #[serde(default)]
    pub name: Option<String>,
    /// Initial present-value; drawn from the class seed range when absent.
    #[serde(default)]
    pub initial: Option<f32>,
    /// Snapshot field copied into this point under the feed source.
    #[serde(default)]
    pub feed_field: Option<String>,
}

fn default_point_type() -> ObjectType {
    ObjectType::AnalogInput
}

impl PointConfig {
    pub fn analog_input(instance: u32, sensor: SensorClass) -> Self {
        Self {
            object_type: ObjectType::AnalogInput,
            instance,
            sensor,
            name: None,
            initial: None,
            feed_field: None,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::new(self.object_type, self.instance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Answer writes to anything but an analog present-value with
    /// write-access-denied instead of a no-op acknowledgement.
    pub reject_unsupported_writes: bool,
}

impl Default for SimulatorConfig {
    /// Three temperature, three pressure and three humidity analog inputs on
    /// device 2001, driven by synthetic drift.
    fn default() -> Self {
        let points = (1..=9)
            .map(|instance| {
                let sensor = match instance {
                    1..=3 => SensorClass::Temperature,
                    4..=6 => SensorClass::Pressure,
                    _ => SensorClass::Humidity,
                };
                PointConfig::analog_input(instance, sensor)
            })
            .collect();
        Self {
            device: DeviceConfig::default(),
            source: SourceConfig::default(),
            points,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.name.trim().is_empty() {
            return Err(ConfigError::Invalid("device name is empty".into()));
        }
        if self.device.instance > MAX_INSTANCE {
            return Err(ConfigError::Invalid(format!(
                "device instance {} exceeds {MAX_INSTANCE}",
                self.device.instance
            )));
        }
        if self.source.tick_interval().is_zero() {
            return Err(ConfigError::Invalid("source interval_ms must be > 0".into()));
        }

        let mut seen = HashSet::new();
        for point in &self.points {
            if !is_point_type(point.object_type) {
                return Err(ConfigError::Catalogue(CatalogueError::UnsupportedObjectType(
                    point.object_id(),
                )));
            }
            if point.instance > MAX_INSTANCE {
                return Err(ConfigError::Invalid(format!(
                    "{} instance {} exceeds {MAX_INSTANCE}",
                    point.object_type, point.instance
                )));
            }
            if !seen.insert(point.object_id()) {
                return Err(ConfigError::Catalogue(CatalogueError::DuplicateObject(
                    point.object_id(),
                )));
            }
            if let Some(initial) = point.initial {
                if !initial.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "{} initial value is not finite",
                        point.object_id()
                    )));
                }
            }
            if point.feed_field.is_some() && !self.source.is_feed() {
                return Err(ConfigError::Invalid(format!(
                    "{} has a feed_field but the source is not a feed",
                    point.object_id()
                )));
            }
        }
        Ok(())
    }

    pub fn device_id(&self) -> ObjectId {
        ObjectId::new(ObjectType::Device, self.device.instance)
    }

    /// Resolves initial values and produces the catalogue insertion list.
    pub fn point_specs<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PointSpec> {
        self.points
            .iter()
            .map(|point| {
                let profile = point.sensor.profile();
                let initial_value = match point.initial {
                    Some(v) => point.sensor.clamp(v),
                    None => rng.gen_range(profile.seed_min..=profile.seed_max),
                };
                PointSpec {
                    object_id: point.object_id(),
                    sensor: point.sensor,
                    name: point.name.clone(),
                    initial_value,
                    feed_field: point.feed_field.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{SimulatorConfig, SourceConfig};
    use crate::error::{CatalogueError, ConfigError};
    use crate::point::SensorClass;
    use bacsim_core::types::{ObjectId, ObjectType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn default_is_nine_point_transmitter() {
        let config = SimulatorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.device.instance, 2001);
        assert_eq!(config.points.len(), 9);
        let classes: Vec<_> = config.points.iter().map(|p| p.sensor).collect();
        assert_eq!(&classes[..3], &[SensorClass::Temperature; 3]);
        assert_eq!(&classes[3..6], &[SensorClass::Pressure; 3]);
        assert_eq!(&classes[6..], &[SensorClass::Humidity; 3]);
        assert_eq!(config.source.tick_interval(), Duration::from_secs(2));
    }

    #[test]
    fn parses_feed_configuration() {
        let config = SimulatorConfig::from_toml_str(
            r#"
            [device]
            instance = 3002
            name = "PadA"

            [source]
            kind = "feed"
            path = "/tmp/padA_state.json"

            [[points]]
            instance = 1
            sensor = "temperature"
            feed_field = "level"

            [[points]]
            object_type = "analog-value"
            instance = 2
            sensor = "pressure"
            feed_field = "pressure"
            initial = 101.5
            "#,
        )
        .unwrap();

        assert_eq!(config.device.instance, 3002);
        assert_eq!(config.device.vendor_id, 999);
        assert!(matches!(
            config.source,
            SourceConfig::Feed { interval_ms: 333, ref path } if path.is_some()
        ));
        assert_eq!(config.points[0].object_type, ObjectType::AnalogInput);
        assert_eq!(
            config.points[1].object_id(),
            ObjectId::new(ObjectType::AnalogValue, 2)
        );
        assert_eq!(config.points[1].feed_field.as_deref(), Some("pressure"));
    }

    #[test]
    fn rejects_duplicate_instances() {
        let err = SimulatorConfig::from_toml_str(
            r#"
            [[points]]
            instance = 4
            sensor = "pressure"

            [[points]]
            instance = 4
            sensor = "humidity"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalogue(CatalogueError::DuplicateObject(id))
                if id == ObjectId::new(ObjectType::AnalogInput, 4)
        ));
    }

    #[test]
    fn same_instance_in_different_types_is_allowed() {
        SimulatorConfig::from_toml_str(
            r#"
            [[points]]
            instance = 1
            sensor = "pressure"

            [[points]]
            object_type = "analog-value"
            instance = 1
            sensor = "pressure"
            "#,
        )
        .unwrap();
    }

    #[test]
    fn rejects_unmodeled_object_types_and_bad_bindings() {
        let err = SimulatorConfig::from_toml_str(
            r#"
            [[points]]
            object_type = "binary-input"
            instance = 1
            sensor = "pressure"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalogue(CatalogueError::UnsupportedObjectType(_))
        ));

        let err = SimulatorConfig::from_toml_str(
            r#"
            [[points]]
            instance = 1
            sensor = "pressure"
            feed_field = "pressure"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimulatorConfig::from_toml_str(
            r#"
            [source]
            kind = "synthetic"
            interval_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn seeds_initial_values_from_class_ranges() {
        let config = SimulatorConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for spec in config.point_specs(&mut rng) {
            let profile = spec.sensor.profile();
            assert!(spec.initial_value >= profile.seed_min);
            assert!(spec.initial_value <= profile.seed_max);
        }
    }

    #[test]
    fn configured_initial_values_are_clamped() {
        let mut config = SimulatorConfig::default();
        config.points[0].initial = Some(80.0);
        let specs = config.point_specs(&mut StdRng::seed_from_u64(1));
        assert_eq!(specs[0].initial_value, 35.0);
    }
}
