//! In-memory object catalogue.
//!
//! [`Catalogue`] is the single source of truth for the simulated device: the
//! immutable device identity, every analog point in insertion order, and the
//! database revision. All mutable state sits behind one
//! [`parking_lot::RwLock`], so every present-value read or write is atomic
//! with respect to the others and a snapshot taken for one request is
//! internally consistent.

use crate::config::{DeviceConfig, SimulatorConfig};
use crate::error::CatalogueError;
use crate::point::{is_point_type, AnalogPoint, PointSpec};
use bacsim_core::types::{ObjectId, ObjectType, Segmentation};
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// Identity and capability properties of the device object. Fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceObject {
    pub object_id: ObjectId,
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
    pub serial_number: String,
    pub apdu_timeout_ms: u32,
    pub apdu_retries: u32,
}

impl From<&DeviceConfig> for DeviceObject {
    fn from(config: &DeviceConfig) -> Self {
        Self {
            object_id: ObjectId::new(ObjectType::Device, config.instance),
            name: config.name.clone(),
            vendor_name: config.vendor_name.clone(),
            vendor_id: config.vendor_id,
            model_name: config.model_name.clone(),
            firmware_revision: config.firmware_revision.clone(),
            application_software_version: config.application_software_version.clone(),
            protocol_version: config.protocol_version,
            protocol_revision: config.protocol_revision,
            max_apdu_length: config.max_apdu_length,
            segmentation: config.segmentation,
            serial_number: config.serial_number.clone(),
            apdu_timeout_ms: config.apdu_timeout_ms,
            apdu_retries: config.apdu_retries,
        }
    }
}

/// Device object together with the catalogue-derived properties, captured
/// under one read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub device: Arc<DeviceObject>,
    /// Device first, then every point in insertion order.
    pub object_list: Vec<ObjectId>,
    pub database_revision: u32,
}

/// Point-in-time copy of one catalogue object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectSnapshot {
    Device(DeviceSnapshot),
    Point(AnalogPoint),
}

impl ObjectSnapshot {
    pub fn object_id(&self) -> ObjectId {
        match self {
            Self::Device(device) => device.device.object_id,
            Self::Point(point) => point.object_id(),
        }
    }

    pub fn as_point(&self) -> Option<&AnalogPoint> {
        match self {
            Self::Point(point) => Some(point),
            Self::Device(_) => None,
        }
    }
}

#[derive(Debug)]
struct Table {
    points: Vec<AnalogPoint>,
    index: HashMap<ObjectId, usize>,
    database_revision: u32,
}

impl Table {
    fn insert(&mut self, device_id: ObjectId, spec: PointSpec) -> Result<(), CatalogueError> {
        let id = spec.object_id;
        if !is_point_type(id.object_type()) {
            return Err(CatalogueError::UnsupportedObjectType(id));
        }
        if id == device_id || self.index.contains_key(&id) {
            return Err(CatalogueError::DuplicateObject(id));
        }
        if !spec.initial_value.is_finite() {
            return Err(CatalogueError::NonFinite {
                object_id: id,
                value: spec.initial_value,
            });
        }

        let ordinal = self
            .points
            .iter()
            .filter(|p| p.sensor == spec.sensor)
            .count() as u32
            + 1;
        self.index.insert(id, self.points.len());
        self.points.push(AnalogPoint {
            object_id: id,
            sensor: spec.sensor,
            ordinal,
            name: spec.name,
            feed_field: spec.feed_field,
            present_value: spec.sensor.clamp(spec.initial_value),
        });
        Ok(())
    }

    fn point_mut(&mut self, id: ObjectId) -> Option<&mut AnalogPoint> {
        let idx = *self.index.get(&id)?;
        self.points.get_mut(idx)
    }
}

/// Thread-safe table of the device object and its analog points.
#[derive(Debug)]
pub struct Catalogue {
    device: Arc<DeviceObject>,
    table: RwLock<Table>,
}

impl Catalogue {
    /// Builds a catalogue with the given points. Duplicate or non-point
    /// identifiers abort construction.
    pub fn new(
        device: DeviceObject,
        database_revision: u32,
        points: impl IntoIterator<Item = PointSpec>,
    ) -> Result<Self, CatalogueError> {
        let mut table = Table {
            points: Vec::new(),
            index: HashMap::new(),
            database_revision,
        };
        for spec in points {
            table.insert(device.object_id, spec)?;
        }
        log::debug!(
            "catalogue for {} built with {} points",
            device.object_id,
            table.points.len()
        );
        Ok(Self {
            device: Arc::new(device),
            table: RwLock::new(table),
        })
    }

    /// Builds the catalogue described by `config`, drawing unconfigured
    /// initial values from `rng`.
    pub fn from_config<R: Rng + ?Sized>(
        config: &SimulatorConfig,
        rng: &mut R,
    ) -> Result<Self, CatalogueError> {
        Self::new(
            DeviceObject::from(&config.device),
            config.device.database_revision,
            config.point_specs(rng),
        )
    }

    pub fn device(&self) -> &DeviceObject {
        &self.device
    }

    pub fn device_id(&self) -> ObjectId {
        self.device.object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Result<ObjectSnapshot, CatalogueError> {
        let table = self.table.read();
        if id == self.device.object_id {
            return Ok(ObjectSnapshot::Device(DeviceSnapshot {
                device: Arc::clone(&self.device),
                object_list: self.object_list(&table),
                database_revision: table.database_revision,
            }));
        }
        table
            .index
            .get(&id)
            .and_then(|&idx| table.points.get(idx))
            .cloned()
            .map(ObjectSnapshot::Point)
            .ok_or(CatalogueError::UnknownObject(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        id == self.device.object_id || self.table.read().index.contains_key(&id)
    }

    /// Device first, then every point in insertion order.
    pub fn list_objects(&self) -> Vec<ObjectId> {
        let table = self.table.read();
        self.object_list(&table)
    }

    fn object_list(&self, table: &Table) -> Vec<ObjectId> {
        std::iter::once(self.device.object_id)
            .chain(table.points.iter().map(|p| p.object_id))
            .collect()
    }

    /// Copies of every point, in insertion order.
    pub fn points(&self) -> Vec<AnalogPoint> {
        self.table.read().points.clone()
    }

    pub fn point_count(&self) -> usize {
        self.table.read().points.len()
    }

    pub fn get_present_value(&self, id: ObjectId) -> Result<f32, CatalogueError> {
        let table = self.table.read();
        match table.index.get(&id) {
            Some(&idx) => Ok(table.points[idx].present_value),
            None if id == self.device.object_id => Err(CatalogueError::NotAPoint(id)),
            None => Err(CatalogueError::UnknownObject(id)),
        }
    }

    /// Stores `value` as the present-value of point `id`, clamped to the
    /// point's sensor-class bounds. Returns the value actually stored.
    pub fn set_present_value(&self, id: ObjectId, value: f32) -> Result<f32, CatalogueError> {
        let device_id = self.device.object_id;
        let mut table = self.table.write();
        let point = match table.point_mut(id) {
            Some(point) => point,
            None if id == device_id => return Err(CatalogueError::NotAPoint(id)),
            None => return Err(CatalogueError::UnknownObject(id)),
        };
        if !value.is_finite() {
            return Err(CatalogueError::NonFinite {
                object_id: id,
                value,
            });
        }
        let stored = point.sensor.clamp(value);
        if stored != value {
            log::debug!("{id}: present-value {value} clamped to {stored}");
        }
        point.present_value = stored;
        Ok(stored)
    }

    /// Applies `f` to every point under one exclusive lock. `Some(v)` replaces
    /// the present-value (clamped); `None` and non-finite results leave it
    /// untouched. Returns how many points were updated.
    pub fn update_present_values<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&AnalogPoint) -> Option<f32>,
    {
        let mut table = self.table.write();
        let mut updated = 0;
        for point in &mut table.points {
            match f(point) {
                Some(value) if value.is_finite() => {
                    point.present_value = point.sensor.clamp(value);
                    updated += 1;
                }
                Some(value) => {
                    log::debug!("{}: ignoring non-finite update {value}", point.object_id);
                }
                None => {}
            }
        }
        updated
    }

    /// Inserts a point after startup. Bumps the database revision.
    pub fn add_point(&self, spec: PointSpec) -> Result<(), CatalogueError> {
        let mut table = self.table.write();
        let id = spec.object_id;
        table.insert(self.device.object_id, spec)?;
        table.database_revision = table.database_revision.wrapping_add(1);
        log::info!(
            "added {id}; database revision now {}",
            table.database_revision
        );
        Ok(())
    }

    pub fn database_revision(&self) -> u32 {
        self.table.read().database_revision
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalogue, DeviceObject, ObjectSnapshot};
    use crate::config::{DeviceConfig, SimulatorConfig};
    use crate::error::CatalogueError;
    use crate::point::{PointSpec, SensorClass};
    use bacsim_core::types::{ObjectId, ObjectType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ai(instance: u32) -> ObjectId {
        ObjectId::new(ObjectType::AnalogInput, instance)
    }

    fn spec(instance: u32, sensor: SensorClass, initial_value: f32) -> PointSpec {
        PointSpec {
            object_id: ai(instance),
            sensor,
            name: None,
            initial_value,
            feed_field: None,
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue::new(
            DeviceObject::from(&DeviceConfig::default()),
            1,
            vec![
                spec(1, SensorClass::Temperature, 21.0),
                spec(2, SensorClass::Pressure, 101.0),
                spec(3, SensorClass::Temperature, 22.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lists_device_first_then_points_in_insertion_order() {
        let cat = catalogue();
        let device = ObjectId::new(ObjectType::Device, 2001);
        assert_eq!(cat.list_objects(), vec![device, ai(1), ai(2), ai(3)]);

        let Ok(ObjectSnapshot::Device(snapshot)) = cat.get_object(device) else {
            panic!("expected device snapshot");
        };
        assert_eq!(snapshot.object_list.len(), 1 + cat.point_count());
        assert_eq!(snapshot.database_revision, 1);
    }

    #[test]
    fn ordinals_count_within_sensor_class() {
        let cat = catalogue();
        let points = cat.points();
        assert_eq!(points[0].object_name(), "Temp Sensor 1");
        assert_eq!(points[1].object_name(), "Pressure Sensor 1");
        assert_eq!(points[2].object_name(), "Temp Sensor 2");
    }

    #[test]
    fn unknown_objects_and_non_points_are_rejected() {
        let cat = catalogue();
        let device = cat.device_id();
        assert_eq!(
            cat.get_object(ai(99)).unwrap_err(),
            CatalogueError::UnknownObject(ai(99))
        );
        assert_eq!(
            cat.get_present_value(device).unwrap_err(),
            CatalogueError::NotAPoint(device)
        );
        assert_eq!(
            cat.set_present_value(device, 1.0).unwrap_err(),
            CatalogueError::NotAPoint(device)
        );
        assert_eq!(
            cat.set_present_value(ai(42), 1.0).unwrap_err(),
            CatalogueError::UnknownObject(ai(42))
        );
    }

    #[test]
    fn set_clamps_and_rejects_non_finite() {
        let cat = catalogue();
        assert_eq!(cat.set_present_value(ai(1), 30.5).unwrap(), 30.5);
        assert_eq!(cat.set_present_value(ai(1), 99.0).unwrap(), 35.0);
        assert_eq!(cat.get_present_value(ai(1)).unwrap(), 35.0);
        assert!(matches!(
            cat.set_present_value(ai(1), f32::NAN),
            Err(CatalogueError::NonFinite { .. })
        ));
        assert_eq!(cat.get_present_value(ai(1)).unwrap(), 35.0);
    }

    #[test]
    fn present_value_writes_leave_revision_alone() {
        let cat = catalogue();
        cat.set_present_value(ai(2), 90.0).unwrap();
        cat.update_present_values(|p| Some(p.present_value() + 1.0));
        assert_eq!(cat.database_revision(), 1);
    }

    #[test]
    fn add_point_bumps_revision_and_rejects_duplicates() {
        let cat = catalogue();
        cat.add_point(spec(4, SensorClass::Humidity, 40.0)).unwrap();
        assert_eq!(cat.database_revision(), 2);
        assert_eq!(cat.list_objects().last(), Some(&ai(4)));

        assert_eq!(
            cat.add_point(spec(4, SensorClass::Humidity, 40.0)).unwrap_err(),
            CatalogueError::DuplicateObject(ai(4))
        );
        assert_eq!(cat.database_revision(), 2);
    }

    #[test]
    fn update_skips_none_and_non_finite() {
        let cat = catalogue();
        let updated = cat.update_present_values(|p| match p.object_id().instance() {
            1 => Some(f32::INFINITY),
            2 => Some(200.0),
            _ => None,
        });
        assert_eq!(updated, 1);
        assert_eq!(cat.get_present_value(ai(1)).unwrap(), 21.0);
        assert_eq!(cat.get_present_value(ai(2)).unwrap(), 130.0);
        assert_eq!(cat.get_present_value(ai(3)).unwrap(), 22.0);
    }

    #[test]
    fn builds_default_transmitter_from_config() {
        let cat =
            Catalogue::from_config(&SimulatorConfig::default(), &mut StdRng::seed_from_u64(3))
                .unwrap();
        assert_eq!(cat.point_count(), 9);
        assert_eq!(cat.device().name, "PPFTransmitter");
        for point in cat.points() {
            let profile = point.sensor().profile();
            assert!((profile.seed_min..=profile.seed_max).contains(&point.present_value()));
        }
    }
}
