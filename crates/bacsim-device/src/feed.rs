//! External feed snapshots.
//!
//! A feed is a flat map of named numeric or boolean fields published by some
//! other process (a PLC driver, a test script, ...). The relay source polls
//! [`FeedSource::latest`] and copies bound fields into points. Publishers
//! replace whole snapshots; readers never see a partially written one.

use crate::error::FeedError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default snapshot location used by field drivers.
pub const DEFAULT_FEED_PATH: &str = "/tmp/padA_state.json";

/// One feed field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedValue {
    Bool(bool),
    Number(f64),
}

impl FeedValue {
    /// Booleans map to `1.0`/`0.0`.
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Number(v) => v as f32,
        }
    }
}

impl From<f64> for FeedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FeedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedSnapshot {
    fields: BTreeMap<String, FeedValue>,
}

impl FeedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FeedValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FeedValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<FeedValue> {
        self.fields.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a JSON object, keeping numeric and boolean members and skipping
    /// everything else.
    pub fn from_json_str(input: &str) -> Result<Self, FeedError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        let serde_json::Value::Object(members) = value else {
            return Err(FeedError::NotAnObject);
        };
        let mut snapshot = Self::new();
        for (name, member) in members {
            match member {
                serde_json::Value::Bool(b) => snapshot.insert(name, b),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(v) => snapshot.insert(name, v),
                    None => log::debug!("feed field {name}: unrepresentable number"),
                },
                _ => log::debug!("feed field {name}: not numeric, skipped"),
            }
        }
        Ok(snapshot)
    }

    pub fn to_json_string(&self) -> Result<String, FeedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Where the relay source gets snapshots from.
pub trait FeedSource: Send + Sync {
    /// The most recent complete snapshot, or `None` if nothing usable has
    /// been published.
    fn latest(&self) -> Option<Arc<FeedSnapshot>>;
}

/// In-process feed. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedFeed {
    current: Arc<RwLock<Option<Arc<FeedSnapshot>>>>,
}

impl SharedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: FeedSnapshot) {
        *self.current.write() = Some(Arc::new(snapshot));
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }
}

impl FeedSource for SharedFeed {
    fn latest(&self) -> Option<Arc<FeedSnapshot>> {
        self.current.read().clone()
    }
}

/// Feed backed by a JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<FeedSnapshot, FeedError> {
        let input = fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        FeedSnapshot::from_json_str(&input)
    }

    /// Writes `snapshot` to a uniquely named sibling temp file and renames it
    /// over the feed path, so concurrent readers see either the old or the new
    /// snapshot and concurrent publishers never share a temp file.
    pub fn publish(&self, snapshot: &FeedSnapshot) -> Result<(), FeedError> {
        let body = snapshot.to_json_string()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| FeedError::Io {
            path: self.path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(body.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl Default for JsonFileFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_PATH)
    }
}

impl FeedSource for JsonFileFeed {
    fn latest(&self) -> Option<Arc<FeedSnapshot>> {
        match self.read() {
            Ok(snapshot) => Some(Arc::new(snapshot)),
            Err(e) => {
                log::debug!("feed {}: {e}", self.path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedSnapshot, FeedSource, FeedValue, JsonFileFeed, SharedFeed};
    use crate::error::FeedError;

    #[test]
    fn parses_numeric_and_boolean_fields_only() {
        let snapshot =
            FeedSnapshot::from_json_str(r#"{"level": 21.5, "pump": true, "label": "A", "n": 3}"#)
                .unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get("level"), Some(FeedValue::Number(21.5)));
        assert_eq!(snapshot.get("pump").map(FeedValue::as_f32), Some(1.0));
        assert_eq!(snapshot.get("n").map(FeedValue::as_f32), Some(3.0));
        assert_eq!(snapshot.get("label"), None);
    }

    #[test]
    fn rejects_non_objects_and_garbage() {
        assert!(matches!(
            FeedSnapshot::from_json_str("[1, 2]"),
            Err(FeedError::NotAnObject)
        ));
        assert!(matches!(
            FeedSnapshot::from_json_str("{\"level\": "),
            Err(FeedError::Json(_))
        ));
    }

    #[test]
    fn shared_feed_swaps_whole_snapshots() {
        let feed = SharedFeed::new();
        assert!(feed.latest().is_none());

        let publisher = feed.clone();
        publisher.publish(FeedSnapshot::new().with("pressure", 101.0));
        let first = feed.latest().unwrap();
        publisher.publish(FeedSnapshot::new().with("pressure", 99.0));

        assert_eq!(first.get("pressure"), Some(FeedValue::Number(101.0)));
        assert_eq!(
            feed.latest().unwrap().get("pressure"),
            Some(FeedValue::Number(99.0))
        );

        publisher.clear();
        assert!(feed.latest().is_none());
    }

    #[test]
    fn json_file_feed_round_trips_through_publish() {
        let dir = tempfile::tempdir().unwrap();
        let feed = JsonFileFeed::new(dir.path().join("state.json"));
        assert!(feed.latest().is_none());

        feed.publish(&FeedSnapshot::new().with("level", 22.0).with("alarm", false))
            .unwrap();
        let snapshot = feed.latest().unwrap();
        assert_eq!(snapshot.get("level"), Some(FeedValue::Number(22.0)));
        assert_eq!(snapshot.get("alarm"), Some(FeedValue::Bool(false)));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn unparsable_file_reads_as_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileFeed::new(path).latest().is_none());
    }

    #[test]
    fn concurrent_publishers_never_leave_a_torn_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let feed = JsonFileFeed::new(path.clone());
                std::thread::spawn(move || {
                    for i in 0..25 {
                        feed.publish(&FeedSnapshot::new().with("level", f64::from(n * 100 + i)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = JsonFileFeed::new(path).read().unwrap();
        assert_eq!(snapshot.len(), 1);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
