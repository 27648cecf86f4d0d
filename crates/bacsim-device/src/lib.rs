//! Virtual BACnet field-device engine.
//!
//! The engine keeps a [`Catalogue`] of one device object and a set of analog
//! points, moves their present-values with a [`ValueSource`] driven by the
//! [`scheduler`], and answers decoded requests through the [`Dispatcher`].
//! Wire encoding is left to whichever protocol stack embeds it.
//!
//! ```no_run
//! # async fn demo() -> Result<(), bacsim_device::ConfigError> {
//! use bacsim_device::{Simulator, SimulatorConfig};
//!
//! let sim = Simulator::from_config(&SimulatorConfig::default())?;
//! let scheduler = sim.start();
//! // hand sim.dispatcher() to the protocol stack ...
//! scheduler.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
pub mod config;
pub mod cov;
pub mod dispatcher;
pub mod error;
pub mod feed;
pub mod point;
pub mod resolver;
pub mod scheduler;
pub mod simulator;
pub mod source;

pub use catalogue::{Catalogue, DeviceObject, DeviceSnapshot, ObjectSnapshot};
pub use config::{DeviceConfig, DispatchConfig, PointConfig, SimulatorConfig, SourceConfig};
pub use cov::{CovSlot, CovSubscription};
pub use dispatcher::Dispatcher;
pub use error::{CatalogueError, ConfigError, FeedError, PropertyError, ServiceFailure};
pub use feed::{FeedSnapshot, FeedSource, FeedValue, JsonFileFeed, SharedFeed};
pub use point::{AnalogPoint, PointSpec, SensorClass};
pub use scheduler::DriftScheduler;
pub use simulator::Simulator;
pub use source::{FeedRelay, SyntheticDrift, ValueSource};
