//! Wiring of catalogue, dispatcher and value source from one configuration.

use crate::catalogue::Catalogue;
use crate::config::{SimulatorConfig, SourceConfig};
use crate::dispatcher::Dispatcher;
use crate::error::ConfigError;
use crate::feed::{FeedSource, JsonFileFeed, SharedFeed};
use crate::scheduler::{self, DriftScheduler};
use crate::source::{FeedRelay, SyntheticDrift, ValueSource};
use bacsim_core::{InboundRequest, Response};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// A configured virtual device.
///
/// The catalogue is shared by [`Arc`] between the dispatcher and the value
/// scheduler; nothing here is global.
pub struct Simulator {
    catalogue: Arc<Catalogue>,
    dispatcher: Arc<Dispatcher>,
    source: SourceConfig,
    feed: Option<Arc<dyn FeedSource>>,
    shared_feed: Option<SharedFeed>,
}

impl Simulator {
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.source {
            SourceConfig::Synthetic {
                seed: Some(seed), ..
            } => StdRng::seed_from_u64(seed),
            _ => StdRng::from_entropy(),
        };
        let catalogue = Arc::new(Catalogue::from_config(config, &mut rng)?);
        let dispatcher = Arc::new(Dispatcher::new(catalogue.clone(), config.dispatch.clone()));

        let mut shared_feed = None;
        let feed: Option<Arc<dyn FeedSource>> = match &config.source {
            SourceConfig::Synthetic { .. } => None,
            SourceConfig::Feed {
                path: Some(path), ..
            } => {
                log::info!("relaying feed file {}", path.display());
                Some(Arc::new(JsonFileFeed::new(path.clone())))
            }
            SourceConfig::Feed { path: None, .. } => {
                let shared = SharedFeed::new();
                shared_feed = Some(shared.clone());
                Some(Arc::new(shared))
            }
        };

        log::info!(
            "device {} ({}) ready with {} points",
            catalogue.device_id(),
            catalogue.device().name,
            catalogue.point_count()
        );
        Ok(Self {
            catalogue,
            dispatcher,
            source: config.source.clone(),
            feed,
            shared_feed,
        })
    }

    /// Replaces the feed the relay reads from. Has no effect on a synthetic
    /// source.
    pub fn with_feed(mut self, feed: Arc<dyn FeedSource>) -> Self {
        self.feed = Some(feed);
        self.shared_feed = None;
        self
    }

    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Publisher for an in-memory feed source (feed kind without a path).
    pub fn shared_feed(&self) -> Option<&SharedFeed> {
        self.shared_feed.as_ref()
    }

    pub fn handle(&self, request: &InboundRequest) -> Option<Response> {
        self.dispatcher.handle(request)
    }

    /// A fresh value source matching the configuration.
    pub fn value_source(&self) -> Box<dyn ValueSource> {
        match (&self.source, &self.feed) {
            (SourceConfig::Feed { .. }, Some(feed)) => Box::new(FeedRelay::new(feed.clone())),
            (SourceConfig::Synthetic { seed, .. }, _) => Box::new(SyntheticDrift::new(*seed)),
            (SourceConfig::Feed { .. }, None) => {
                // from_config always installs a feed for this kind
                Box::new(FeedRelay::new(Arc::new(SharedFeed::new())))
            }
        }
    }

    /// Starts the periodic value task on the current tokio runtime.
    pub fn start(&self) -> DriftScheduler {
        scheduler::spawn(
            self.catalogue.clone(),
            self.value_source(),
            self.source.tick_interval(),
        )
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("device", &self.catalogue.device_id())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
