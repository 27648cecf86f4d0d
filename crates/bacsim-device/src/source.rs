//! Value sources that move present-values between requests.

use crate::catalogue::Catalogue;
use crate::feed::{FeedSource, FeedValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// One strategy for advancing point readings. The scheduler calls
/// [`tick`](Self::tick) once per period.
pub trait ValueSource: Send {
    fn name(&self) -> &'static str;

    /// Applies one update to the catalogue. Returns how many points changed.
    fn tick(&mut self, catalogue: &Catalogue) -> usize;
}

/// Bounded random walk: every point moves by an independent uniform step in
/// `[-step, +step]` for its sensor class, then is clamped to the class bounds.
#[derive(Debug)]
pub struct SyntheticDrift {
    rng: StdRng,
}

impl SyntheticDrift {
    /// A fixed `seed` makes successive runs produce identical walks.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl ValueSource for SyntheticDrift {
    fn name(&self) -> &'static str {
        "synthetic-drift"
    }

    fn tick(&mut self, catalogue: &Catalogue) -> usize {
        let rng = &mut self.rng;
        catalogue.update_present_values(|point| {
            let step = point.sensor().profile().step;
            Some(point.present_value() + rng.gen_range(-step..=step))
        })
    }
}

/// Copies bound fields of the latest feed snapshot into their points.
///
/// A tick with no snapshot, or a point whose field is absent, leaves the
/// affected present-values as they were.
pub struct FeedRelay {
    feed: Arc<dyn FeedSource>,
}

impl FeedRelay {
    pub fn new(feed: Arc<dyn FeedSource>) -> Self {
        Self { feed }
    }
}

impl std::fmt::Debug for FeedRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedRelay").finish_non_exhaustive()
    }
}

impl ValueSource for FeedRelay {
    fn name(&self) -> &'static str {
        "feed-relay"
    }

    fn tick(&mut self, catalogue: &Catalogue) -> usize {
        // Fetched before taking the catalogue lock; file feeds do I/O here.
        let Some(snapshot) = self.feed.latest() else {
            log::debug!("feed relay: no snapshot available");
            return 0;
        };
        catalogue.update_present_values(|point| {
            let field = point.feed_field()?;
            let value = snapshot.get(field);
            if value.is_none() {
                log::debug!("feed relay: field {field} missing for {}", point.object_id());
            }
            value.map(FeedValue::as_f32)
        })
    }
}
