//! Periodic driver for a [`ValueSource`].

use crate::catalogue::Catalogue;
use crate::source::ValueSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawns the tick loop on the current tokio runtime.
///
/// The first update lands one full `period` after spawning. Each tick runs on
/// the blocking pool, since a feed relay reads its file synchronously. The
/// loop stops when the returned handle is stopped or dropped.
pub fn spawn(
    catalogue: Arc<Catalogue>,
    source: Box<dyn ValueSource>,
    period: Duration,
) -> DriftScheduler {
    let period = period.max(Duration::from_millis(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    log::info!(
        "starting {} scheduler every {}ms",
        source.name(),
        period.as_millis()
    );
    let task = tokio::spawn(run(catalogue, source, period, shutdown_rx));
    DriftScheduler {
        task: Some(task),
        shutdown: shutdown_tx,
    }
}

async fn run(
    catalogue: Arc<Catalogue>,
    source: Box<dyn ValueSource>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> u64 {
    let name = source.name();
    let mut source = Some(source);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0u64;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let Some(mut current) = source.take() else {
                    break;
                };
                let catalogue = catalogue.clone();
                // Ticks may do synchronous file I/O; keep them off the async workers.
                let tick = tokio::task::spawn_blocking(move || {
                    let updated = current.tick(&catalogue);
                    (current, updated)
                });
                match tick.await {
                    Ok((current, updated)) => {
                        source = Some(current);
                        ticks += 1;
                        log::trace!("{name} tick {ticks}: {updated} points updated");
                    }
                    Err(e) => {
                        log::error!("{name} tick failed: {e}");
                        break;
                    }
                }
            }
        }
    }

    log::info!("{name} scheduler stopped after {ticks} ticks");
    ticks
}

/// Handle to a running scheduler task.
#[derive(Debug)]
pub struct DriftScheduler {
    task: Option<JoinHandle<u64>>,
    shutdown: watch::Sender<bool>,
}

impl DriftScheduler {
    /// Signals the loop to stop and waits for it. Returns the number of ticks
    /// that ran.
    pub async fn stop(mut self) -> u64 {
        let _ = self.shutdown.send(true);
        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                log::warn!("scheduler task ended abnormally: {e}");
                0
            }),
            None => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DriftScheduler {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
