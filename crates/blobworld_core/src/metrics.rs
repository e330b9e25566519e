//! Frame metrics and structured logging for the simulation.
//!
//! Counters are plain atomics so a collaborator holding a shared reference
//! (an overlay, a test) can read them while the frame loop owns the
//! simulation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running totals for one simulation instance.
pub struct Metrics {
    frame_count: AtomicU64,
    organisms: AtomicU64,
    fruit: AtomicU64,
    spawned: AtomicU64,
    pruned: AtomicU64,
    rotations: AtomicU64,
    fruit_spawned: AtomicU64,
    fruit_collected: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(600)
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` frames.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            frame_count: AtomicU64::new(0),
            organisms: AtomicU64::new(0),
            fruit: AtomicU64::new(0),
            spawned: AtomicU64::new(0),
            pruned: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            fruit_spawned: AtomicU64::new(0),
            fruit_collected: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed frame with its wall-clock duration.
    pub fn record_frame(&self, duration: Duration, organisms: usize, fruit: usize) {
        let frame = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.organisms.store(organisms as u64, Ordering::Relaxed);
        self.fruit.store(fruit as u64, Ordering::Relaxed);

        if frame % self.log_interval == 0 {
            tracing::info!(
                frame,
                organisms,
                fruit,
                rotations = self.rotations(),
                collected = self.fruit_collected(),
                duration_us = duration.as_micros() as u64,
                "Simulation frame"
            );
        }
    }

    pub fn record_spawn(&self) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prune(&self) {
        self.pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fruit_spawn(&self) {
        self.fruit_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fruit_collected(&self) {
        self.fruit_collected.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn organisms(&self) -> u64 {
        self.organisms.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fruit(&self) -> u64 {
        self.fruit.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn pruned(&self) -> u64 {
        self.pruned.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fruit_spawned(&self) -> u64 {
        self.fruit_spawned.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fruit_collected(&self) -> u64 {
        self.fruit_collected.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new(10);
        assert_eq!(metrics.frame_count(), 0);
        assert_eq!(metrics.spawned(), 0);
    }

    #[test]
    fn test_record_frame() {
        let metrics = Metrics::new(10);
        metrics.record_frame(Duration::from_millis(16), 4, 2);
        assert_eq!(metrics.frame_count(), 1);
        assert_eq!(metrics.organisms(), 4);
        assert_eq!(metrics.fruit(), 2);
    }

    #[test]
    fn test_counters() {
        let metrics = Metrics::default();
        metrics.record_rotation();
        metrics.record_rotation();
        metrics.record_fruit_collected();
        assert_eq!(metrics.rotations(), 2);
        assert_eq!(metrics.fruit_collected(), 1);
    }
}
