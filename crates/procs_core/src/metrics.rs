//! Run metrics for the simulation.
//!
//! Provides structured logging and counters for monitoring a long run.

use crate::events::CpuEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters accumulated across ticks.
pub struct Metrics {
    tick_count: AtomicU64,
    process_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    parasitisms: AtomicU64,
    bombs: AtomicU64,
    swaps: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            process_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            parasitisms: AtomicU64::new(0),
            bombs: AtomicU64::new(0),
            swaps: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick and the events it produced.
    pub fn record_tick(&self, duration: Duration, processes: usize, events: &[CpuEvent]) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.process_count
            .store(processes as u64, Ordering::Relaxed);

        for event in events {
            let counter = match event {
                CpuEvent::Birth { .. } => &self.births,
                CpuEvent::Death { .. } => &self.deaths,
                CpuEvent::Parasitism { .. } => &self.parasitisms,
                CpuEvent::NopBomb { .. } => &self.bombs,
                CpuEvent::Swap { .. } => &self.swaps,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                processes = processes,
                births = self.births(),
                deaths = self.deaths(),
                parasitisms = self.parasitisms(),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn process_count(&self) -> u64 {
        self.process_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn parasitisms(&self) -> u64 {
        self.parasitisms.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn bombs(&self) -> u64 {
        self.bombs.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
