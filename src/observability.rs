//! Logging setup and in-process page counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::editor::SaveOutcome;

/// Install the global `tracing` subscriber, `RUST_LOG` or `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for editor and public traffic
#[derive(Debug, Default)]
pub struct Metrics {
    pages_created: AtomicU64,
    pages_updated: AtomicU64,
    pages_deleted: AtomicU64,
    pages_served: AtomicU64,
    serve_misses: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_saved(&self, outcome: SaveOutcome) {
        let (counter, name) = match outcome {
            SaveOutcome::Created => (&self.pages_created, "pages_created"),
            SaveOutcome::Updated => (&self.pages_updated, "pages_updated"),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = name, "Metric incremented");
    }

    pub fn page_deleted(&self) {
        self.pages_deleted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "pages_deleted", "Metric incremented");
    }

    pub fn page_served(&self) {
        self.pages_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn serve_miss(&self) {
        self.serve_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "serve_misses", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_created: self.pages_created.load(Ordering::Relaxed),
            pages_updated: self.pages_updated.load(Ordering::Relaxed),
            pages_deleted: self.pages_deleted.load(Ordering::Relaxed),
            pages_served: self.pages_served.load(Ordering::Relaxed),
            serve_misses: self.serve_misses.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub pages_created: u64,
    pub pages_updated: u64,
    pub pages_deleted: u64,
    pub pages_served: u64,
    pub serve_misses: u64,
}
