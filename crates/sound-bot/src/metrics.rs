//! In-memory operational metrics with snapshot persistence.
//!
//! These counters live at the transport boundary and are independent of
//! the durable usage store: the two are deliberately not reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Persisted form of the metrics counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub startup_count: u64,
    pub command_metrics: HashMap<String, u64>,
}

/// Process-wide metrics. Owned by the server state behind a lock; the
/// runtime is multi-threaded, so unguarded mutation is not an option.
pub struct Metrics {
    startup_count: u64,
    command_metrics: HashMap<String, u64>,
    started_at: Instant,
    started_at_utc: DateTime<Utc>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            startup_count: 0,
            command_metrics: HashMap::new(),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    /// Count one inbound invocation of a raw command text (e.g. "/boom").
    pub fn record(&mut self, command: &str) {
        *self.command_metrics.entry(command.to_string()).or_insert(0) += 1;
    }

    /// Merge a persisted snapshot additively into the live counters.
    ///
    /// Call at most once per process start: restoring the same snapshot
    /// twice doubles every count.
    pub fn restore(&mut self, snapshot: MetricsSnapshot) {
        self.startup_count += snapshot.startup_count;
        for (command, count) in snapshot.command_metrics {
            *self.command_metrics.entry(command).or_insert(0) += count;
        }
    }

    /// Count this process start.
    pub fn mark_startup(&mut self) {
        self.startup_count += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            startup_count: self.startup_count,
            command_metrics: self.command_metrics.clone(),
        }
    }

    pub fn startup_count(&self) -> u64 {
        self.startup_count
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn started_at_utc(&self) -> DateTime<Utc> {
        self.started_at_utc
    }

    pub fn total_commands(&self) -> u64 {
        self.command_metrics.values().sum()
    }

    /// The most frequently seen command, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.command_metrics
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(command, count)| (command.as_str(), *count))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the raw command token from message text, suffix and all.
pub fn raw_command(text: &str) -> Option<&str> {
    let token = text.split_whitespace().next()?;
    token.starts_with('/').then_some(token)
}

/// Load a snapshot from disk. Absence or a corrupt file starts from zero.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Option<MetricsSnapshot> {
    let bytes = match tokio::fs::read(path.as_ref()).await {
        Ok(b) => b,
        Err(_) => return None,
    };

    match serde_json::from_slice(&bytes) {
        Ok(snapshot) => {
            info!("Loaded metrics snapshot from {:?}", path.as_ref());
            Some(snapshot)
        }
        Err(e) => {
            warn!("Ignoring corrupt metrics snapshot {:?}: {}", path.as_ref(), e);
            None
        }
    }
}

/// Write a snapshot to disk.
pub async fn save_snapshot(
    path: impl AsRef<Path>,
    snapshot: &MetricsSnapshot,
) -> std::io::Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    tokio::fs::write(path.as_ref(), json).await?;
    info!("Saved metrics snapshot to {:?}", path.as_ref());
    Ok(())
}
