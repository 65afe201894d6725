use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Closed set of derived statistics maintained per (key, window).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Mean,
    Delta,
    DeltaPercent,
    DeltaToMean,
    DeltaToMeanPercent,
    High,
    Low,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::Mean,
        MetricKind::Delta,
        MetricKind::DeltaPercent,
        MetricKind::DeltaToMean,
        MetricKind::DeltaToMeanPercent,
        MetricKind::High,
        MetricKind::Low,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Mean => "mean",
            MetricKind::Delta => "delta",
            MetricKind::DeltaPercent => "delta_percent",
            MetricKind::DeltaToMean => "delta_to_mean",
            MetricKind::DeltaToMeanPercent => "delta_to_mean_percent",
            MetricKind::High => "high",
            MetricKind::Low => "low",
        }
    }

    /// Samples that must have arrived before the metric is defined for
    /// `window`. The delta family compares against the sample exactly
    /// `window` ticks back, hence the extra one; high/low degrade to
    /// whatever history exists.
    pub const fn required_samples(self, window: usize) -> u64 {
        match self {
            MetricKind::Mean | MetricKind::DeltaToMean | MetricKind::DeltaToMeanPercent => {
                window as u64
            }
            MetricKind::Delta | MetricKind::DeltaPercent => window as u64 + 1,
            MetricKind::High | MetricKind::Low => 1,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration surface of [`crate::RollingAggregator`]. Immutable after
/// construction; keys, windows and metrics cannot change mid-stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tracked time series identifiers, e.g. trading pairs. Slot order
    /// follows this list.
    pub keys: Vec<String>,
    /// Window sizes every metric is maintained for.
    pub windows: Vec<usize>,
    /// Retained samples per key (ring-buffer capacity).
    pub capacity: usize,
    /// Maintained metrics; defaults to the full set.
    pub metrics: Vec<MetricKind>,
}

impl EngineConfig {
    pub fn new(keys: Vec<String>, windows: Vec<usize>, capacity: usize) -> Self {
        Self {
            keys,
            windows,
            capacity,
            metrics: MetricKind::ALL.to_vec(),
        }
    }

    pub fn with_metrics(mut self, metrics: Vec<MetricKind>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::EmptyKeys);
        }
        let mut seen = HashSet::with_capacity(self.keys.len());
        for key in &self.keys {
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateKey { key: key.clone() });
            }
        }
        if self.windows.is_empty() {
            return Err(ConfigError::EmptyWindows);
        }
        if self.windows.contains(&0) {
            return Err(ConfigError::ZeroWindow);
        }
        if self.metrics.is_empty() {
            return Err(ConfigError::EmptyMetrics);
        }
        let max_window = self.windows.iter().copied().max().unwrap_or(0);
        if self.capacity < max_window + 1 {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
                max_window,
            });
        }
        Ok(())
    }
}
