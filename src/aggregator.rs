//! Live incremental engine: per-tick recomputation of every configured
//! metric for every (key, window) pair.

use crate::error::{ConfigError, QueryError, StepError};
use crate::metrics::{collect_window_stats, percent_change, WindowStats};
use crate::store::{RingBuffer, SampleStore};
use crate::types::{EngineConfig, MetricKind};
use std::collections::HashMap;
use tracing::{debug, trace};

/// History of one (key, window, metric) cell. `None` is the "insufficient
/// history" marker, distinct from both `0.0` and NaN. Exclusively owned by
/// the aggregator; callers only read through accessors.
#[derive(Debug, Clone)]
struct MetricSeries {
    ring: RingBuffer<Option<f64>>,
}

impl MetricSeries {
    fn new(capacity: usize) -> Self {
        Self {
            ring: RingBuffer::new(capacity, None),
        }
    }

    #[inline]
    fn push(&mut self, value: Option<f64>) {
        self.ring.push(value);
    }

    #[inline]
    fn latest(&self) -> Option<f64> {
        self.ring.get_lag(0).flatten()
    }

    fn history(&self) -> Vec<Option<f64>> {
        let mut out = Vec::new();
        self.ring.extend_window(self.ring.len(), &mut out);
        out
    }
}

/// Streaming rolling-window aggregation over a fixed key set.
///
/// Each `step` ingests one `{key -> value}` batch, appends raw samples and
/// recomputes every configured metric for every (key, window) pair. Metric
/// histories live in per-cell ring buffers of the same capacity as the raw
/// store, so metrics-of-metrics can reference prior derived values.
///
/// Single-owner and synchronous: no I/O, no internal locking. Callers
/// wanting parallel ingestion shard by key across independent aggregators.
#[derive(Debug, Clone)]
pub struct RollingAggregator {
    store: SampleStore,
    windows: Vec<usize>,
    metrics: Vec<MetricKind>,
    // Flat layout: [key][window][metric] for fewer allocations and better
    // locality.
    series: Vec<MetricSeries>,
    batch_scratch: Vec<f64>,
    tick_count: u64,
}

impl RollingAggregator {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = SampleStore::new(&config.keys, config.capacity)?;
        let mut windows = config.windows;
        windows.sort_unstable();
        windows.dedup();
        let mut metrics = config.metrics;
        metrics.sort_unstable();
        metrics.dedup();
        let cell_count = store.key_count() * windows.len() * metrics.len();
        let series = (0..cell_count)
            .map(|_| MetricSeries::new(config.capacity))
            .collect();
        debug!(
            keys = store.key_count(),
            windows = windows.len(),
            metrics = metrics.len(),
            capacity = config.capacity,
            "rolling aggregator ready"
        );
        Ok(Self {
            batch_scratch: Vec::with_capacity(store.key_count()),
            store,
            windows,
            metrics,
            series,
            tick_count: 0,
        })
    }

    /// Ingests one tick. All-or-nothing: the whole batch is validated
    /// before any state mutation, so a failing call leaves the aggregator
    /// exactly as it was.
    pub fn step(&mut self, batch: &HashMap<String, f64>) -> Result<(), StepError> {
        self.batch_scratch.clear();
        for slot in 0..self.store.key_count() {
            let key = self.store.key(slot);
            let Some(&value) = batch.get(key) else {
                return Err(StepError::MissingKey {
                    key: key.to_string(),
                });
            };
            if !value.is_finite() {
                return Err(StepError::NonFiniteSample {
                    key: key.to_string(),
                    value,
                });
            }
            self.batch_scratch.push(value);
        }
        if batch.len() != self.store.key_count() {
            for key in batch.keys() {
                if self.store.slot_of(key).is_none() {
                    return Err(StepError::UnknownKey { key: key.clone() });
                }
            }
        }

        for slot in 0..self.store.key_count() {
            let value = self.batch_scratch[slot];
            self.store.series_mut(slot).push(value);
        }
        self.tick_count += 1;

        for key_slot in 0..self.store.key_count() {
            let newest = self.batch_scratch[key_slot];
            for window_idx in 0..self.windows.len() {
                self.update_cell(key_slot, window_idx, newest);
            }
        }
        trace!(tick = self.tick_count, "step applied");
        Ok(())
    }

    /// Recomputes every metric of one (key, window) cell for the current
    /// tick. Strict order: the mean comes first because the delta-to-mean
    /// family consumes the mean of the same tick, which includes the
    /// just-appended value.
    fn update_cell(&mut self, key_slot: usize, window_idx: usize, newest: f64) {
        let window = self.windows[window_idx];
        let series = self.store.series(key_slot);
        let stats = collect_window_stats(series.ring(), window);
        let mean = stats.map(WindowStats::mean);
        // Sample exactly `window` ticks back; None until window + 1 samples
        // have arrived.
        let reference = series.get_lag(window);
        // High/low degrade to whatever history exists instead of reporting
        // a marker.
        let effective_window = window.min(series.retained());
        let extremes = collect_window_stats(series.ring(), effective_window);

        for metric_idx in 0..self.metrics.len() {
            let value = match self.metrics[metric_idx] {
                MetricKind::Mean => mean,
                MetricKind::Delta => reference.map(|r| newest - r),
                MetricKind::DeltaPercent => reference.map(|r| percent_change(newest, r)),
                MetricKind::DeltaToMean => mean.map(|m| newest - m),
                MetricKind::DeltaToMeanPercent => mean.map(|m| percent_change(newest, m)),
                MetricKind::High => extremes.map(|s| s.max),
                MetricKind::Low => extremes.map(|s| s.min),
            };
            let idx = self.cell_idx(key_slot, window_idx, metric_idx);
            self.series[idx].push(value);
        }
    }

    #[inline]
    fn cell_idx(&self, key_slot: usize, window_idx: usize, metric_idx: usize) -> usize {
        debug_assert!(
            key_slot < self.store.key_count(),
            "key_slot out of bounds: {key_slot}"
        );
        debug_assert!(
            window_idx < self.windows.len(),
            "window_idx out of bounds: {window_idx}"
        );
        debug_assert!(
            metric_idx < self.metrics.len(),
            "metric_idx out of bounds: {metric_idx}"
        );
        (key_slot * self.windows.len() + window_idx) * self.metrics.len() + metric_idx
    }

    fn lookup(&self, kind: MetricKind, key: &str, window: usize) -> Result<usize, QueryError> {
        let key_slot = self.store.slot_of(key).ok_or_else(|| QueryError::UnknownKey {
            key: key.to_string(),
        })?;
        let window_idx = self
            .windows
            .iter()
            .position(|&w| w == window)
            .ok_or(QueryError::UnknownWindow { window })?;
        let metric_idx = self
            .metrics
            .iter()
            .position(|&m| m == kind)
            .ok_or(QueryError::UnknownMetric { kind })?;
        Ok(self.cell_idx(key_slot, window_idx, metric_idx))
    }

    /// The metric value of the current tick; `None` while history is
    /// insufficient (or before the first tick).
    pub fn latest(
        &self,
        kind: MetricKind,
        key: &str,
        window: usize,
    ) -> Result<Option<f64>, QueryError> {
        Ok(self.series[self.lookup(kind, key, window)?].latest())
    }

    /// Retained metric history, oldest to newest, one entry per tick.
    pub fn history(
        &self,
        kind: MetricKind,
        key: &str,
        window: usize,
    ) -> Result<Vec<Option<f64>>, QueryError> {
        Ok(self.series[self.lookup(kind, key, window)?].history())
    }

    /// Current value of one metric across every key, in slot order.
    pub fn latest_by_key(
        &self,
        kind: MetricKind,
        window: usize,
    ) -> Result<Vec<(&str, Option<f64>)>, QueryError> {
        let mut out = Vec::with_capacity(self.store.key_count());
        for key_slot in 0..self.store.key_count() {
            let key = self.store.key(key_slot);
            out.push((key, self.latest(kind, key, window)?));
        }
        Ok(out)
    }

    #[inline]
    pub fn keys(&self) -> &[String] {
        self.store.keys()
    }

    #[inline]
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    #[inline]
    pub fn metrics(&self) -> &[MetricKind] {
        &self.metrics
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Ticks ingested so far; not clipped by capacity.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Read-only view of the raw sample store.
    #[inline]
    pub fn store(&self) -> &SampleStore {
        &self.store
    }
}
