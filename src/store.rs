use crate::error::{ConfigError, QueryError, StepError};
use fnv::FnvHashMap;

/// Fixed-capacity buffer with a wraparound write cursor. O(1) push and O(1)
/// lag-indexed access regardless of how much history is retained, unlike
/// linked-sequence history whose "last N" queries cost O(N) per query.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    cap: usize,
    len: usize,
    write: usize,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(cap: usize, fill: T) -> Self {
        Self {
            data: vec![fill; cap.max(1)],
            cap: cap.max(1),
            len: 0,
            write: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.data[self.write] = value;
        self.write += 1;
        if self.write == self.cap {
            self.write = 0;
        }
        if self.len < self.cap {
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn get_lag(&self, lag: usize) -> Option<T> {
        if lag >= self.len {
            return None;
        }
        let last = if self.write == 0 {
            self.cap - 1
        } else {
            self.write - 1
        };
        let idx = if last >= lag {
            last - lag
        } else {
            self.cap + last - lag
        };
        Some(self.data[idx])
    }

    /// Appends the last `window` entries to `out`, oldest first. Copies at
    /// most `len` entries when the window exceeds retained history.
    pub fn extend_window(&self, window: usize, out: &mut Vec<T>) {
        let take = window.min(self.len);
        out.reserve(take);
        for lag in (0..take).rev() {
            if let Some(value) = self.get_lag(lag) {
                out.push(value);
            }
        }
    }
}

/// Raw history of one key: retained samples plus the total ever appended.
/// `sample_count` is deliberately not clipped by capacity; several metrics
/// need "has this much history ever arrived" independent of retention.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    ring: RingBuffer<f64>,
    sample_count: u64,
}

impl SampleSeries {
    fn new(capacity: usize) -> Self {
        Self {
            ring: RingBuffer::new(capacity, f64::NAN),
            sample_count: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, value: f64) {
        self.ring.push(value);
        self.sample_count += 1;
    }

    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Samples currently held, clipped by capacity.
    #[inline]
    pub fn retained(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn get_lag(&self, lag: usize) -> Option<f64> {
        self.ring.get_lag(lag)
    }

    #[inline]
    pub fn ring(&self) -> &RingBuffer<f64> {
        &self.ring
    }
}

/// Append-only raw sample history for a fixed key set.
///
/// Flat layout: one `SampleSeries` per key slot, slot order following the
/// configured key order, with a hash lookup only at the string-keyed edge.
#[derive(Debug, Clone)]
pub struct SampleStore {
    keys: Vec<String>,
    slots: FnvHashMap<String, usize>,
    series: Vec<SampleSeries>,
    capacity: usize,
}

impl SampleStore {
    pub fn new(keys: &[String], capacity: usize) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyKeys);
        }
        let mut slots = FnvHashMap::default();
        slots.reserve(keys.len());
        for (slot, key) in keys.iter().enumerate() {
            if slots.insert(key.clone(), slot).is_some() {
                return Err(ConfigError::DuplicateKey { key: key.clone() });
            }
        }
        Ok(Self {
            keys: keys.to_vec(),
            slots,
            series: (0..keys.len()).map(|_| SampleSeries::new(capacity)).collect(),
            capacity,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[inline]
    pub fn key(&self, slot: usize) -> &str {
        debug_assert!(slot < self.keys.len(), "key slot out of bounds: {slot}");
        &self.keys[slot]
    }

    #[inline]
    pub fn slot_of(&self, key: &str) -> Option<usize> {
        self.slots.get(key).copied()
    }

    #[inline]
    pub fn series(&self, slot: usize) -> &SampleSeries {
        debug_assert!(slot < self.series.len(), "key slot out of bounds: {slot}");
        &self.series[slot]
    }

    #[inline]
    pub(crate) fn series_mut(&mut self, slot: usize) -> &mut SampleSeries {
        debug_assert!(slot < self.series.len(), "key slot out of bounds: {slot}");
        &mut self.series[slot]
    }

    /// Inserts at the newest position, evicting the oldest once at capacity.
    pub fn append(&mut self, key: &str, value: f64) -> Result<(), StepError> {
        let Some(slot) = self.slot_of(key) else {
            return Err(StepError::UnknownKey {
                key: key.to_string(),
            });
        };
        if !value.is_finite() {
            return Err(StepError::NonFiniteSample {
                key: key.to_string(),
                value,
            });
        }
        self.series[slot].push(value);
        Ok(())
    }

    /// The sample `offset` ticks behind the newest; offset 0 is the latest.
    pub fn get(&self, key: &str, offset: usize) -> Result<f64, QueryError> {
        let series = self.lookup(key)?;
        series.get_lag(offset).ok_or(QueryError::OutOfRange {
            offset,
            available: series.retained(),
        })
    }

    /// The last `window` samples, oldest to newest; shorter when less
    /// history is retained.
    pub fn get_window(&self, key: &str, window: usize) -> Result<Vec<f64>, QueryError> {
        let series = self.lookup(key)?;
        let mut out = Vec::new();
        series.ring().extend_window(window, &mut out);
        Ok(out)
    }

    pub fn sample_count(&self, key: &str) -> Result<u64, QueryError> {
        Ok(self.lookup(key)?.sample_count())
    }

    pub fn retained(&self, key: &str) -> Result<usize, QueryError> {
        Ok(self.lookup(key)?.retained())
    }

    fn lookup(&self, key: &str) -> Result<&SampleSeries, QueryError> {
        let slot = self.slot_of(key).ok_or_else(|| QueryError::UnknownKey {
            key: key.to_string(),
        })?;
        Ok(&self.series[slot])
    }
}
