use crate::store::RingBuffer;

/// One-pass accumulation over the last `window` samples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowStats {
    pub(crate) n: f64,
    pub(crate) sum: f64,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl WindowStats {
    #[inline]
    pub(crate) fn mean(self) -> f64 {
        self.sum / self.n
    }
}

/// `None` when the ring retains fewer than `window` samples. Accumulates
/// oldest to newest so the sum matches a left-to-right pass over the same
/// slice bit for bit.
pub(crate) fn collect_window_stats(ring: &RingBuffer<f64>, window: usize) -> Option<WindowStats> {
    if window == 0 || ring.len() < window {
        return None;
    }
    let mut sum = 0.0_f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for lag in (0..window).rev() {
        let value = ring.get_lag(lag)?;
        debug_assert!(value.is_finite(), "store admits only finite samples");
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }
    Some(WindowStats {
        n: window as f64,
        sum,
        min,
        max,
    })
}

/// Percent change with the zero-guard: a zero reference yields exactly 0.0
/// rather than an infinity or an error.
#[inline]
pub(crate) fn percent_change(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        current / reference - 1.0
    }
}

#[inline]
pub(crate) fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[inline]
pub(crate) fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[inline]
pub(crate) fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
