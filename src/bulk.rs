use crate::error::BulkError;
use crate::metrics::{max_of, mean_of, min_of};
use crate::types::MetricKind;

/// Offline counterpart of the live engine: overlapping fixed-size windows
/// over an already-loaded history, one statistic value per window position.
///
/// The windows are zero-copy views sharing the backing slice
/// (`slice::windows`); numerically the output is indistinguishable from
/// materializing each window and applying the statistic to it.
#[derive(Debug, Clone, Copy)]
pub struct BulkWindowView<'a> {
    data: &'a [f64],
    window: usize,
}

impl<'a> BulkWindowView<'a> {
    pub fn new(data: &'a [f64], window: usize) -> Result<Self, BulkError> {
        if window < 1 || window > data.len() {
            return Err(BulkError::InvalidWindow {
                window,
                len: data.len(),
            });
        }
        Ok(Self { data, window })
    }

    /// Number of window positions: `data.len() - window + 1`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.window + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window
    }

    /// The overlapping windows themselves, oldest position first.
    pub fn windows(&self) -> impl Iterator<Item = &'a [f64]> {
        self.data.windows(self.window)
    }

    pub fn mean(&self) -> Vec<f64> {
        self.map_windows(mean_of)
    }

    pub fn high(&self) -> Vec<f64> {
        self.map_windows(max_of)
    }

    pub fn low(&self) -> Vec<f64> {
        self.map_windows(min_of)
    }

    /// Dispatch by metric kind. The delta family is lag-relative rather
    /// than window-shaped and has no bulk form.
    pub fn apply(&self, kind: MetricKind) -> Result<Vec<f64>, BulkError> {
        match kind {
            MetricKind::Mean => Ok(self.mean()),
            MetricKind::High => Ok(self.high()),
            MetricKind::Low => Ok(self.low()),
            MetricKind::Delta
            | MetricKind::DeltaPercent
            | MetricKind::DeltaToMean
            | MetricKind::DeltaToMeanPercent => Err(BulkError::UnsupportedMetric { kind }),
        }
    }

    fn map_windows(&self, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
        self.data.windows(self.window).map(f).collect()
    }
}
