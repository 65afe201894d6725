use crate::types::MetricKind;
use thiserror::Error;

/// Construction-time failures. Fatal; the engine is never built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("key set is empty")]
    EmptyKeys,
    #[error("duplicate key `{key}`")]
    DuplicateKey { key: String },
    #[error("window set is empty")]
    EmptyWindows,
    #[error("window size 0 is not a valid window")]
    ZeroWindow,
    #[error("metric set is empty")]
    EmptyMetrics,
    #[error("capacity {capacity} retains too little history for max window {max_window}")]
    CapacityTooSmall { capacity: usize, max_window: usize },
}

/// A malformed batch. The failing `step` mutates nothing; the caller may
/// retry with corrected input.
#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("batch is missing configured key `{key}`")]
    MissingKey { key: String },
    #[error("batch carries unknown key `{key}`")]
    UnknownKey { key: String },
    #[error("non-finite sample {value} for key `{key}`")]
    NonFiniteSample { key: String, value: f64 },
}

/// Read-side failures. Callers routinely probe boundary offsets, so these
/// are typed results rather than panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown key `{key}`")]
    UnknownKey { key: String },
    #[error("window {window} is not configured")]
    UnknownWindow { window: usize },
    #[error("metric `{kind}` is not configured")]
    UnknownMetric { kind: MetricKind },
    #[error("offset {offset} is beyond retained history ({available} samples)")]
    OutOfRange { offset: usize, available: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("window {window} is invalid for input of length {len}")]
    InvalidWindow { window: usize, len: usize },
    #[error("metric `{kind}` has no bulk form")]
    UnsupportedMetric { kind: MetricKind },
}
