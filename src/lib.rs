pub mod aggregator;
pub mod bulk;
pub mod error;
mod metrics;
pub mod store;
pub mod types;

pub use aggregator::RollingAggregator;
pub use bulk::BulkWindowView;
pub use error::{BulkError, ConfigError, QueryError, StepError};
pub use store::{RingBuffer, SampleSeries, SampleStore};
pub use types::{EngineConfig, MetricKind};

#[cfg(test)]
mod tests;
