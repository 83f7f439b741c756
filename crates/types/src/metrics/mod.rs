//! Metric point and batch structures
//!
//! A metric point is a named, labeled time series with an ordered
//! sequence of (timestamp, value) datapoints. Points produced during
//! one collection cycle are accumulated into a [`Batch`] and pushed to
//! the metrics backend as a single unit.

pub mod batch;
pub mod point;
pub mod sink;

pub use batch::Batch;
pub use point::{Datapoint, MetricPoint, MetricValue};
pub use sink::{MetricsSink, PushError, PushResult};
