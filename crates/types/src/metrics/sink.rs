//! Metrics-backend transport trait

use async_trait::async_trait;
use thiserror::Error;

use super::batch::Batch;

/// Errors raised while pushing a batch to the metrics backend
#[derive(Debug, Error)]
pub enum PushError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("metrics backend returned HTTP {status}: {reason}")]
	Status { status: u16, reason: String },

	#[error("metrics transport configuration error: {reason}")]
	Config { reason: String },
}

/// Result type for push operations
pub type PushResult<T = ()> = Result<T, PushError>;

/// Transport for pushing a batch of metric points to the backend.
///
/// The core treats the push as best effort: a failure is logged by the
/// caller and the batch is dropped, never retried.
#[async_trait]
pub trait MetricsSink: Send + Sync {
	async fn push(&self, batch: &Batch) -> PushResult;
}
