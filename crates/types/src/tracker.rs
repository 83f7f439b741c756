//! Tracking-service query client trait

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Issue, Sprint};

/// Errors raised by the tracking-service client
#[derive(Debug, Error)]
pub enum TrackerError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("tracker returned HTTP {status}: {reason}")]
	Status { status: u16, reason: String },

	#[error("invalid tracker response: {reason}")]
	InvalidResponse { reason: String },

	#[error("tracker configuration error: {reason}")]
	Config { reason: String },
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Query interface of the tracking service.
///
/// Implementations paginate internally and return fully materialized
/// sequences. The core never retries these calls; a failure surfaces
/// as an error value and the cycle decides how much work to abandon.
#[async_trait]
pub trait TrackerClient: Send + Sync {
	/// Search issues by JQL, restricted to the given fields.
	async fn search_issues(&self, jql: &str, fields: &[&str]) -> TrackerResult<Vec<Issue>>;

	/// List the active sprints of a board.
	async fn active_sprints(&self, board: u64) -> TrackerResult<Vec<Sprint>>;

	/// Fetch the issues of a sprint, optionally narrowed by a JQL filter.
	async fn sprint_issues(&self, sprint: u64, jql: Option<&str>) -> TrackerResult<Vec<Issue>>;
}
