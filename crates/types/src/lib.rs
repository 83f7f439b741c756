//! Boardpulse Types
//!
//! Shared models and traits for the boardpulse exporter. This crate
//! contains the tracker-side domain models, the metric point/batch
//! structures, and the async traits the core consumes its external
//! collaborators through.

pub mod metrics;
pub mod models;
pub mod tracker;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use models::{
	parse_jira_datetime, CustomFieldError, CustomFields, Issue, IssueFields, Project, Sprint,
	Status, StatusCategory,
};

pub use metrics::{Batch, Datapoint, MetricPoint, MetricValue, MetricsSink, PushError, PushResult};

pub use tracker::{TrackerClient, TrackerError, TrackerResult};
