//! Boardpulse Adapters
//!
//! HTTP adapters for the external collaborators: the Jira query client
//! and the Warp10 metrics pusher, plus the JQL query-string builders.

pub mod jira;
pub mod jql;
pub mod warp10;

pub use jira::JiraClient;
pub use warp10::Warp10Pusher;

pub use boardpulse_types::{MetricsSink, PushError, TrackerClient, TrackerError};
