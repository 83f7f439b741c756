//! Domain models for the tracked entities
//!
//! These are the read-only shapes the exporter consumes from the
//! tracking service, plus the immutable project configuration unit.

pub mod issue;
pub mod project;
pub mod sprint;

pub use issue::{
	parse_jira_datetime, CustomFieldError, CustomFields, Issue, IssueFields, Status,
	StatusCategory,
};
pub use project::Project;
pub use sprint::Sprint;
