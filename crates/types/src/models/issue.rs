//! Issue model and the dynamic custom-field bag
//!
//! Issues are consumed read-only from the tracker's search payloads.
//! Anything the tracker reports under a `customfield_*` key lands in
//! [`CustomFields`], which exposes typed, defensive accessors instead
//! of raw dynamic casts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by typed access into the dynamic custom-field bag
#[derive(Debug, Error)]
pub enum CustomFieldError {
	#[error("field '{field}' is not numeric: {value}")]
	NotNumeric { field: String, value: Value },

	#[error("field '{field}' option value is not text: {value}")]
	NotText { field: String, value: Value },
}

/// A single issue as returned by the tracker's search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
	/// Internal identifier
	#[serde(default)]
	pub id: String,

	/// Human-readable issue key, e.g. `PJ1-42`
	pub key: String,

	/// Field payload; only the fields named in the search are present
	#[serde(default)]
	pub fields: IssueFields,
}

impl Issue {
	/// Coarse workflow state of the issue.
	///
	/// Returns [`StatusCategory::Undefined`] when the tracker reports
	/// no status at all.
	pub fn status_category(&self) -> StatusCategory {
		self.fields
			.status
			.as_ref()
			.and_then(|status| status.status_category.as_ref())
			.map(|category| category.key)
			.unwrap_or(StatusCategory::Undefined)
	}
}

/// Issue fields selected by the search queries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueFields {
	pub summary: Option<String>,

	pub labels: Vec<String>,

	pub status: Option<Status>,

	/// Creation timestamp, in the tracker's datetime format
	#[serde(deserialize_with = "deserialize_opt_jira_datetime")]
	pub created: Option<DateTime<Utc>>,

	/// Accumulated time spent on the issue, in seconds
	pub timespent: Option<i64>,

	/// Dynamic per-instance custom fields (story points, impediment type, ...)
	#[serde(flatten)]
	pub custom: CustomFields,
}

/// Issue status with its coarse category
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
	#[serde(rename = "statusCategory")]
	pub status_category: Option<StatusCategoryRef>,
}

/// The `statusCategory` object nested inside a status
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCategoryRef {
	pub key: StatusCategory,
}

/// Coarse workflow state as reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
	New,
	Indeterminate,
	Done,
	/// Missing or unrecognized status category
	#[serde(other)]
	Undefined,
}

impl StatusCategory {
	pub fn as_str(&self) -> &'static str {
		match self {
			StatusCategory::New => "new",
			StatusCategory::Indeterminate => "indeterminate",
			StatusCategory::Done => "done",
			StatusCategory::Undefined => "undefined",
		}
	}
}

impl std::fmt::Display for StatusCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Dynamic custom-field bag with typed accessors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(HashMap<String, Value>);

impl CustomFields {
	/// Raw value lookup
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Read a numeric custom field.
	///
	/// An absent or null field is `Ok(None)`; a present value that is
	/// not a JSON number is an error.
	pub fn float(&self, field: &str) -> Result<Option<f64>, CustomFieldError> {
		match self.0.get(field) {
			None | Some(Value::Null) => Ok(None),
			Some(value) => value
				.as_f64()
				.map(Some)
				.ok_or_else(|| CustomFieldError::NotNumeric {
					field: field.to_string(),
					value: value.clone(),
				}),
		}
	}

	/// Resolve the first option `value` from a select-list custom field.
	///
	/// The tracker models select-list fields as a list of objects each
	/// exposing a `value` key; the first such value is returned. An
	/// absent/null field, a non-list shape, or a list without any
	/// `value` key all resolve to `Ok(None)`. A `value` key that is
	/// present but not a string is an error.
	pub fn first_option_value(&self, field: &str) -> Result<Option<String>, CustomFieldError> {
		let items = match self.0.get(field) {
			Some(Value::Array(items)) => items,
			_ => return Ok(None),
		};

		for item in items {
			if let Value::Object(map) = item {
				if let Some(value) = map.get("value") {
					return match value {
						Value::String(text) => Ok(Some(text.clone())),
						other => Err(CustomFieldError::NotText {
							field: field.to_string(),
							value: other.clone(),
						}),
					};
				}
			}
		}

		Ok(None)
	}
}

/// Parse a tracker datetime.
///
/// Jira Cloud emits RFC3339 (`2019-05-17T10:44:10.000Z`) while Jira
/// Server emits a colon-less offset (`2019-05-17T10:44:10.000+0200`);
/// both are accepted.
pub fn parse_jira_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
	DateTime::parse_from_rfc3339(raw)
		.or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z"))
		.map(|parsed| parsed.with_timezone(&Utc))
}

fn deserialize_opt_jira_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw: Option<String> = Option::deserialize(deserializer)?;
	match raw {
		None => Ok(None),
		Some(text) => parse_jira_datetime(&text)
			.map(Some)
			.map_err(serde::de::Error::custom),
	}
}
