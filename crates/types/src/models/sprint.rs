//! Sprint model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::issue::parse_jira_datetime;

/// A sprint on an agile board
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
	pub id: u64,

	pub name: String,

	/// Active-state flag as reported by the board API (`active`, `closed`, ...)
	#[serde(default)]
	pub state: Option<String>,

	/// Sprint start, absent on sprints that were never started
	#[serde(default, deserialize_with = "deserialize_opt_sprint_datetime")]
	pub start_date: Option<DateTime<Utc>>,

	/// Sprint end, absent on open-ended sprints
	#[serde(default, deserialize_with = "deserialize_opt_sprint_datetime")]
	pub end_date: Option<DateTime<Utc>>,
}

fn deserialize_opt_sprint_datetime<'de, D>(
	deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
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
