//! Issue aggregation
//!
//! Turns a materialized sequence of issues into the numeric summaries
//! the collectors emit: story points bucketed by status category, the
//! unestimated and dependency counters, and impediment counts and
//! time-spent bucketed by impediment type.

use std::collections::HashMap;
use tracing::warn;

use boardpulse_types::Issue;

/// Label marking an issue as a cross-team dependency
pub const DEPENDENCY_LABEL: &str = "dependency";

/// Synthetic bucket accumulating every contribution
pub const TOTAL_BUCKET: &str = "total";

/// Impediment type used when the type field cannot be resolved
pub const UNKNOWN_IMPEDIMENT_TYPE: &str = "unknown";

/// Story-point summary over one issue sequence
#[derive(Debug, Clone, Default)]
pub struct StoryPointTotals {
	/// Summed story points keyed by status category, plus `total`
	pub points: HashMap<String, f64>,

	/// Issues with no estimate (absent field or exactly 0)
	pub unestimated: u32,

	/// Issues carrying the dependency label, counted once per issue
	pub dependencies: u32,
}

impl StoryPointTotals {
	pub fn total(&self) -> f64 {
		self.bucket(TOTAL_BUCKET)
	}

	pub fn bucket(&self, category: &str) -> f64 {
		self.points.get(category).copied().unwrap_or_default()
	}
}

/// Impediment summary over one issue sequence
#[derive(Debug, Clone, Default)]
pub struct ImpedimentTotals {
	/// Occurrence count keyed by impediment type, plus `total`
	pub counts: HashMap<String, u32>,

	/// Summed time-spent seconds keyed by impediment type, plus `total`
	pub seconds: HashMap<String, i64>,
}

impl ImpedimentTotals {
	pub fn count(&self, kind: &str) -> u32 {
		self.counts.get(kind).copied().unwrap_or_default()
	}

	pub fn seconds(&self, kind: &str) -> i64 {
		self.seconds.get(kind).copied().unwrap_or_default()
	}

	/// Distinct impediment types observed, excluding the synthetic
	/// `total` bucket.
	pub fn kinds(&self) -> impl Iterator<Item = &str> {
		self.counts
			.keys()
			.map(String::as_str)
			.filter(|kind| *kind != TOTAL_BUCKET)
	}
}

/// Aggregate story points by status category.
///
/// An issue whose story-point field is present but not numeric is
/// logged and skipped entirely. An absent field behaves as 0, and a
/// value of exactly 0 counts the issue as unestimated without feeding
/// any status bucket.
pub fn story_point_totals(issues: &[Issue], field: &str) -> StoryPointTotals {
	let mut totals = StoryPointTotals::default();

	for issue in issues {
		let points = match issue.fields.custom.float(field) {
			Ok(value) => value.unwrap_or_default(),
			Err(error) => {
				warn!(key = %issue.key, error = %error, "Failed to read story points");
				continue;
			},
		};

		*totals.points.entry(TOTAL_BUCKET.to_string()).or_default() += points;

		if issue
			.fields
			.labels
			.iter()
			.any(|label| label == DEPENDENCY_LABEL)
		{
			totals.dependencies += 1;
		}

		if points == 0.0 {
			totals.unestimated += 1;
			continue;
		}

		if issue.fields.status.is_none() {
			warn!(key = %issue.key, "Issue has no status");
		}
		let category = issue.status_category();
		*totals
			.points
			.entry(category.as_str().to_string())
			.or_default() += points;
	}

	totals
}

/// Aggregate impediment counts and time-spent by impediment type.
///
/// The type comes from the first option `value` of the impediment
/// field; an absent or shape-mismatched field resolves to `unknown`.
/// A malformed type value (present but not text) is logged and the
/// issue is skipped entirely, not even counting toward `total`.
pub fn impediment_totals(issues: &[Issue], field: &str) -> ImpedimentTotals {
	let mut totals = ImpedimentTotals::default();

	for issue in issues {
		let kind = match issue.fields.custom.first_option_value(field) {
			Ok(Some(kind)) => kind,
			Ok(None) => UNKNOWN_IMPEDIMENT_TYPE.to_string(),
			Err(error) => {
				warn!(key = %issue.key, error = %error, "Failed to read impediment type");
				continue;
			},
		};

		let spent = issue.fields.timespent.unwrap_or_default();
		for bucket in [TOTAL_BUCKET, kind.as_str()] {
			*totals.counts.entry(bucket.to_string()).or_default() += 1;
			*totals.seconds.entry(bucket.to_string()).or_default() += spent;
		}
	}

	totals
}
