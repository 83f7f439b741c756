//! Labeled time-series points and their Warp10 text encoding

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::BTreeMap;

/// Characters that must be escaped in Warp10 class names, labels and
/// text values (separators of the input format itself).
const WARP10_ESCAPE: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b',')
	.add(b'{')
	.add(b'}')
	.add(b'=')
	.add(b'\'')
	.add(b'"')
	.add(b'%');

/// A single datapoint value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
	Double(f64),
	Long(i64),
	/// Short enumerated string, used for sprint-boundary markers
	Text(String),
}

impl From<f64> for MetricValue {
	fn from(value: f64) -> Self {
		MetricValue::Double(value)
	}
}

impl From<i64> for MetricValue {
	fn from(value: i64) -> Self {
		MetricValue::Long(value)
	}
}

impl From<u32> for MetricValue {
	fn from(value: u32) -> Self {
		MetricValue::Long(i64::from(value))
	}
}

impl From<&str> for MetricValue {
	fn from(value: &str) -> Self {
		MetricValue::Text(value.to_string())
	}
}

impl MetricValue {
	fn encode(&self) -> String {
		match self {
			// Debug formatting keeps the decimal point so the backend
			// stores a double, not a long
			MetricValue::Double(value) => format!("{:?}", value),
			MetricValue::Long(value) => value.to_string(),
			MetricValue::Text(value) => {
				format!("'{}'", utf8_percent_encode(value, WARP10_ESCAPE))
			},
		}
	}
}

/// A timestamped value
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
	pub timestamp: DateTime<Utc>,
	pub value: MetricValue,
}

/// A fully-qualified, labeled time series with ordered datapoints
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
	/// Dotted class name, e.g. `boardpulse.jira.sprint.storypoint.total`
	pub class: String,

	/// Label keys are unique; insertion order is irrelevant
	pub labels: BTreeMap<String, String>,

	pub datapoints: Vec<Datapoint>,
}

impl MetricPoint {
	pub fn new(class: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			labels: BTreeMap::new(),
			datapoints: Vec::new(),
		}
	}

	pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.labels.insert(key.into(), value.into());
		self
	}

	pub fn datapoint(mut self, timestamp: DateTime<Utc>, value: impl Into<MetricValue>) -> Self {
		self.add_datapoint(timestamp, value);
		self
	}

	pub fn add_datapoint(&mut self, timestamp: DateTime<Utc>, value: impl Into<MetricValue>) {
		self.datapoints.push(Datapoint {
			timestamp,
			value: value.into(),
		});
	}

	pub fn label(&self, key: &str) -> Option<&str> {
		self.labels.get(key).map(String::as_str)
	}

	/// Append this series to a Warp10 text payload, one input line per
	/// datapoint: `<ts_us>// <class>{<labels>} <value>`.
	pub fn write_warp10(&self, out: &mut String) {
		let class = utf8_percent_encode(&self.class, WARP10_ESCAPE).to_string();
		let labels = self
			.labels
			.iter()
			.map(|(key, value)| {
				format!(
					"{}={}",
					utf8_percent_encode(key, WARP10_ESCAPE),
					utf8_percent_encode(value, WARP10_ESCAPE)
				)
			})
			.collect::<Vec<_>>()
			.join(",");

		for datapoint in &self.datapoints {
			out.push_str(&format!(
				"{}// {}{{{}}} {}\n",
				datapoint.timestamp.timestamp_micros(),
				class,
				labels,
				datapoint.value.encode()
			));
		}
	}
}
