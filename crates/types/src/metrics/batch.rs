//! Per-cycle batch of metric points

use super::point::MetricPoint;

/// Ordered collection of metric points produced during one collection
/// cycle. Owned exclusively by that cycle invocation and discarded
/// after the push.
#[derive(Debug, Clone, Default)]
pub struct Batch {
	points: Vec<MetricPoint>,
}

impl Batch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, point: MetricPoint) {
		self.points.push(point);
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn points(&self) -> &[MetricPoint] {
		&self.points
	}

	/// Serialize the whole batch as a Warp10 text payload.
	pub fn to_warp10(&self) -> String {
		let mut out = String::new();
		for point in &self.points {
			point.write_warp10(&mut out);
		}
		out
	}
}
