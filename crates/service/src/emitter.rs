//! Batch emitter
//!
//! Single funnel between the collectors and the metrics sink. Push
//! failures are logged and swallowed so a sink outage never takes a
//! collection cycle down with it.

use std::sync::Arc;
use tracing::{debug, error};

use boardpulse_types::{Batch, MetricsSink};

#[derive(Clone)]
pub struct BatchEmitter {
	sink: Arc<dyn MetricsSink>,
}

impl BatchEmitter {
	pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
		Self { sink }
	}

	/// Push a batch to the sink. Empty batches are dropped without
	/// touching the sink at all.
	pub async fn emit(&self, batch: Batch) {
		if batch.is_empty() {
			debug!("Skipping empty batch");
			return;
		}

		debug!(points = batch.len(), "Emitting batch");
		if let Err(error) = self.sink.push(&batch).await {
			error!(%error, "Failed to push batch");
		}
	}
}
