//! Warp10 metrics pusher

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use boardpulse_types::{Batch, MetricsSink, PushError, PushResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_HEADER: &str = "X-Warp10-Token";

/// Pushes metric batches to a Warp10 update endpoint.
///
/// The batch is serialized to the Warp10 text input format and POSTed
/// to `<url>/api/v0/update` with the write token header. Best effort:
/// no retry, no spooling.
#[derive(Debug, Clone)]
pub struct Warp10Pusher {
	http: Client,
	update_url: String,
	token: String,
}

impl Warp10Pusher {
	pub fn new(url: &str, token: &str) -> PushResult<Self> {
		let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

		Ok(Self {
			http,
			update_url: format!("{}/api/v0/update", url.trim_end_matches('/')),
			token: token.to_string(),
		})
	}
}

#[async_trait]
impl MetricsSink for Warp10Pusher {
	async fn push(&self, batch: &Batch) -> PushResult {
		let body = batch.to_warp10();
		debug!(points = batch.len(), "Pushing batch to Warp10");

		let response = self
			.http
			.post(&self.update_url)
			.header(TOKEN_HEADER, &self.token)
			.header(CONTENT_TYPE, "text/plain")
			.body(body)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(PushError::Status {
				status: status.as_u16(),
				reason,
			});
		}

		Ok(())
	}
}
