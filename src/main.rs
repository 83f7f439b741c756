//! Boardpulse Exporter
//!
//! Main entry point for the metrics exporter

use boardpulse::ExporterBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	ExporterBuilder::new().start_server().await
}
