//! Boardpulse
//!
//! Exports Jira epic and sprint progress as Warp10 time series. Two
//! recurring cycles poll the tracker, aggregate story points and
//! impediments, and push one metric batch per cycle; a small HTTP
//! surface exposes a liveness endpoint.
//!
//! # Quick start
//!
//! ```no_run
//! use boardpulse::ExporterBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! 	ExporterBuilder::new().start_server().await
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

use boardpulse_adapters::{JiraClient, Warp10Pusher};
use boardpulse_api::create_router;
use boardpulse_config::{
	load_config, log_service_info, log_service_shutdown, log_startup_complete, LogFormat,
	LoggingSettings, Settings,
};
use boardpulse_service::{start, BatchEmitter, Cycle, EpicCollector, SprintCollector};
use boardpulse_types::{MetricsSink, TrackerClient};

pub use boardpulse_adapters as adapters;
pub use boardpulse_api as api;
pub use boardpulse_config as config;
pub use boardpulse_service as service;
pub use boardpulse_types as types;

/// Entry point wiring configuration, adapters, cycles and the HTTP
/// surface together.
pub struct ExporterBuilder {
	settings: Option<Settings>,
}

impl ExporterBuilder {
	pub fn new() -> Self {
		Self { settings: None }
	}

	/// Use pre-built settings instead of loading them from file and
	/// environment.
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Run the exporter until an OS termination signal arrives.
	///
	/// Startup is fail-fast: configuration, validation and the health
	/// endpoint bind all abort the process on error. After that, cycle
	/// failures only ever reach the logs.
	pub async fn start_server(self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let settings = match self.settings {
			Some(settings) => settings,
			None => load_config()?,
		};

		init_tracing(&settings.logging);
		log_service_info();
		settings.validate()?;

		let tracker: Arc<dyn TrackerClient> = Arc::new(JiraClient::new(
			&settings.jira.url,
			&settings.jira.username,
			&settings.jira.password,
		)?);
		let sink: Arc<dyn MetricsSink> =
			Arc::new(Warp10Pusher::new(&settings.metrics.url, &settings.metrics.token)?);
		let emitter = BatchEmitter::new(sink);
		let projects = settings.projects();

		let bind_address = settings.bind_address();
		let listener = tokio::net::TcpListener::bind(&bind_address).await?;
		let server = tokio::spawn(async move {
			if let Err(error) = axum::serve(listener, create_router()).await {
				error!(%error, "Health endpoint server failed");
			}
		});
		log_startup_complete(&bind_address);

		let sprint = SprintCollector::new(
			Arc::clone(&tracker),
			emitter.clone(),
			projects.clone(),
			settings.jira.story_point_field.clone(),
			settings.jira.impediment_field.clone(),
			settings.jira.closed_statuses.clone(),
		);
		let epic = EpicCollector::new(
			tracker,
			emitter,
			projects,
			settings.jira.story_point_field.clone(),
		);

		let period = settings.runner.period();
		let sprint_handle = start(Arc::new(sprint) as Arc<dyn Cycle>, period);
		// staggered by a second so the two cycles rarely hit the tracker
		// at the same instant
		let epic_handle = start(
			Arc::new(epic) as Arc<dyn Cycle>,
			period + Duration::from_secs(1),
		);

		shutdown_signal().await;
		log_service_shutdown();

		sprint_handle.stop().await;
		epic_handle.stop().await;
		server.abort();

		Ok(())
	}
}

impl Default for ExporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn init_tracing(settings: &LoggingSettings) {
	// Config level unless RUST_LOG overrides it
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(&settings.level));

	match settings.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

			if settings.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter);

			if settings.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter);

			if settings.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
	}
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
	let ctrl_c = async {
		tokio::signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install SIGTERM handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
