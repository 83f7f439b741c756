//! Boardpulse Configuration
//!
//! Configuration management and startup utilities for the boardpulse
//! exporter.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::load_config;
pub use settings::{
	ConfigValidationError, JiraSettings, LogFormat, LoggingSettings, MetricsSettings,
	ProjectSettings, RunnerSettings, ServerSettings, Settings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
