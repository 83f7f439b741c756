//! Configuration settings structures

use boardpulse_types::Project;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Validation errors for the loaded settings
#[derive(Debug, Error)]
pub enum ConfigValidationError {
	#[error("at least one project must be configured")]
	NoProjects,

	#[error("project '{name}' needs a non-zero board id")]
	MissingBoard { name: String },

	#[error("project {index} has an empty name")]
	MissingProjectName { index: usize },

	#[error("jira.{field} is required")]
	MissingJira { field: &'static str },

	#[error("metrics.{field} is required")]
	MissingMetrics { field: &'static str },
}

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub projects: Vec<ProjectSettings>,
	pub jira: JiraSettings,
	pub metrics: MetricsSettings,
	pub server: ServerSettings,
	pub runner: RunnerSettings,
	pub logging: LoggingSettings,
}

/// Individual project configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectSettings {
	/// Project key in the tracking service
	pub name: String,

	/// Agile board carrying the project's sprints
	pub board: u64,

	/// Optional raw JQL fragment appended to every project query
	pub jql_filter: Option<String>,

	/// Display label for metric points; defaults to the project name
	pub label: Option<String>,
}

/// Convert raw project settings into the immutable domain Project,
/// normalizing the label and pre-wrapping the filter fragment.
impl From<ProjectSettings> for Project {
	fn from(settings: ProjectSettings) -> Self {
		let label = settings
			.label
			.unwrap_or_else(|| settings.name.clone())
			.trim()
			.to_string();
		let jql = settings
			.jql_filter
			.map(|filter| format!("AND ({})", filter))
			.unwrap_or_default();

		Self {
			name: settings.name,
			board: settings.board,
			jql,
			label,
		}
	}
}

/// Tracking-service connection parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct JiraSettings {
	pub url: String,
	pub username: String,
	pub password: String,

	/// Status names considered closed when querying resolved impediments
	pub closed_statuses: Vec<String>,

	/// Custom field carrying the story-point estimate
	pub story_point_field: String,

	/// Custom field carrying the impediment type
	pub impediment_field: String,
}

impl Default for JiraSettings {
	fn default() -> Self {
		Self {
			url: String::new(),
			username: String::new(),
			password: String::new(),
			closed_statuses: vec![
				"Resolved".to_string(),
				"Closed".to_string(),
				"Done".to_string(),
			],
			story_point_field: "customfield_10006".to_string(),
			impediment_field: "customfield_11028".to_string(),
		}
	}
}

/// Metrics-backend connection parameters
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MetricsSettings {
	pub url: String,
	pub token: String,
}

/// Health endpoint bind parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8080,
		}
	}
}

/// Collection cycle timing
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerSettings {
	/// Sprint cycle interval in seconds; the epic cycle runs at this
	/// interval plus one second to stagger the two
	pub period_secs: u64,
}

impl Default for RunnerSettings {
	fn default() -> Self {
		Self { period_secs: 600 }
	}
}

impl RunnerSettings {
	pub fn period(&self) -> Duration {
		Duration::from_secs(self.period_secs)
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	#[default]
	Pretty,
	Compact,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			projects: Vec::new(),
			jira: JiraSettings::default(),
			metrics: MetricsSettings::default(),
			server: ServerSettings::default(),
			runner: RunnerSettings::default(),
			logging: LoggingSettings::default(),
		}
	}
}

impl Settings {
	/// Get the health endpoint bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Convert the configured projects into domain values
	pub fn projects(&self) -> Vec<Project> {
		self.projects.iter().cloned().map(Project::from).collect()
	}

	/// Validate startup-fatal constraints
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.projects.is_empty() {
			return Err(ConfigValidationError::NoProjects);
		}
		for (index, project) in self.projects.iter().enumerate() {
			if project.name.trim().is_empty() {
				return Err(ConfigValidationError::MissingProjectName { index });
			}
			if project.board == 0 {
				return Err(ConfigValidationError::MissingBoard {
					name: project.name.clone(),
				});
			}
		}

		if self.jira.url.is_empty() {
			return Err(ConfigValidationError::MissingJira { field: "url" });
		}
		if self.jira.username.is_empty() {
			return Err(ConfigValidationError::MissingJira { field: "username" });
		}
		if self.jira.password.is_empty() {
			return Err(ConfigValidationError::MissingJira { field: "password" });
		}

		if self.metrics.url.is_empty() {
			return Err(ConfigValidationError::MissingMetrics { field: "url" });
		}
		if self.metrics.token.is_empty() {
			return Err(ConfigValidationError::MissingMetrics { field: "token" });
		}

		Ok(())
	}
}
