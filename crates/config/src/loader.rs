//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File};

/// Load configuration from the config file and the environment.
///
/// The file path comes from `CONFIG_PATH` (default `config/config`,
/// any extension the config crate understands); a missing file is not
/// an error. `BOARDPULSE__`-prefixed environment variables override
/// file values, e.g. `BOARDPULSE__JIRA__PASSWORD`.
pub fn load_config() -> Result<Settings, ConfigError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config".to_string());

	let s = Config::builder()
		.add_source(File::with_name(&path).required(false))
		.add_source(Environment::with_prefix("BOARDPULSE").separator("__"))
		.build()?;

	s.try_deserialize()
}
