//! Configuration loading utilities

use config::{Config, ConfigError, Environment, File};

use crate::Settings;

/// Load configuration from the config file, with `ARENA__*` environment
/// overrides (e.g. `ARENA__SERVER__PORT=8080`).
pub fn load_config() -> Result<Settings, ConfigError> {
	let s = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.add_source(Environment::with_prefix("ARENA").separator("__"))
		.build()?;

	s.try_deserialize()
}
