//! Configuration settings structures

use serde::{Deserialize, Serialize};

use crate::configurable_value::ConfigurableValue;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	pub server: ServerSettings,
	pub exchange: ExchangeSettings,
	pub custody: CustodySettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Exchange engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExchangeSettings {
	/// Account credited with the platform's fee share. Passed explicitly
	/// into the ledger service; nothing resolves it from ambient state.
	pub platform_account_id: String,
	/// Skip artifact signature verification. Single-use and deadline
	/// bookkeeping still apply. Never enable in production.
	pub approval_verify_disabled: bool,
	/// Longest deadline an init call may request, in seconds from now
	pub max_deadline_window_secs: i64,
}

/// Custody (RGB Lightning Node) connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustodySettings {
	pub base_url: String,
	/// Optional bearer token, preferably an env reference
	pub bearer: Option<ConfigurableValue>,
	pub timeout_ms: u64,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub debug: bool,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Settings {
	/// Address the server binds to
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Refuse unsafe combinations before startup proceeds
	pub fn validate(&self) -> Result<(), String> {
		if self.exchange.platform_account_id.trim().is_empty() {
			return Err("exchange.platform_account_id must be set".to_string());
		}
		if self.exchange.approval_verify_disabled
			&& self.environment.profile == EnvironmentProfile::Production
		{
			return Err(
				"approval_verify_disabled must not be enabled in production".to_string(),
			);
		}
		if self.exchange.max_deadline_window_secs <= 0 {
			return Err("exchange.max_deadline_window_secs must be positive".to_string());
		}
		Ok(())
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings {
				host: "127.0.0.1".to_string(),
				port: 4000,
			},
			exchange: ExchangeSettings {
				platform_account_id: "platform".to_string(),
				approval_verify_disabled: false,
				max_deadline_window_secs: 3600,
			},
			custody: CustodySettings {
				base_url: "http://localhost:3001".to_string(),
				bearer: None,
				timeout_ms: 20_000,
			},
			environment: EnvironmentSettings {
				profile: EnvironmentProfile::Development,
				debug: false,
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Compact,
				structured: false,
			},
		}
	}
}
