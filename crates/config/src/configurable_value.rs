//! Values that resolve from the environment or from plain config text
//!
//! Secrets (custody bearer tokens) should use the `env` form so the real
//! value never lands in a config file.

use arena_types::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A config value that is either an env-var reference or inline text
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConfigurableValue {
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Env-var name for `Env`, the literal value for `Plain`
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve to the actual value
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			}),
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	/// Resolve and wrap for secure handling
	pub fn resolve_for_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		Ok(SecretString::from(self.resolve()?.as_str()))
	}
}

/// Errors that can occur when resolving configurable values
#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),
}

// Never show potentially sensitive plain values in logs
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_resolves_directly() {
		let value = ConfigurableValue::from_plain("token-123");
		assert_eq!(value.resolve().unwrap(), "token-123");
	}

	#[test]
	fn test_env_resolves_from_environment() {
		std::env::set_var("ARENA_TEST_BEARER", "from-env");
		let value = ConfigurableValue::from_env("ARENA_TEST_BEARER");
		assert_eq!(value.resolve().unwrap(), "from-env");
	}

	#[test]
	fn test_missing_env_var_errors() {
		let value = ConfigurableValue::from_env("ARENA_TEST_MISSING_VAR");
		assert!(value.resolve().is_err());
	}

	#[test]
	fn test_display_redacts_plain() {
		let value = ConfigurableValue::from_plain("token-123");
		assert_eq!(format!("{}", value), "plain:[REDACTED]");
	}
}
