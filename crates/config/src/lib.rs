//! Arena Config
//!
//! Configuration loading and settings structures for the Arena Exchange
//! server.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError};
pub use loader::load_config;
pub use settings::{
	CustodySettings, EnvironmentProfile, EnvironmentSettings, ExchangeSettings, LogFormat,
	LoggingSettings, ServerSettings, Settings,
};
pub use startup_logger::{log_service_info, log_settings_summary, log_startup_complete};
