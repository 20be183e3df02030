//! Startup logging helpers

use tracing::{info, warn};

use crate::{EnvironmentProfile, Settings};

/// Log service identity and build information once at startup
pub fn log_service_info() {
	info!(
		"Starting {} v{}",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION")
	);
}

/// Log the effective configuration after it has been validated
pub fn log_settings_summary(settings: &Settings) {
	info!(
		"Environment: {:?} (debug={})",
		settings.environment.profile, settings.environment.debug
	);
	info!("Custody endpoint: {}", settings.custody.base_url);
	info!(
		"Platform fee account: {}",
		settings.exchange.platform_account_id
	);
	if settings.exchange.approval_verify_disabled {
		warn!("APPROVAL SIGNATURE VERIFICATION IS DISABLED - not safe for production");
	}
	if settings.environment.profile == EnvironmentProfile::Production
		&& settings.environment.debug
	{
		warn!("Debug mode enabled in production profile");
	}
}

/// Log the final ready message with the bound address
pub fn log_startup_complete(bind_address: &str) {
	info!("Arena Exchange listening on {}", bind_address);
}
