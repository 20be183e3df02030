use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use arena_types::StorageStats;

use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
	"OK"
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
	pub status: String,
	pub storage_healthy: bool,
	pub custody_healthy: bool,
	pub stats: Option<StorageStats>,
}

/// GET /ready - Readiness probe with storage and custody checks
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
	let storage_healthy = state.storage.health_check().await.unwrap_or(false);
	let custody_healthy = state.custody.node_info().await.is_ok();
	let stats = state.storage.stats().await.ok();

	// Custody being down degrades funding but not trading; only storage
	// gates readiness.
	let status = if storage_healthy {
		if custody_healthy {
			"ready"
		} else {
			"degraded"
		}
	} else {
		"unavailable"
	};
	let code = if storage_healthy {
		StatusCode::OK
	} else {
		StatusCode::SERVICE_UNAVAILABLE
	};

	(
		code,
		Json(ReadinessResponse {
			status: status.to_string(),
			storage_healthy,
			custody_healthy,
			stats,
		}),
	)
}
