use axum::extract::State;
use axum::response::Json;
use tracing::debug;

use arena_types::{QuoteRequest, QuoteResponse};

use crate::handlers::common::ApiError;
use crate::state::AppState;

/// POST /api/v1/quotes - Advisory quote, public and read-only
pub async fn post_quote(
	State(state): State<AppState>,
	Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
	debug!(
		"Quote request: pool {} asset_in {} amount {}",
		request.pool_id, request.asset_in_id, request.amount_in
	);
	let response = state.quote_service.quote(&request).await?;
	Ok(Json(response))
}
