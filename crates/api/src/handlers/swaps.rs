use axum::extract::{Path, State};
use axum::response::Json;
use tracing::info;

use arena_types::{
	ConfirmSwapRequest, InitSwapRequest, SwapConfirmResponse, SwapInitResponse, SwapView,
};

use crate::auth::Identity;
use crate::handlers::common::ApiError;
use crate::state::AppState;

/// POST /api/v1/swaps - Create a pending swap intent for external signing
pub async fn post_swap(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Json(request): Json<InitSwapRequest>,
) -> Result<Json<SwapInitResponse>, ApiError> {
	info!(
		"Swap init from user {}: pool {} amount_in {}",
		ctx.user_id, request.pool_id, request.amount_in
	);
	let response = state.swap_service.init_swap(&ctx, &request).await?;
	Ok(Json(response))
}

/// POST /api/v1/swaps/{id}/confirm - Confirm with a signed artifact
pub async fn confirm_swap(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(swap_id): Path<String>,
	Json(request): Json<ConfirmSwapRequest>,
) -> Result<Json<SwapConfirmResponse>, ApiError> {
	let response = state
		.swap_service
		.confirm_swap(&ctx, &swap_id, &request.artifact)
		.await?;
	Ok(Json(response))
}

/// POST /api/v1/swaps/{id}/cancel - Force a pending swap to expire
pub async fn cancel_swap(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(swap_id): Path<String>,
) -> Result<Json<SwapView>, ApiError> {
	let view = state.swap_service.cancel_swap(&ctx, &swap_id).await?;
	Ok(Json(view))
}

/// GET /api/v1/swaps/{id}
pub async fn get_swap(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(swap_id): Path<String>,
) -> Result<Json<SwapView>, ApiError> {
	let view = state.swap_service.get_swap(&ctx, &swap_id).await?;
	Ok(Json(view))
}

/// GET /api/v1/swaps - The caller's swaps
pub async fn get_swaps(
	State(state): State<AppState>,
	Identity(ctx): Identity,
) -> Result<Json<Vec<SwapView>>, ApiError> {
	let views = state.swap_service.swaps_for_user(&ctx).await?;
	Ok(Json(views))
}
