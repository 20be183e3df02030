use axum::extract::{Path, State};
use axum::response::Json;
use serde::Serialize;

use arena_types::{Asset, CreatePoolRequest, NewAsset, Pool, PoolLiquidity};

use crate::auth::Identity;
use crate::handlers::common::ApiError;
use crate::state::AppState;

/// Pool together with its current reserves
#[derive(Debug, Serialize)]
pub struct PoolResponse {
	#[serde(flatten)]
	pub pool: Pool,
	pub liquidity: PoolLiquidity,
}

/// GET /api/v1/pools
pub async fn get_pools(State(state): State<AppState>) -> Result<Json<Vec<Pool>>, ApiError> {
	let pools = state.registry_service.list_pools().await?;
	Ok(Json(pools))
}

/// GET /api/v1/pools/{id}
pub async fn get_pool(
	State(state): State<AppState>,
	Path(pool_id): Path<String>,
) -> Result<Json<PoolResponse>, ApiError> {
	let (pool, liquidity) = state.registry_service.get_pool(&pool_id).await?;
	Ok(Json(PoolResponse { pool, liquidity }))
}

/// POST /api/v1/pools - Create a pool; fee split and virtual reserves are
/// fixed at this point
pub async fn create_pool(
	State(state): State<AppState>,
	Identity(_ctx): Identity,
	Json(request): Json<CreatePoolRequest>,
) -> Result<Json<PoolResponse>, ApiError> {
	let (pool, liquidity) = state.registry_service.create_pool(&request).await?;
	Ok(Json(PoolResponse { pool, liquidity }))
}

/// GET /api/v1/assets
pub async fn get_assets(State(state): State<AppState>) -> Result<Json<Vec<Asset>>, ApiError> {
	let assets = state.registry_service.list_assets().await?;
	Ok(Json(assets))
}

/// POST /api/v1/assets - Register (or resolve) an asset by symbol
pub async fn create_asset(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Json(mut request): Json<NewAsset>,
) -> Result<Json<Asset>, ApiError> {
	request.created_by = Some(ctx.user_id);
	let asset = state.registry_service.get_or_create_asset(request).await?;
	Ok(Json(asset))
}
