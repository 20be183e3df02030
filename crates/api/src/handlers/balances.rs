use axum::extract::State;
use axum::response::Json;

use arena_types::UserBalance;

use crate::auth::Identity;
use crate::handlers::common::ApiError;
use crate::state::AppState;

/// GET /api/v1/balances - The caller's balances across all assets
pub async fn get_balances(
	State(state): State<AppState>,
	Identity(ctx): Identity,
) -> Result<Json<Vec<UserBalance>>, ApiError> {
	let balances = state.ledger_service.balances_for_user(&ctx.user_id).await?;
	Ok(Json(balances))
}
