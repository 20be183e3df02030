use axum::extract::{Path, State};
use axum::response::Json;
use tracing::info;

use arena_types::{Deposit, DepositRequest, Withdrawal, WithdrawalRequest};

use crate::auth::Identity;
use crate::handlers::common::ApiError;
use crate::state::AppState;

/// POST /api/v1/deposits - Record an inbound transfer awaiting settlement
pub async fn post_deposit(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Json(request): Json<DepositRequest>,
) -> Result<Json<Deposit>, ApiError> {
	let deposit = state
		.ledger_service
		.request_deposit(&ctx.user_id, &request)
		.await?;
	Ok(Json(deposit))
}

/// POST /api/v1/deposits/{id}/settle - Credit once custody confirms
pub async fn settle_deposit(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(deposit_id): Path<String>,
) -> Result<Json<Deposit>, ApiError> {
	let deposit = state
		.ledger_service
		.settle_deposit(&ctx.user_id, &deposit_id)
		.await?;
	info!("Deposit {} settled for user {}", deposit_id, ctx.user_id);
	Ok(Json(deposit))
}

/// GET /api/v1/deposits/{id}
pub async fn get_deposit(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(deposit_id): Path<String>,
) -> Result<Json<Deposit>, ApiError> {
	let deposit = state
		.ledger_service
		.get_deposit(&ctx.user_id, &deposit_id)
		.await?;
	Ok(Json(deposit))
}

/// POST /api/v1/withdrawals - Debit and pay out through custody
pub async fn post_withdrawal(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Json(request): Json<WithdrawalRequest>,
) -> Result<Json<Withdrawal>, ApiError> {
	let withdrawal = state
		.ledger_service
		.request_withdrawal(&ctx.user_id, &request)
		.await?;
	Ok(Json(withdrawal))
}

/// GET /api/v1/withdrawals/{id}
pub async fn get_withdrawal(
	State(state): State<AppState>,
	Identity(ctx): Identity,
	Path(withdrawal_id): Path<String>,
) -> Result<Json<Withdrawal>, ApiError> {
	let withdrawal = state
		.ledger_service
		.get_withdrawal(&ctx.user_id, &withdrawal_id)
		.await?;
	Ok(Json(withdrawal))
}
