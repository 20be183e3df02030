//! Swap response payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Swap, SwapApprovalPayload, SwapStatus};

/// Returned by init: the id plus the exact object to sign externally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapInitResponse {
	pub swap_id: String,
	pub payload: SwapApprovalPayload,
}

/// Returned by a successful (or idempotently repeated) confirm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapConfirmResponse {
	pub swap_id: String,
	pub amount_out: Decimal,
}

/// Read model for swap lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapView {
	pub swap_id: String,
	pub pool_id: String,
	pub asset_in_id: String,
	pub asset_out_id: String,
	pub amount_in: Decimal,
	pub min_out: Decimal,
	pub amount_out: Option<Decimal>,
	pub fee_bps: u32,
	pub status: SwapStatus,
	pub deadline_ts: i64,
	pub created_at: DateTime<Utc>,
	pub executed_at: Option<DateTime<Utc>>,
}

impl From<&Swap> for SwapView {
	fn from(swap: &Swap) -> Self {
		Self {
			swap_id: swap.swap_id.clone(),
			pool_id: swap.pool_id.clone(),
			asset_in_id: swap.asset_in_id.clone(),
			asset_out_id: swap.asset_out_id.clone(),
			amount_in: swap.amount_in,
			min_out: swap.min_out,
			amount_out: swap.amount_out,
			fee_bps: swap.fee_bps,
			status: swap.status,
			deadline_ts: swap.deadline_ts,
			created_at: swap.created_at,
			executed_at: swap.executed_at,
		}
	}
}
