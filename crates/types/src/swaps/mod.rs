//! Swap domain model and lifecycle
//!
//! A swap is created by `init` in `PendingApproval`, then moves exactly once
//! to a terminal state: `Executed` by a verified confirm, `Expired` when the
//! deadline elapses (or by an explicit cancel), `Failed` when re-pricing
//! violates the caller's minimum output.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::CanonicalPayload;
use crate::quotes::QuoteBreakdown;

pub mod errors;
pub mod request;
pub mod response;

pub use errors::SwapError;
pub use request::{ConfirmSwapRequest, InitSwapRequest};
pub use response::{SwapConfirmResponse, SwapInitResponse, SwapView};

/// Result type for swap operations
pub type SwapResult<T> = Result<T, SwapError>;

/// Swap lifecycle states. `PendingApproval` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
	PendingApproval,
	Executed,
	Expired,
	Failed,
}

impl SwapStatus {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, SwapStatus::PendingApproval)
	}
}

/// A swap intent held server-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
	pub swap_id: String,
	pub pool_id: String,
	pub user_id: String,
	pub asset_in_id: String,
	pub asset_out_id: String,
	pub amount_in: Decimal,
	pub min_out: Decimal,
	/// Settled output; None until the swap executes
	pub amount_out: Option<Decimal>,
	/// Fee parameters snapshotted at init time
	pub fee_bps: u32,
	pub lp_fee_bps: u32,
	pub platform_fee_bps: u32,
	/// Fee amounts settled at execution
	pub fee_amount_total: Decimal,
	pub fee_amount_lp: Decimal,
	pub fee_amount_platform: Decimal,
	pub status: SwapStatus,
	/// Single-use token binding this intent to one authorization artifact
	pub nonce: String,
	/// Unix seconds after which the intent is no longer confirmable
	pub deadline_ts: i64,
	pub created_at: DateTime<Utc>,
	pub executed_at: Option<DateTime<Utc>>,
}

impl Swap {
	/// The canonical object a client must sign to authorize this swap
	pub fn approval_payload(&self) -> SwapApprovalPayload {
		SwapApprovalPayload {
			payload_type: "swap_approval".to_string(),
			swap_id: self.swap_id.clone(),
			pool_id: self.pool_id.clone(),
			asset_in_id: self.asset_in_id.clone(),
			asset_out_id: self.asset_out_id.clone(),
			amount_in: self.amount_in.normalize().to_string(),
			min_out: self.min_out.normalize().to_string(),
			nonce: self.nonce.clone(),
			deadline_ts: self.deadline_ts,
		}
	}

	/// Whether `deadline_ts` has passed at `now`
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now.timestamp() > self.deadline_ts
	}

	/// Record the executed outcome on this row
	pub fn mark_executed(&mut self, breakdown: &QuoteBreakdown, executed_at: DateTime<Utc>) {
		self.amount_out = Some(breakdown.amount_out);
		self.fee_amount_total = breakdown.fee_total;
		self.fee_amount_lp = breakdown.fee_lp;
		self.fee_amount_platform = breakdown.fee_platform;
		self.status = SwapStatus::Executed;
		self.executed_at = Some(executed_at);
	}
}

/// Canonical payload for external signing.
///
/// Field order is part of the wire contract: the serialized JSON of this
/// struct, byte for byte, is what gets hashed and signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapApprovalPayload {
	#[serde(rename = "type")]
	pub payload_type: String,
	pub swap_id: String,
	pub pool_id: String,
	pub asset_in_id: String,
	pub asset_out_id: String,
	pub amount_in: String,
	pub min_out: String,
	pub nonce: String,
	pub deadline_ts: i64,
}

impl CanonicalPayload for SwapApprovalPayload {
	fn canonical_payload(&self) -> String {
		serde_json::to_string(self).expect("payload serialization is infallible")
	}
}

/// Generate a fresh swap nonce (32 hex chars)
pub fn new_nonce() -> String {
	Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn sample_swap() -> Swap {
		Swap {
			swap_id: "swap-1".to_string(),
			pool_id: "pool-1".to_string(),
			user_id: "user-1".to_string(),
			asset_in_id: "btc".to_string(),
			asset_out_id: "tkn".to_string(),
			amount_in: dec!(0.0100),
			min_out: dec!(900),
			amount_out: None,
			fee_bps: 100,
			lp_fee_bps: 50,
			platform_fee_bps: 50,
			fee_amount_total: Decimal::ZERO,
			fee_amount_lp: Decimal::ZERO,
			fee_amount_platform: Decimal::ZERO,
			status: SwapStatus::PendingApproval,
			nonce: "a".repeat(32),
			deadline_ts: 1_900_000_000,
			created_at: Utc::now(),
			executed_at: None,
		}
	}

	#[test]
	fn test_payload_is_deterministic() {
		let swap = sample_swap();
		let first = swap.approval_payload().canonical_payload();
		let second = swap.approval_payload().canonical_payload();
		assert_eq!(first, second);
	}

	#[test]
	fn test_payload_normalizes_amounts() {
		let swap = sample_swap();
		let payload = swap.approval_payload();
		// 0.0100 serializes without trailing zeros
		assert_eq!(payload.amount_in, "0.01");
		assert_eq!(payload.min_out, "900");
	}

	#[test]
	fn test_payload_field_order() {
		let payload = sample_swap().approval_payload().canonical_payload();
		let type_idx = payload.find("\"type\"").unwrap();
		let swap_idx = payload.find("\"swap_id\"").unwrap();
		let nonce_idx = payload.find("\"nonce\"").unwrap();
		let deadline_idx = payload.find("\"deadline_ts\"").unwrap();
		assert!(type_idx < swap_idx && swap_idx < nonce_idx && nonce_idx < deadline_idx);
	}

	#[test]
	fn test_terminal_states() {
		assert!(!SwapStatus::PendingApproval.is_terminal());
		assert!(SwapStatus::Executed.is_terminal());
		assert!(SwapStatus::Expired.is_terminal());
		assert!(SwapStatus::Failed.is_terminal());
	}

	#[test]
	fn test_nonce_shape() {
		let nonce = new_nonce();
		assert_eq!(nonce.len(), 32);
		assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
	}
}
