//! Quote domain model
//!
//! A quote is a pure pricing of one swap leg against a pool's current
//! effective reserves. The same breakdown type is produced for the advisory
//! quote endpoint and for re-pricing at confirm time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::QuoteError;

/// Result type for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Which leg the input asset is on.
///
/// The fee is always denominated in the settlement asset: deducted from the
/// input when the settlement asset flows in, from the output when it flows
/// out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
	/// Settlement asset in, registered asset out; fee taken from the input
	SettlementIn,
	/// Registered asset in, settlement asset out; fee taken from the output
	RegisteredIn,
}

/// Full pricing of one swap leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
	pub direction: SwapDirection,
	pub amount_in: Decimal,
	/// Input credited to the curve after an input-side fee
	pub amount_in_effective: Decimal,
	pub amount_out: Decimal,
	/// Total fee, in the settlement asset
	pub fee_total: Decimal,
	pub fee_lp: Decimal,
	pub fee_platform: Decimal,
	pub fee_bps: u32,
	pub lp_fee_bps: u32,
	pub platform_fee_bps: u32,
}

/// Advisory quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
	pub pool_id: String,
	pub asset_in_id: String,
	pub amount_in: Decimal,
}

/// Advisory quote response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
	pub pool_id: String,
	pub asset_in_id: String,
	pub asset_out_id: String,
	pub amount_in: Decimal,
	pub amount_out: Decimal,
	pub fee_bps: u32,
	pub fee_total: Decimal,
	pub fee_platform: Decimal,
	pub fee_lp: Decimal,
}
