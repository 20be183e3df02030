//! Liquidity pool models
//!
//! A pool pairs the settlement asset with one registered asset. Fee
//! parameters are fixed at creation; swaps never mutate them. Virtual
//! reserves are a one-time subsidy giving a fresh pool price depth; only
//! real reserves move when swaps execute.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod errors;

pub use errors::PoolError;

/// One trading pair backed by real and virtual reserves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
	pub pool_id: String,
	pub asset_settlement_id: String,
	pub asset_registered_id: String,
	/// Total swap fee in basis points
	pub fee_bps: u32,
	/// Share of the fee retained as reserve growth
	pub lp_fee_bps: u32,
	/// Share of the fee credited to the platform account
	pub platform_fee_bps: u32,
	pub is_virtual: bool,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
}

/// Reserve state for a pool. Effective reserve = real + virtual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolLiquidity {
	pub pool_id: String,
	pub real_settlement: Decimal,
	pub real_registered: Decimal,
	pub virtual_settlement: Decimal,
	pub virtual_registered: Decimal,
	pub updated_at: DateTime<Utc>,
}

impl PoolLiquidity {
	/// Effective settlement-side reserve
	pub fn effective_settlement(&self) -> Decimal {
		self.real_settlement + self.virtual_settlement
	}

	/// Effective registered-side reserve
	pub fn effective_registered(&self) -> Decimal {
		self.real_registered + self.virtual_registered
	}
}

/// Parameters for creating a pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolRequest {
	pub asset_settlement_id: String,
	pub asset_registered_id: String,
	pub fee_bps: u32,
	pub lp_fee_bps: u32,
	pub platform_fee_bps: u32,
	pub is_virtual: bool,
	#[serde(default)]
	pub real_settlement: Decimal,
	#[serde(default)]
	pub real_registered: Decimal,
	#[serde(default)]
	pub virtual_settlement: Decimal,
	#[serde(default)]
	pub virtual_registered: Decimal,
}

impl Pool {
	pub fn new(request: &CreatePoolRequest) -> Self {
		Self {
			pool_id: Uuid::new_v4().to_string(),
			asset_settlement_id: request.asset_settlement_id.clone(),
			asset_registered_id: request.asset_registered_id.clone(),
			fee_bps: request.fee_bps,
			lp_fee_bps: request.lp_fee_bps,
			platform_fee_bps: request.platform_fee_bps,
			is_virtual: request.is_virtual,
			is_active: true,
			created_at: Utc::now(),
		}
	}

	/// The opposite leg of `asset_in_id`, if it belongs to the pool
	pub fn asset_out_for(&self, asset_in_id: &str) -> Option<&str> {
		if asset_in_id == self.asset_settlement_id {
			Some(&self.asset_registered_id)
		} else if asset_in_id == self.asset_registered_id {
			Some(&self.asset_settlement_id)
		} else {
			None
		}
	}
}

/// Validation errors raised before a pool is persisted
#[derive(Debug, Error)]
pub enum PoolValidationError {
	#[error("fee split exceeds total: lp {lp_fee_bps} + platform {platform_fee_bps} > {fee_bps}")]
	FeeSplitExceedsTotal {
		fee_bps: u32,
		lp_fee_bps: u32,
		platform_fee_bps: u32,
	},

	#[error("fee_bps {0} exceeds 10000")]
	FeeAboveFullAmount(u32),

	#[error("settlement and registered assets must differ")]
	IdenticalAssets,

	#[error("initial reserve must not be negative")]
	NegativeReserve,
}

impl CreatePoolRequest {
	/// Validate fee split and initial reserves
	pub fn validate(&self) -> Result<(), PoolValidationError> {
		if self.fee_bps > 10_000 {
			return Err(PoolValidationError::FeeAboveFullAmount(self.fee_bps));
		}
		if self.lp_fee_bps + self.platform_fee_bps > self.fee_bps {
			return Err(PoolValidationError::FeeSplitExceedsTotal {
				fee_bps: self.fee_bps,
				lp_fee_bps: self.lp_fee_bps,
				platform_fee_bps: self.platform_fee_bps,
			});
		}
		if self.asset_settlement_id == self.asset_registered_id {
			return Err(PoolValidationError::IdenticalAssets);
		}
		if self.real_settlement.is_sign_negative()
			|| self.real_registered.is_sign_negative()
			|| self.virtual_settlement.is_sign_negative()
			|| self.virtual_registered.is_sign_negative()
		{
			return Err(PoolValidationError::NegativeReserve);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn request() -> CreatePoolRequest {
		CreatePoolRequest {
			asset_settlement_id: "btc".to_string(),
			asset_registered_id: "tkn".to_string(),
			fee_bps: 100,
			lp_fee_bps: 50,
			platform_fee_bps: 50,
			is_virtual: true,
			real_settlement: dec!(1),
			real_registered: dec!(100000),
			virtual_settlement: dec!(0),
			virtual_registered: dec!(0),
		}
	}

	#[test]
	fn test_valid_request_passes() {
		assert!(request().validate().is_ok());
	}

	#[test]
	fn test_fee_split_must_fit_total() {
		let mut req = request();
		req.lp_fee_bps = 80;
		assert!(matches!(
			req.validate(),
			Err(PoolValidationError::FeeSplitExceedsTotal { .. })
		));
	}

	#[test]
	fn test_assets_must_differ() {
		let mut req = request();
		req.asset_registered_id = "btc".to_string();
		assert!(matches!(
			req.validate(),
			Err(PoolValidationError::IdenticalAssets)
		));
	}

	#[test]
	fn test_effective_reserves_blend_virtual() {
		let liquidity = PoolLiquidity {
			pool_id: "p".to_string(),
			real_settlement: dec!(1),
			real_registered: dec!(2),
			virtual_settlement: dec!(3),
			virtual_registered: dec!(4),
			updated_at: Utc::now(),
		};
		assert_eq!(liquidity.effective_settlement(), dec!(4));
		assert_eq!(liquidity.effective_registered(), dec!(6));
	}

	#[test]
	fn test_asset_out_for() {
		let pool = Pool::new(&request());
		assert_eq!(pool.asset_out_for("btc"), Some("tkn"));
		assert_eq!(pool.asset_out_for("tkn"), Some("btc"));
		assert_eq!(pool.asset_out_for("other"), None);
	}
}
