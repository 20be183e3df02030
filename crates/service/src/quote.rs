//! Constant-product quote engine
//!
//! Pure pricing over a pool's effective reserves. The fee is always
//! denominated in the settlement asset: taken from the input when the
//! settlement asset flows in, from the gross output when it flows out. The
//! same function prices the advisory endpoint and the confirm-time re-quote,
//! always in exact decimal arithmetic.

use std::sync::Arc;

use rust_decimal::Decimal;

use arena_storage::Storage;
use arena_types::{
	rescale, Pool, PoolLiquidity, QuoteBreakdown, QuoteError, QuoteRequest, QuoteResponse,
	QuoteResult, SwapDirection,
};

const BPS_DENOMINATOR: u32 = 10_000;

/// Determine which leg `asset_in_id` is on
pub fn direction_for(pool: &Pool, asset_in_id: &str) -> QuoteResult<SwapDirection> {
	if asset_in_id == pool.asset_settlement_id {
		Ok(SwapDirection::SettlementIn)
	} else if asset_in_id == pool.asset_registered_id {
		Ok(SwapDirection::RegisteredIn)
	} else {
		Err(QuoteError::invalid(format!(
			"asset {} is not part of pool {}",
			asset_in_id, pool.pool_id
		)))
	}
}

/// Price one swap leg against the pool's current effective reserves.
///
/// No side effects; callers that mutate state must hold the pool lock and
/// re-invoke this against the reserves they are about to update.
pub fn quote(
	pool: &Pool,
	liquidity: &PoolLiquidity,
	asset_in_id: &str,
	amount_in: Decimal,
) -> QuoteResult<QuoteBreakdown> {
	if !pool.is_active {
		return Err(QuoteError::PoolInactive(pool.pool_id.clone()));
	}
	if amount_in <= Decimal::ZERO {
		return Err(QuoteError::invalid("amount_in must be positive"));
	}

	let direction = direction_for(pool, asset_in_id)?;
	let (reserve_in, reserve_out) = match direction {
		SwapDirection::SettlementIn => (
			liquidity.effective_settlement(),
			liquidity.effective_registered(),
		),
		SwapDirection::RegisteredIn => (
			liquidity.effective_registered(),
			liquidity.effective_settlement(),
		),
	};
	if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
		return Err(QuoteError::NoLiquidity);
	}

	let fee_rate = Decimal::from(pool.fee_bps) / Decimal::from(BPS_DENOMINATOR);

	let (amount_in_effective, amount_out, fee_total) = match direction {
		SwapDirection::SettlementIn => {
			let fee_total = rescale(amount_in * fee_rate);
			let effective = amount_in - fee_total;
			let amount_out = rescale(effective * reserve_out / (reserve_in + effective));
			(effective, amount_out, fee_total)
		},
		SwapDirection::RegisteredIn => {
			let gross_out = rescale(amount_in * reserve_out / (reserve_in + amount_in));
			let fee_total = rescale(gross_out * fee_rate);
			(amount_in, gross_out - fee_total, fee_total)
		},
	};

	// Platform share of the fee; the remainder stays in the pool as reserve
	// growth (including any unallocated residue of the split).
	let fee_platform = if pool.fee_bps == 0 {
		Decimal::ZERO
	} else {
		rescale(
			fee_total * Decimal::from(pool.platform_fee_bps) / Decimal::from(pool.fee_bps),
		)
	};
	let fee_lp = fee_total - fee_platform;

	Ok(QuoteBreakdown {
		direction,
		amount_in,
		amount_in_effective,
		amount_out,
		fee_total,
		fee_lp,
		fee_platform,
		fee_bps: pool.fee_bps,
		lp_fee_bps: pool.lp_fee_bps,
		platform_fee_bps: pool.platform_fee_bps,
	})
}

/// Read-only quoting against stored pools, for the advisory endpoint
pub struct QuoteService {
	storage: Arc<dyn Storage>,
}

impl QuoteService {
	pub fn new(storage: Arc<dyn Storage>) -> Self {
		Self { storage }
	}

	pub async fn quote(&self, request: &QuoteRequest) -> QuoteResult<QuoteResponse> {
		let pool = self
			.storage
			.get_pool(&request.pool_id)
			.await
			.map_err(|e| QuoteError::Storage(e.to_string()))?
			.ok_or_else(|| QuoteError::PoolNotFound(request.pool_id.clone()))?;
		let liquidity = self
			.storage
			.get_liquidity(&request.pool_id)
			.await
			.map_err(|e| QuoteError::Storage(e.to_string()))?
			.ok_or_else(|| QuoteError::PoolNotFound(request.pool_id.clone()))?;

		let breakdown = quote(&pool, &liquidity, &request.asset_in_id, request.amount_in)?;
		let asset_out_id = match breakdown.direction {
			SwapDirection::SettlementIn => pool.asset_registered_id.clone(),
			SwapDirection::RegisteredIn => pool.asset_settlement_id.clone(),
		};

		Ok(QuoteResponse {
			pool_id: pool.pool_id,
			asset_in_id: request.asset_in_id.clone(),
			asset_out_id,
			amount_in: breakdown.amount_in,
			amount_out: breakdown.amount_out,
			fee_bps: breakdown.fee_bps,
			fee_total: breakdown.fee_total,
			fee_platform: breakdown.fee_platform,
			fee_lp: breakdown.fee_lp,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use arena_types::CreatePoolRequest;
	use chrono::Utc;
	use rust_decimal_macros::dec;

	fn pool_with_fee(fee_bps: u32, lp_fee_bps: u32, platform_fee_bps: u32) -> Pool {
		Pool::new(&CreatePoolRequest {
			asset_settlement_id: "btc".to_string(),
			asset_registered_id: "tkn".to_string(),
			fee_bps,
			lp_fee_bps,
			platform_fee_bps,
			is_virtual: false,
			real_settlement: Decimal::ZERO,
			real_registered: Decimal::ZERO,
			virtual_settlement: Decimal::ZERO,
			virtual_registered: Decimal::ZERO,
		})
	}

	fn liquidity_for(pool: &Pool, settlement: Decimal, registered: Decimal) -> PoolLiquidity {
		PoolLiquidity {
			pool_id: pool.pool_id.clone(),
			real_settlement: settlement,
			real_registered: registered,
			virtual_settlement: Decimal::ZERO,
			virtual_registered: Decimal::ZERO,
			updated_at: Utc::now(),
		}
	}

	#[test]
	fn test_settlement_in_scenario() {
		// R_settlement=1.0, R_registered=100000, fee 1% split 50/50
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));

		let breakdown = quote(&pool, &liquidity, "btc", dec!(0.01)).unwrap();

		assert_eq!(breakdown.direction, SwapDirection::SettlementIn);
		assert_eq!(breakdown.fee_total, dec!(0.0001));
		assert_eq!(breakdown.amount_in_effective, dec!(0.0099));
		assert_eq!(breakdown.fee_platform, dec!(0.00005));
		assert_eq!(breakdown.fee_lp, dec!(0.00005));
		// 0.0099 * 100000 / 1.0099 ≈ 980.30
		assert_eq!(breakdown.amount_out.round_dp(2), dec!(980.30));
	}

	#[test]
	fn test_registered_in_takes_fee_from_output() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));

		let breakdown = quote(&pool, &liquidity, "tkn", dec!(1000)).unwrap();

		assert_eq!(breakdown.direction, SwapDirection::RegisteredIn);
		// gross = 1000 * 1 / 101000
		let gross = rescale(dec!(1000) / dec!(101000));
		assert_eq!(breakdown.fee_total, rescale(gross * dec!(0.01)));
		assert_eq!(breakdown.amount_out, gross - breakdown.fee_total);
		// effective input equals the full input on this leg
		assert_eq!(breakdown.amount_in_effective, dec!(1000));
	}

	#[test]
	fn test_output_strictly_increases_with_input() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));

		let mut previous = Decimal::ZERO;
		for amount in [dec!(0.001), dec!(0.01), dec!(0.1), dec!(1), dec!(10)] {
			let out = quote(&pool, &liquidity, "btc", amount).unwrap().amount_out;
			assert!(out > previous, "output {} not above {}", out, previous);
			previous = out;
		}
	}

	#[test]
	fn test_output_strictly_decreases_with_fee() {
		let liquidity_template = |pool: &Pool| liquidity_for(pool, dec!(1), dec!(100000));

		let mut previous: Option<Decimal> = None;
		for fee_bps in [0u32, 30, 100, 300, 1000] {
			let pool = pool_with_fee(fee_bps, fee_bps / 2, fee_bps / 2);
			let liquidity = liquidity_template(&pool);
			let out = quote(&pool, &liquidity, "btc", dec!(0.01)).unwrap().amount_out;
			if let Some(previous) = previous {
				assert!(out < previous, "fee {} bps did not reduce output", fee_bps);
			}
			previous = Some(out);
		}
	}

	#[test]
	fn test_round_trip_never_profits() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));

		let amount_in = dec!(0.01);
		let forward = quote(&pool, &liquidity, "btc", amount_in).unwrap();
		let back = quote(&pool, &liquidity, "tkn", forward.amount_out).unwrap();

		assert!(back.amount_out < amount_in);
	}

	#[test]
	fn test_virtual_reserves_enter_pricing() {
		let pool = pool_with_fee(0, 0, 0);
		let mut liquidity = liquidity_for(&pool, dec!(0), dec!(0));
		liquidity.virtual_settlement = dec!(1);
		liquidity.virtual_registered = dec!(100000);

		let breakdown = quote(&pool, &liquidity, "btc", dec!(0.01)).unwrap();
		assert!(breakdown.amount_out > Decimal::ZERO);
	}

	#[test]
	fn test_zero_amount_rejected() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));
		assert!(matches!(
			quote(&pool, &liquidity, "btc", Decimal::ZERO),
			Err(QuoteError::InvalidParameter { .. })
		));
	}

	#[test]
	fn test_unknown_asset_rejected() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));
		assert!(matches!(
			quote(&pool, &liquidity, "other", dec!(1)),
			Err(QuoteError::InvalidParameter { .. })
		));
	}

	#[test]
	fn test_empty_side_is_no_liquidity() {
		let pool = pool_with_fee(100, 50, 50);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(0));
		assert!(matches!(
			quote(&pool, &liquidity, "btc", dec!(1)),
			Err(QuoteError::NoLiquidity)
		));
	}

	#[test]
	fn test_inactive_pool_rejected() {
		let mut pool = pool_with_fee(100, 50, 50);
		pool.is_active = false;
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));
		assert!(matches!(
			quote(&pool, &liquidity, "btc", dec!(1)),
			Err(QuoteError::PoolInactive(_))
		));
	}

	#[test]
	fn test_zero_fee_charges_nothing() {
		let pool = pool_with_fee(0, 0, 0);
		let liquidity = liquidity_for(&pool, dec!(1), dec!(100000));
		let breakdown = quote(&pool, &liquidity, "btc", dec!(0.01)).unwrap();
		assert_eq!(breakdown.fee_total, Decimal::ZERO);
		assert_eq!(breakdown.fee_platform, Decimal::ZERO);
		assert_eq!(breakdown.amount_in_effective, dec!(0.01));
	}
}
