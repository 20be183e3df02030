//! Amount scale handling
//!
//! All balances, reserves and ledger deltas are stored with 18 fractional
//! digits, matching the `Numeric(36, 18)` columns of the backing schema.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by every stored amount
pub const AMOUNT_SCALE: u32 = 18;

/// Bring a computed amount back to the storage scale.
///
/// Rounds toward zero so that a quote never promises more output than the
/// exact quotient allows.
pub fn rescale(value: Decimal) -> Decimal {
	value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[test]
	fn test_rescale_truncates_toward_zero() {
		let third = dec!(1) / dec!(3);
		let scaled = rescale(third);
		assert_eq!(scaled.scale(), AMOUNT_SCALE);
		assert!(scaled < third);
	}

	#[test]
	fn test_rescale_keeps_exact_values() {
		assert_eq!(rescale(dec!(0.0099)), dec!(0.0099));
		assert_eq!(rescale(dec!(100000)), dec!(100000));
	}
}
