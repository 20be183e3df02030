//! Balances and the append-only ledger
//!
//! Every balance mutation is a matched set of `LedgerEntry` rows applied in
//! one atomic batch. Entries are never updated or deleted; corrections are
//! compensating entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod errors;

pub use errors::LedgerError;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Per-user, per-asset balance row.
///
/// `available` never exceeds `balance`; swap settlement moves both together
/// since the engine places no holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
	pub user_id: String,
	pub asset_id: String,
	pub balance: Decimal,
	pub available: Decimal,
	pub updated_at: DateTime<Utc>,
}

impl UserBalance {
	/// Zero-initialized row for first access
	pub fn zero(user_id: &str, asset_id: &str) -> Self {
		Self {
			user_id: user_id.to_string(),
			asset_id: asset_id.to_string(),
			balance: Decimal::ZERO,
			available: Decimal::ZERO,
			updated_at: Utc::now(),
		}
	}
}

/// What a ledger entry settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerRefType {
	Swap,
	Fee,
	Deposit,
	Withdraw,
}

/// One append-only audit row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
	pub entry_id: String,
	pub user_id: String,
	pub asset_id: String,
	/// Signed amount; positive credits, negative debits
	pub delta: Decimal,
	pub ref_type: LedgerRefType,
	/// Id of the swap/deposit/withdrawal this entry settles
	pub ref_id: String,
	pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
	pub fn new(change: &BalanceChange, ref_type: LedgerRefType, ref_id: &str) -> Self {
		Self {
			entry_id: Uuid::new_v4().to_string(),
			user_id: change.user_id.clone(),
			asset_id: change.asset_id.clone(),
			delta: change.delta,
			ref_type,
			ref_id: ref_id.to_string(),
			created_at: Utc::now(),
		}
	}
}

/// One balance mutation inside a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceChange {
	pub user_id: String,
	pub asset_id: String,
	pub delta: Decimal,
}

impl BalanceChange {
	pub fn credit(user_id: &str, asset_id: &str, amount: Decimal) -> Self {
		Self {
			user_id: user_id.to_string(),
			asset_id: asset_id.to_string(),
			delta: amount,
		}
	}

	pub fn debit(user_id: &str, asset_id: &str, amount: Decimal) -> Self {
		Self {
			user_id: user_id.to_string(),
			asset_id: asset_id.to_string(),
			delta: -amount,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[test]
	fn test_debit_negates() {
		let change = BalanceChange::debit("u", "a", dec!(5));
		assert_eq!(change.delta, dec!(-5));
	}

	#[test]
	fn test_zero_balance_row() {
		let row = UserBalance::zero("u", "a");
		assert_eq!(row.balance, Decimal::ZERO);
		assert_eq!(row.available, Decimal::ZERO);
	}
}
