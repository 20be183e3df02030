//! Deposits and withdrawals
//!
//! One-sided balance movements gated by the external custody service: a
//! deposit credits once its settlement is confirmed, a withdrawal debits up
//! front and pays out through custody. Both are idempotent against repeated
//! settlement calls.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type for funding operations
pub type FundingResult<T> = Result<T, FundingError>;

/// Settlement state of a deposit or withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingStatus {
	Pending,
	Settled,
	Failed,
}

/// An inbound transfer awaiting (or past) custody settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
	pub deposit_id: String,
	pub user_id: String,
	pub asset_id: String,
	pub amount: Decimal,
	/// Custody-side reference (invoice or transfer id)
	pub external_ref: String,
	pub status: FundingStatus,
	pub created_at: DateTime<Utc>,
	pub settled_at: Option<DateTime<Utc>>,
}

impl Deposit {
	/// `external_ref` is the custody invoice backing this deposit, either
	/// supplied by the caller or created by the engine
	pub fn new(user_id: &str, request: &DepositRequest, external_ref: String) -> Self {
		Self {
			deposit_id: Uuid::new_v4().to_string(),
			user_id: user_id.to_string(),
			asset_id: request.asset_id.clone(),
			amount: request.amount,
			external_ref,
			status: FundingStatus::Pending,
			created_at: Utc::now(),
			settled_at: None,
		}
	}
}

/// An outbound transfer executed through custody
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
	pub withdrawal_id: String,
	pub user_id: String,
	pub asset_id: String,
	pub amount: Decimal,
	/// Custody-side payout reference (invoice to pay)
	pub external_ref: String,
	pub status: FundingStatus,
	pub created_at: DateTime<Utc>,
	pub settled_at: Option<DateTime<Utc>>,
}

impl Withdrawal {
	pub fn new(user_id: &str, request: &WithdrawalRequest) -> Self {
		Self {
			withdrawal_id: Uuid::new_v4().to_string(),
			user_id: user_id.to_string(),
			asset_id: request.asset_id.clone(),
			amount: request.amount,
			external_ref: request.external_ref.clone(),
			status: FundingStatus::Pending,
			created_at: Utc::now(),
			settled_at: None,
		}
	}
}

/// Body of a deposit request. Without an `external_ref` the engine asks
/// custody for a fresh invoice and returns it on the deposit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
	pub asset_id: String,
	pub amount: Decimal,
	#[serde(default)]
	pub external_ref: Option<String>,
}

/// Body of a withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
	pub asset_id: String,
	pub amount: Decimal,
	pub external_ref: String,
}

/// Errors for deposit/withdrawal flows
#[derive(Debug, Error)]
pub enum FundingError {
	#[error("invalid parameter: {reason}")]
	InvalidParameter { reason: String },

	#[error("deposit not found: {0}")]
	DepositNotFound(String),

	#[error("withdrawal not found: {0}")]
	WithdrawalNotFound(String),

	#[error("record {0} does not belong to the caller")]
	Forbidden(String),

	#[error("custody has not settled transfer {external_ref}")]
	NotSettled { external_ref: String },

	#[error("insufficient funds for asset {asset_id}")]
	InsufficientFunds { asset_id: String },

	#[error("custody error: {0}")]
	Custody(String),

	#[error("storage error: {0}")]
	Storage(String),
}
