//! Error types for swap operations

use rust_decimal::Decimal;
use thiserror::Error;

use crate::approvals::ApprovalError;
use crate::ledger::LedgerError;
use crate::pools::PoolError;
use crate::quotes::QuoteError;

/// Validation errors for swap init parameters
#[derive(Debug, Error)]
pub enum SwapValidationError {
	#[error("amount_in must be positive")]
	NonPositiveAmountIn,

	#[error("min_out must not be negative")]
	NegativeMinOut,

	#[error("deadline {deadline_ts} is not in the future")]
	DeadlineInPast { deadline_ts: i64 },

	#[error("deadline {deadline_ts} is beyond the allowed window of {max_window_secs}s")]
	DeadlineTooFar {
		deadline_ts: i64,
		max_window_secs: i64,
	},

	#[error("asset {asset_id} is not part of pool {pool_id}")]
	AssetNotInPool { pool_id: String, asset_id: String },
}

/// Errors for the swap lifecycle
#[derive(Debug, Error)]
pub enum SwapError {
	#[error("swap validation failed: {0}")]
	Validation(#[from] SwapValidationError),

	#[error("swap not found: {0}")]
	NotFound(String),

	#[error("swap {0} does not belong to the caller")]
	Forbidden(String),

	#[error("swap deadline exceeded")]
	DeadlineExceeded,

	#[error("quoted output {quoted} is below the required minimum {min_out}")]
	Slippage { quoted: Decimal, min_out: Decimal },

	#[error(transparent)]
	Pool(#[from] PoolError),

	#[error(transparent)]
	Quote(#[from] QuoteError),

	#[error(transparent)]
	Approval(#[from] ApprovalError),

	#[error(transparent)]
	Ledger(#[from] LedgerError),

	#[error("storage error: {0}")]
	Storage(String),
}
