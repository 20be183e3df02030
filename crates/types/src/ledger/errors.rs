//! Error types for ledger operations

use thiserror::Error;

/// Errors raised while applying balance mutations
#[derive(Debug, Error)]
pub enum LedgerError {
	#[error("insufficient funds for user {user_id} in asset {asset_id}")]
	InsufficientFunds { user_id: String, asset_id: String },

	#[error("empty entry batch")]
	EmptyBatch,

	#[error("storage error: {0}")]
	Storage(String),
}
