//! Error types for quote operations

use thiserror::Error;

/// Errors raised while pricing a swap leg
#[derive(Debug, Error)]
pub enum QuoteError {
	#[error("invalid parameter: {reason}")]
	InvalidParameter { reason: String },

	#[error("pool not found: {0}")]
	PoolNotFound(String),

	#[error("pool is not active: {0}")]
	PoolInactive(String),

	#[error("pool has no liquidity on one side")]
	NoLiquidity,

	#[error("storage error: {0}")]
	Storage(String),
}

impl QuoteError {
	pub fn invalid(reason: impl Into<String>) -> Self {
		Self::InvalidParameter {
			reason: reason.into(),
		}
	}
}
