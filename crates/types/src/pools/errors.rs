//! Error types for pool operations

use thiserror::Error;

use super::PoolValidationError;

/// General pool-related errors
#[derive(Debug, Error)]
pub enum PoolError {
	#[error("pool validation failed: {0}")]
	Validation(#[from] PoolValidationError),

	#[error("pool not found: {0}")]
	NotFound(String),

	#[error("pool already exists for asset pair ({settlement}, {registered})")]
	DuplicatePair {
		settlement: String,
		registered: String,
	},

	#[error("pool is not active: {0}")]
	Inactive(String),

	#[error("asset not found: {0}")]
	AssetNotFound(String),

	#[error("storage error: {0}")]
	Storage(String),
}
