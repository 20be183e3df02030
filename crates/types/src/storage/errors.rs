//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("not found: {entity} {id}")]
	NotFound { entity: &'static str, id: String },

	#[error("duplicate {entity}: {id}")]
	Duplicate { entity: &'static str, id: String },

	#[error("insufficient balance for user {user_id} in asset {asset_id}")]
	InsufficientBalance { user_id: String, asset_id: String },

	#[error("backend error: {0}")]
	Backend(String),
}
