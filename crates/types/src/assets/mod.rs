//! Platform asset model
//!
//! An asset is either the settlement asset every pool is paired against or a
//! registered token tracked by the platform. Assets are immutable once a
//! pool references them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A tradeable asset known to the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
	pub asset_id: String,
	/// Unique uppercase ticker
	pub symbol: String,
	pub name: String,
	/// Decimal places the custody layer tracks for this asset
	pub precision: u32,
	/// Identifier of the asset at the external custody service, if issued
	pub custody_asset_id: Option<String>,
	/// User that registered the asset, if user-created
	pub created_by: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// Parameters for registering an asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
	pub symbol: String,
	pub name: String,
	pub precision: u32,
	pub custody_asset_id: Option<String>,
	pub created_by: Option<String>,
	/// When set (and no custody id is given), the registry issues this
	/// supply through the custody service and records the returned id
	#[serde(default)]
	pub issue_supply: Option<u64>,
}

impl Asset {
	pub fn new(new: NewAsset) -> Self {
		Self {
			asset_id: Uuid::new_v4().to_string(),
			symbol: new.symbol.to_uppercase(),
			name: new.name,
			precision: new.precision,
			custody_asset_id: new.custody_asset_id,
			created_by: new.created_by,
			created_at: Utc::now(),
		}
	}
}

/// Errors for asset registration and lookup
#[derive(Debug, Error)]
pub enum AssetError {
	#[error("asset not found: {0}")]
	NotFound(String),

	#[error("invalid symbol: {reason}")]
	InvalidSymbol { reason: String },

	#[error("custody error: {0}")]
	Custody(String),

	#[error("storage error: {0}")]
	Storage(String),
}
