//! Asset and pool registry
//!
//! Resolves or creates asset records and creates pools. Pool fee parameters
//! and virtual reserves are fixed here, once; nothing downstream mutates
//! them.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use arena_custody::CustodyClient;
use arena_storage::{Storage, StorageError};
use arena_types::{
	Asset, AssetError, CreatePoolRequest, NewAsset, Pool, PoolError, PoolLiquidity,
};

const MAX_SYMBOL_LEN: usize = 20;

/// Registry for assets and pools
pub struct RegistryService {
	storage: Arc<dyn Storage>,
	custody: Arc<dyn CustodyClient>,
}

impl RegistryService {
	pub fn new(storage: Arc<dyn Storage>, custody: Arc<dyn CustodyClient>) -> Self {
		Self { storage, custody }
	}

	/// Resolve an asset by symbol, creating it on first sight. A requested
	/// issuance supply makes custody mint the asset and the returned custody
	/// id is recorded on the row.
	pub async fn get_or_create_asset(&self, new: NewAsset) -> Result<Asset, AssetError> {
		let symbol = new.symbol.trim().to_uppercase();
		if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN {
			return Err(AssetError::InvalidSymbol {
				reason: format!("symbol must be 1-{} characters", MAX_SYMBOL_LEN),
			});
		}
		if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
			return Err(AssetError::InvalidSymbol {
				reason: "symbol must be alphanumeric".to_string(),
			});
		}

		if let Some(existing) = self
			.storage
			.get_asset_by_symbol(&symbol)
			.await
			.map_err(|e| AssetError::Storage(e.to_string()))?
		{
			return Ok(existing);
		}

		let custody_asset_id = match (&new.custody_asset_id, new.issue_supply) {
			(None, Some(supply)) => Some(
				self.custody
					.issue_asset(&symbol, &new.name, supply, new.precision)
					.await
					.map_err(|e| AssetError::Custody(e.to_string()))?,
			),
			_ => new.custody_asset_id.clone(),
		};

		let asset = Asset::new(NewAsset {
			symbol: symbol.clone(),
			custody_asset_id,
			..new
		});
		match self.storage.create_asset(asset.clone()).await {
			Ok(()) => {
				info!("Registered asset {} ({})", asset.symbol, asset.asset_id);
				Ok(asset)
			},
			// Lost a create race; the winner's row is the asset
			Err(StorageError::Duplicate { .. }) => self
				.storage
				.get_asset_by_symbol(&symbol)
				.await
				.map_err(|e| AssetError::Storage(e.to_string()))?
				.ok_or_else(|| AssetError::NotFound(symbol)),
			Err(e) => Err(AssetError::Storage(e.to_string())),
		}
	}

	pub async fn get_asset(&self, asset_id: &str) -> Result<Asset, AssetError> {
		self.storage
			.get_asset(asset_id)
			.await
			.map_err(|e| AssetError::Storage(e.to_string()))?
			.ok_or_else(|| AssetError::NotFound(asset_id.to_string()))
	}

	pub async fn get_asset_by_symbol(&self, symbol: &str) -> Result<Asset, AssetError> {
		self.storage
			.get_asset_by_symbol(symbol)
			.await
			.map_err(|e| AssetError::Storage(e.to_string()))?
			.ok_or_else(|| AssetError::NotFound(symbol.to_string()))
	}

	pub async fn list_assets(&self) -> Result<Vec<Asset>, AssetError> {
		self.storage
			.list_assets()
			.await
			.map_err(|e| AssetError::Storage(e.to_string()))
	}

	/// Create a pool for a (settlement, registered) pair. One pool per pair;
	/// fee split and virtual reserves are set here and never change.
	pub async fn create_pool(
		&self,
		request: &CreatePoolRequest,
	) -> Result<(Pool, PoolLiquidity), PoolError> {
		request.validate()?;

		for asset_id in [&request.asset_settlement_id, &request.asset_registered_id] {
			let exists = self
				.storage
				.get_asset(asset_id)
				.await
				.map_err(|e| PoolError::Storage(e.to_string()))?
				.is_some();
			if !exists {
				return Err(PoolError::AssetNotFound(asset_id.clone()));
			}
		}

		if self
			.storage
			.get_pool_by_pair(&request.asset_settlement_id, &request.asset_registered_id)
			.await
			.map_err(|e| PoolError::Storage(e.to_string()))?
			.is_some()
		{
			return Err(PoolError::DuplicatePair {
				settlement: request.asset_settlement_id.clone(),
				registered: request.asset_registered_id.clone(),
			});
		}

		let pool = Pool::new(request);
		let liquidity = PoolLiquidity {
			pool_id: pool.pool_id.clone(),
			real_settlement: request.real_settlement,
			real_registered: request.real_registered,
			virtual_settlement: request.virtual_settlement,
			virtual_registered: request.virtual_registered,
			updated_at: Utc::now(),
		};

		match self.storage.create_pool(pool.clone(), liquidity.clone()).await {
			Ok(()) => {
				info!(
					"Created pool {} ({} / {}) fee {} bps (lp {}, platform {})",
					pool.pool_id,
					pool.asset_settlement_id,
					pool.asset_registered_id,
					pool.fee_bps,
					pool.lp_fee_bps,
					pool.platform_fee_bps
				);
				Ok((pool, liquidity))
			},
			Err(StorageError::Duplicate { .. }) => Err(PoolError::DuplicatePair {
				settlement: request.asset_settlement_id.clone(),
				registered: request.asset_registered_id.clone(),
			}),
			Err(e) => Err(PoolError::Storage(e.to_string())),
		}
	}

	pub async fn get_pool(&self, pool_id: &str) -> Result<(Pool, PoolLiquidity), PoolError> {
		let pool = self
			.storage
			.get_pool(pool_id)
			.await
			.map_err(|e| PoolError::Storage(e.to_string()))?
			.ok_or_else(|| PoolError::NotFound(pool_id.to_string()))?;
		let liquidity = self
			.storage
			.get_liquidity(pool_id)
			.await
			.map_err(|e| PoolError::Storage(e.to_string()))?
			.ok_or_else(|| PoolError::NotFound(pool_id.to_string()))?;
		Ok((pool, liquidity))
	}

	pub async fn list_pools(&self) -> Result<Vec<Pool>, PoolError> {
		self.storage
			.list_pools()
			.await
			.map_err(|e| PoolError::Storage(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use arena_custody::{
		CustodyError, CustodyResult, Invoice, InvoiceRequest, NodeInfo, PayoutRequest,
	};
	use arena_storage::MemoryStore;
	use async_trait::async_trait;
	use rust_decimal_macros::dec;

	struct IssuingCustody;

	#[async_trait]
	impl CustodyClient for IssuingCustody {
		async fn node_info(&self) -> CustodyResult<NodeInfo> {
			Ok(NodeInfo {
				pubkey: String::new(),
				num_channels: 0,
			})
		}
		async fn issue_asset(
			&self,
			ticker: &str,
			_name: &str,
			_amount: u64,
			_precision: u32,
		) -> CustodyResult<String> {
			Ok(format!("rgb:{}", ticker.to_lowercase()))
		}
		async fn create_invoice(&self, _request: InvoiceRequest) -> CustodyResult<Invoice> {
			Ok(Invoice {
				invoice: String::new(),
				expiration_ts: None,
			})
		}
		async fn deposit_settled(&self, _external_ref: &str) -> CustodyResult<bool> {
			Ok(false)
		}
		async fn execute_payout(&self, _request: PayoutRequest) -> CustodyResult<String> {
			Err(CustodyError::Api {
				status: 400,
				message: "unsupported in tests".to_string(),
			})
		}
	}

	fn service() -> RegistryService {
		RegistryService::new(
			Arc::new(MemoryStore::with_expiry_sweep(false)),
			Arc::new(IssuingCustody),
		)
	}

	fn new_asset(symbol: &str) -> NewAsset {
		NewAsset {
			symbol: symbol.to_string(),
			name: symbol.to_string(),
			precision: 8,
			custody_asset_id: None,
			created_by: None,
			issue_supply: None,
		}
	}

	async fn seeded_pool_request(registry: &RegistryService) -> CreatePoolRequest {
		let settlement = registry.get_or_create_asset(new_asset("BTC")).await.unwrap();
		let registered = registry.get_or_create_asset(new_asset("TKN")).await.unwrap();
		CreatePoolRequest {
			asset_settlement_id: settlement.asset_id,
			asset_registered_id: registered.asset_id,
			fee_bps: 100,
			lp_fee_bps: 50,
			platform_fee_bps: 50,
			is_virtual: true,
			real_settlement: dec!(0),
			real_registered: dec!(0),
			virtual_settlement: dec!(1),
			virtual_registered: dec!(100000),
		}
	}

	#[tokio::test]
	async fn test_get_or_create_is_idempotent() {
		let registry = service();
		let first = registry.get_or_create_asset(new_asset("btc")).await.unwrap();
		let second = registry.get_or_create_asset(new_asset("BTC")).await.unwrap();
		assert_eq!(first.asset_id, second.asset_id);
		assert_eq!(registry.list_assets().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_issue_supply_mints_through_custody() {
		let registry = service();
		let mut request = new_asset("ARENA");
		request.issue_supply = Some(1_000_000);
		let asset = registry.get_or_create_asset(request).await.unwrap();
		assert_eq!(asset.custody_asset_id.as_deref(), Some("rgb:arena"));
	}

	#[tokio::test]
	async fn test_bad_symbol_rejected() {
		let registry = service();
		let result = registry.get_or_create_asset(new_asset("not a symbol")).await;
		assert!(matches!(result, Err(AssetError::InvalidSymbol { .. })));
	}

	#[tokio::test]
	async fn test_create_pool_seeds_liquidity() {
		let registry = service();
		let request = seeded_pool_request(&registry).await;
		let (pool, liquidity) = registry.create_pool(&request).await.unwrap();
		assert!(pool.is_active);
		assert_eq!(liquidity.virtual_settlement, dec!(1));
		assert_eq!(liquidity.real_settlement, dec!(0));
	}

	#[tokio::test]
	async fn test_duplicate_pair_conflicts() {
		let registry = service();
		let request = seeded_pool_request(&registry).await;
		registry.create_pool(&request).await.unwrap();
		let result = registry.create_pool(&request).await;
		assert!(matches!(result, Err(PoolError::DuplicatePair { .. })));
	}

	#[tokio::test]
	async fn test_pool_requires_known_assets() {
		let registry = service();
		let mut request = seeded_pool_request(&registry).await;
		request.asset_registered_id = "missing".to_string();
		let result = registry.create_pool(&request).await;
		assert!(matches!(result, Err(PoolError::AssetNotFound(_))));
	}

	#[tokio::test]
	async fn test_invalid_fee_split_rejected() {
		let registry = service();
		let mut request = seeded_pool_request(&registry).await;
		request.lp_fee_bps = 90;
		request.platform_fee_bps = 90;
		let result = registry.create_pool(&request).await;
		assert!(matches!(result, Err(PoolError::Validation(_))));
	}
}
