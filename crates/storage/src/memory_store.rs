//! In-memory storage implementation using DashMap
//!
//! Backs the exchange with concurrent maps. Ledger batches are applied under
//! a commit mutex so concurrent batches never interleave half-applied; the
//! optional background sweep expires pending swaps whose deadline elapsed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use arena_types::{
	Approval, Asset, Deposit, FundingStatus, LedgerEntry, LedgerRefType, Pool, PoolLiquidity,
	Swap, SwapStatus, UserBalance, Withdrawal,
};

use crate::traits::{
	AssetStorage, FundingStorage, LedgerStorage, PoolStorage, Storage, StorageError,
	StorageResult, StorageStats, SwapStorage,
};

/// Seconds between passes of the swap expiry sweep
const EXPIRY_SWEEP_INTERVAL_SECS: u64 = 30;

/// In-memory store for assets, pools, swaps, balances and funding rows
#[derive(Clone)]
pub struct MemoryStore {
	assets: Arc<DashMap<String, Asset>>,
	pools: Arc<DashMap<String, Pool>>,
	liquidity: Arc<DashMap<String, PoolLiquidity>>,
	swaps: Arc<DashMap<String, Swap>>,
	/// Keyed by swap_id: at most one approval per swap
	approvals: Arc<DashMap<String, Approval>>,
	/// Keyed by `user_id::asset_id`
	balances: Arc<DashMap<String, UserBalance>>,
	ledger: Arc<DashMap<String, LedgerEntry>>,
	deposits: Arc<DashMap<String, Deposit>>,
	withdrawals: Arc<DashMap<String, Withdrawal>>,
	/// Consumed nonces, for the uniqueness constraint
	nonces: Arc<DashMap<String, String>>,
	/// Serializes ledger batch application
	ledger_commit: Arc<Mutex<()>>,
	expiry_sweep_enabled: bool,
}

fn balance_key(user_id: &str, asset_id: &str) -> String {
	format!("{}::{}", user_id, asset_id)
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			assets: Arc::new(DashMap::new()),
			pools: Arc::new(DashMap::new()),
			liquidity: Arc::new(DashMap::new()),
			swaps: Arc::new(DashMap::new()),
			approvals: Arc::new(DashMap::new()),
			balances: Arc::new(DashMap::new()),
			ledger: Arc::new(DashMap::new()),
			deposits: Arc::new(DashMap::new()),
			withdrawals: Arc::new(DashMap::new()),
			nonces: Arc::new(DashMap::new()),
			ledger_commit: Arc::new(Mutex::new(())),
			expiry_sweep_enabled: true,
		}
	}

	/// Create a store with the background expiry sweep disabled
	pub fn with_expiry_sweep(enabled: bool) -> Self {
		Self {
			expiry_sweep_enabled: enabled,
			..Self::new()
		}
	}

	/// Start the background task that expires pending swaps past deadline
	pub fn start_expiry_sweep(&self) -> tokio::task::JoinHandle<()> {
		if !self.expiry_sweep_enabled {
			return tokio::spawn(async {});
		}

		let swaps = Arc::clone(&self.swaps);
		tokio::spawn(async move {
			let mut sweep_interval = interval(Duration::from_secs(EXPIRY_SWEEP_INTERVAL_SECS));

			loop {
				sweep_interval.tick().await;

				let now = Utc::now();
				let mut expired = 0usize;
				let stale: Vec<String> = swaps
					.iter()
					.filter(|entry| {
						entry.value().status == SwapStatus::PendingApproval
							&& entry.value().is_expired_at(now)
					})
					.map(|entry| entry.key().clone())
					.collect();

				for swap_id in stale {
					if let Some(mut entry) = swaps.get_mut(&swap_id) {
						// Re-check under the entry lock; a confirm may have
						// won the race in the meantime.
						if entry.status == SwapStatus::PendingApproval
							&& entry.is_expired_at(now)
						{
							entry.status = SwapStatus::Expired;
							expired += 1;
						}
					}
				}

				if expired > 0 {
					debug!("Expired {} pending swaps past deadline", expired);
				}
			}
		})
	}

	/// Run one expiry pass synchronously (used by tests and shutdown paths)
	pub fn expire_pending_swaps(&self, now: DateTime<Utc>) -> usize {
		let mut expired = 0usize;
		for mut entry in self.swaps.iter_mut() {
			if entry.status == SwapStatus::PendingApproval && entry.is_expired_at(now) {
				entry.status = SwapStatus::Expired;
				expired += 1;
			}
		}
		if expired > 0 {
			info!("Expired {} pending swaps", expired);
		}
		expired
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl AssetStorage for MemoryStore {
	async fn create_asset(&self, asset: Asset) -> StorageResult<()> {
		let by_symbol = self
			.assets
			.iter()
			.any(|entry| entry.value().symbol == asset.symbol);
		if by_symbol {
			return Err(StorageError::Duplicate {
				entity: "asset",
				id: asset.symbol,
			});
		}
		self.assets.insert(asset.asset_id.clone(), asset);
		Ok(())
	}

	async fn get_asset(&self, asset_id: &str) -> StorageResult<Option<Asset>> {
		Ok(self.assets.get(asset_id).map(|a| a.clone()))
	}

	async fn get_asset_by_symbol(&self, symbol: &str) -> StorageResult<Option<Asset>> {
		let symbol = symbol.to_uppercase();
		Ok(self
			.assets
			.iter()
			.find(|entry| entry.value().symbol == symbol)
			.map(|entry| entry.value().clone()))
	}

	async fn list_assets(&self) -> StorageResult<Vec<Asset>> {
		Ok(self.assets.iter().map(|entry| entry.value().clone()).collect())
	}
}

#[async_trait]
impl PoolStorage for MemoryStore {
	async fn create_pool(&self, pool: Pool, liquidity: PoolLiquidity) -> StorageResult<()> {
		let duplicate = self.pools.iter().any(|entry| {
			entry.value().asset_settlement_id == pool.asset_settlement_id
				&& entry.value().asset_registered_id == pool.asset_registered_id
		});
		if duplicate {
			return Err(StorageError::Duplicate {
				entity: "pool",
				id: format!("{}/{}", pool.asset_settlement_id, pool.asset_registered_id),
			});
		}
		self.liquidity.insert(pool.pool_id.clone(), liquidity);
		self.pools.insert(pool.pool_id.clone(), pool);
		Ok(())
	}

	async fn get_pool(&self, pool_id: &str) -> StorageResult<Option<Pool>> {
		Ok(self.pools.get(pool_id).map(|p| p.clone()))
	}

	async fn get_pool_by_pair(
		&self,
		asset_settlement_id: &str,
		asset_registered_id: &str,
	) -> StorageResult<Option<Pool>> {
		Ok(self
			.pools
			.iter()
			.find(|entry| {
				entry.value().asset_settlement_id == asset_settlement_id
					&& entry.value().asset_registered_id == asset_registered_id
			})
			.map(|entry| entry.value().clone()))
	}

	async fn list_pools(&self) -> StorageResult<Vec<Pool>> {
		Ok(self.pools.iter().map(|entry| entry.value().clone()).collect())
	}

	async fn get_liquidity(&self, pool_id: &str) -> StorageResult<Option<PoolLiquidity>> {
		Ok(self.liquidity.get(pool_id).map(|l| l.clone()))
	}

	async fn update_liquidity(&self, liquidity: PoolLiquidity) -> StorageResult<()> {
		self.liquidity.insert(liquidity.pool_id.clone(), liquidity);
		Ok(())
	}
}

#[async_trait]
impl SwapStorage for MemoryStore {
	async fn create_swap(&self, swap: Swap) -> StorageResult<()> {
		match self.nonces.entry(swap.nonce.clone()) {
			Entry::Occupied(_) => {
				return Err(StorageError::Duplicate {
					entity: "nonce",
					id: swap.nonce,
				})
			},
			Entry::Vacant(slot) => {
				slot.insert(swap.swap_id.clone());
			},
		}
		self.swaps.insert(swap.swap_id.clone(), swap);
		Ok(())
	}

	async fn get_swap(&self, swap_id: &str) -> StorageResult<Option<Swap>> {
		Ok(self.swaps.get(swap_id).map(|s| s.clone()))
	}

	async fn update_swap(&self, swap: Swap) -> StorageResult<()> {
		self.swaps.insert(swap.swap_id.clone(), swap);
		Ok(())
	}

	async fn get_swaps_by_user(&self, user_id: &str) -> StorageResult<Vec<Swap>> {
		Ok(self
			.swaps
			.iter()
			.filter(|entry| entry.value().user_id == user_id)
			.map(|entry| entry.value().clone())
			.collect())
	}

	async fn create_approval(&self, approval: Approval) -> StorageResult<()> {
		match self.approvals.entry(approval.swap_id.clone()) {
			Entry::Occupied(_) => Err(StorageError::Duplicate {
				entity: "approval",
				id: approval.swap_id,
			}),
			Entry::Vacant(slot) => {
				slot.insert(approval);
				Ok(())
			},
		}
	}

	async fn get_approval_by_swap(&self, swap_id: &str) -> StorageResult<Option<Approval>> {
		Ok(self.approvals.get(swap_id).map(|a| a.clone()))
	}
}

#[async_trait]
impl LedgerStorage for MemoryStore {
	async fn get_balance(
		&self,
		user_id: &str,
		asset_id: &str,
	) -> StorageResult<Option<UserBalance>> {
		Ok(self
			.balances
			.get(&balance_key(user_id, asset_id))
			.map(|b| b.clone()))
	}

	async fn upsert_balance(&self, balance: UserBalance) -> StorageResult<()> {
		let key = balance_key(&balance.user_id, &balance.asset_id);
		self.balances.insert(key, balance);
		Ok(())
	}

	async fn list_balances_by_user(&self, user_id: &str) -> StorageResult<Vec<UserBalance>> {
		Ok(self
			.balances
			.iter()
			.filter(|entry| entry.value().user_id == user_id)
			.map(|entry| entry.value().clone())
			.collect())
	}

	async fn apply_ledger_entries(&self, entries: Vec<LedgerEntry>) -> StorageResult<()> {
		if entries.is_empty() {
			return Ok(());
		}

		let _guard = self
			.ledger_commit
			.lock()
			.map_err(|_| StorageError::Backend("ledger commit lock poisoned".to_string()))?;

		// Project the batch onto current balances before touching anything.
		let mut projected: HashMap<String, UserBalance> = HashMap::new();
		for entry in &entries {
			let key = balance_key(&entry.user_id, &entry.asset_id);
			let row = projected.entry(key.clone()).or_insert_with(|| {
				self.balances
					.get(&key)
					.map(|b| b.clone())
					.unwrap_or_else(|| UserBalance::zero(&entry.user_id, &entry.asset_id))
			});
			row.balance += entry.delta;
			row.available += entry.delta;
		}

		for row in projected.values() {
			if row.balance < Decimal::ZERO || row.available < Decimal::ZERO {
				return Err(StorageError::InsufficientBalance {
					user_id: row.user_id.clone(),
					asset_id: row.asset_id.clone(),
				});
			}
		}

		// All debits covered: apply balances and append entries.
		let now = Utc::now();
		for (key, mut row) in projected {
			row.updated_at = now;
			self.balances.insert(key, row);
		}
		for entry in entries {
			self.ledger.insert(entry.entry_id.clone(), entry);
		}

		Ok(())
	}

	async fn list_entries_by_ref(
		&self,
		ref_type: LedgerRefType,
		ref_id: &str,
	) -> StorageResult<Vec<LedgerEntry>> {
		let mut entries: Vec<LedgerEntry> = self
			.ledger
			.iter()
			.filter(|entry| {
				entry.value().ref_type == ref_type && entry.value().ref_id == ref_id
			})
			.map(|entry| entry.value().clone())
			.collect();
		entries.sort_by_key(|e| e.created_at);
		Ok(entries)
	}

	async fn list_entries_by_user(&self, user_id: &str) -> StorageResult<Vec<LedgerEntry>> {
		let mut entries: Vec<LedgerEntry> = self
			.ledger
			.iter()
			.filter(|entry| entry.value().user_id == user_id)
			.map(|entry| entry.value().clone())
			.collect();
		entries.sort_by_key(|e| e.created_at);
		Ok(entries)
	}
}

#[async_trait]
impl FundingStorage for MemoryStore {
	async fn create_deposit(&self, deposit: Deposit) -> StorageResult<()> {
		self.deposits.insert(deposit.deposit_id.clone(), deposit);
		Ok(())
	}

	async fn get_deposit(&self, deposit_id: &str) -> StorageResult<Option<Deposit>> {
		Ok(self.deposits.get(deposit_id).map(|d| d.clone()))
	}

	async fn settle_deposit_once(
		&self,
		deposit_id: &str,
		settled_at: DateTime<Utc>,
	) -> StorageResult<Option<Deposit>> {
		match self.deposits.get_mut(deposit_id) {
			Some(mut entry) => {
				if entry.status != FundingStatus::Pending {
					return Ok(None);
				}
				entry.status = FundingStatus::Settled;
				entry.settled_at = Some(settled_at);
				Ok(Some(entry.clone()))
			},
			None => Err(StorageError::NotFound {
				entity: "deposit",
				id: deposit_id.to_string(),
			}),
		}
	}

	async fn create_withdrawal(&self, withdrawal: Withdrawal) -> StorageResult<()> {
		self.withdrawals
			.insert(withdrawal.withdrawal_id.clone(), withdrawal);
		Ok(())
	}

	async fn get_withdrawal(&self, withdrawal_id: &str) -> StorageResult<Option<Withdrawal>> {
		Ok(self.withdrawals.get(withdrawal_id).map(|w| w.clone()))
	}

	async fn update_withdrawal(&self, withdrawal: Withdrawal) -> StorageResult<()> {
		self.withdrawals
			.insert(withdrawal.withdrawal_id.clone(), withdrawal);
		Ok(())
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn health_check(&self) -> StorageResult<bool> {
		// For in-memory storage, just check that the maps are accessible
		Ok(true)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		let pending_swaps = self
			.swaps
			.iter()
			.filter(|entry| entry.value().status == SwapStatus::PendingApproval)
			.count();

		Ok(StorageStats {
			total_assets: self.assets.len(),
			total_pools: self.pools.len(),
			total_swaps: self.swaps.len(),
			pending_swaps,
			total_ledger_entries: self.ledger.len(),
		})
	}

	async fn start_background_tasks(&self) -> StorageResult<()> {
		if self.expiry_sweep_enabled {
			let _ = self.start_expiry_sweep();
		} else {
			warn!("Swap expiry sweep is disabled; pending swaps will only expire on access");
		}
		Ok(())
	}
}
