//! Storage traits for pluggable persistence backends
//!
//! Split per entity the way the domain is split; `StorageTrait` is the
//! composite the services depend on. Methods that mutate several rows
//! (ledger batches, deposit settlement claims) must apply atomically in any
//! conforming backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::approvals::Approval;
use crate::assets::Asset;
use crate::funding::{Deposit, Withdrawal};
use crate::ledger::{LedgerEntry, LedgerRefType, UserBalance};
use crate::pools::{Pool, PoolLiquidity};
use crate::swaps::Swap;

use super::errors::StorageResult;

/// Asset persistence
#[async_trait]
pub trait AssetStorageTrait: Send + Sync {
	async fn create_asset(&self, asset: Asset) -> StorageResult<()>;
	async fn get_asset(&self, asset_id: &str) -> StorageResult<Option<Asset>>;
	async fn get_asset_by_symbol(&self, symbol: &str) -> StorageResult<Option<Asset>>;
	async fn list_assets(&self) -> StorageResult<Vec<Asset>>;
}

/// Pool and reserve persistence
#[async_trait]
pub trait PoolStorageTrait: Send + Sync {
	/// Persist a pool together with its initial liquidity row
	async fn create_pool(&self, pool: Pool, liquidity: PoolLiquidity) -> StorageResult<()>;
	async fn get_pool(&self, pool_id: &str) -> StorageResult<Option<Pool>>;
	async fn get_pool_by_pair(
		&self,
		asset_settlement_id: &str,
		asset_registered_id: &str,
	) -> StorageResult<Option<Pool>>;
	async fn list_pools(&self) -> StorageResult<Vec<Pool>>;
	async fn get_liquidity(&self, pool_id: &str) -> StorageResult<Option<PoolLiquidity>>;
	/// Replace the reserve row; callers serialize per pool
	async fn update_liquidity(&self, liquidity: PoolLiquidity) -> StorageResult<()>;
}

/// Swap and approval persistence
#[async_trait]
pub trait SwapStorageTrait: Send + Sync {
	/// Persist a new swap; fails with `Duplicate` if the nonce is taken
	async fn create_swap(&self, swap: Swap) -> StorageResult<()>;
	async fn get_swap(&self, swap_id: &str) -> StorageResult<Option<Swap>>;
	async fn update_swap(&self, swap: Swap) -> StorageResult<()>;
	async fn get_swaps_by_user(&self, user_id: &str) -> StorageResult<Vec<Swap>>;
	/// Persist an approval; fails with `Duplicate` if the swap already has one
	async fn create_approval(&self, approval: Approval) -> StorageResult<()>;
	async fn get_approval_by_swap(&self, swap_id: &str) -> StorageResult<Option<Approval>>;
}

/// Balance and ledger persistence
#[async_trait]
pub trait LedgerStorageTrait: Send + Sync {
	async fn get_balance(&self, user_id: &str, asset_id: &str)
		-> StorageResult<Option<UserBalance>>;
	async fn upsert_balance(&self, balance: UserBalance) -> StorageResult<()>;
	async fn list_balances_by_user(&self, user_id: &str) -> StorageResult<Vec<UserBalance>>;
	/// Apply a batch of entries atomically: every balance adjusts and every
	/// entry appends, or nothing does. Fails with `InsufficientBalance` if
	/// any debit would drive a balance negative.
	async fn apply_ledger_entries(&self, entries: Vec<LedgerEntry>) -> StorageResult<()>;
	async fn list_entries_by_ref(
		&self,
		ref_type: LedgerRefType,
		ref_id: &str,
	) -> StorageResult<Vec<LedgerEntry>>;
	async fn list_entries_by_user(&self, user_id: &str) -> StorageResult<Vec<LedgerEntry>>;
}

/// Deposit and withdrawal persistence
#[async_trait]
pub trait FundingStorageTrait: Send + Sync {
	async fn create_deposit(&self, deposit: Deposit) -> StorageResult<()>;
	async fn get_deposit(&self, deposit_id: &str) -> StorageResult<Option<Deposit>>;
	/// Atomically claim a Pending deposit for settlement. Returns the
	/// updated row if this call made the transition, `None` if the deposit
	/// was already settled or failed.
	async fn settle_deposit_once(
		&self,
		deposit_id: &str,
		settled_at: DateTime<Utc>,
	) -> StorageResult<Option<Deposit>>;
	async fn create_withdrawal(&self, withdrawal: Withdrawal) -> StorageResult<()>;
	async fn get_withdrawal(&self, withdrawal_id: &str) -> StorageResult<Option<Withdrawal>>;
	async fn update_withdrawal(&self, withdrawal: Withdrawal) -> StorageResult<()>;
}

/// Aggregate statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
	pub total_assets: usize,
	pub total_pools: usize,
	pub total_swaps: usize,
	pub pending_swaps: usize,
	pub total_ledger_entries: usize,
}

/// Composite storage trait the services depend on
#[async_trait]
pub trait StorageTrait:
	AssetStorageTrait + PoolStorageTrait + SwapStorageTrait + LedgerStorageTrait + FundingStorageTrait
{
	async fn health_check(&self) -> StorageResult<bool>;
	async fn stats(&self) -> StorageResult<StorageStats>;
	/// Spawn backend-owned maintenance (e.g. the swap expiry sweep)
	async fn start_background_tasks(&self) -> StorageResult<()>;
}
