//! Swap orchestration
//!
//! The state machine tying quoting, authorization and the ledger together.
//! `init` persists a pending intent and hands back the canonical payload to
//! sign; `confirm` verifies the signed artifact against the server-held
//! intent, re-prices against current reserves and commits reserves, balances
//! and audit rows as one unit, serialized per pool.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use arena_storage::Storage;
use arena_types::{
	swaps::errors::SwapValidationError, AuthContext, BalanceChange, InitSwapRequest, Pool,
	PoolError, PoolLiquidity, QuoteBreakdown, Swap, SwapConfirmResponse, SwapDirection, SwapError,
	SwapInitResponse, SwapResult, SwapStatus, SwapView,
};

use crate::approval::ApprovalService;
use crate::ledger::LedgerService;
use crate::quote;

/// Per-pool async mutexes serializing the reserve read-modify-write.
///
/// Swaps on different pools proceed in parallel; two confirms on the same
/// pool never interleave between re-quote and commit.
struct PoolLocks {
	locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PoolLocks {
	fn new() -> Self {
		Self {
			locks: DashMap::new(),
		}
	}

	async fn lock(&self, pool_id: &str) -> OwnedMutexGuard<()> {
		let lock = {
			let entry = self
				.locks
				.entry(pool_id.to_string())
				.or_insert_with(|| Arc::new(Mutex::new(())));
			Arc::clone(entry.value())
		};
		lock.lock_owned().await
	}
}

/// Orchestrator for the swap lifecycle
pub struct SwapService {
	storage: Arc<dyn Storage>,
	ledger: Arc<LedgerService>,
	approvals: Arc<ApprovalService>,
	pool_locks: PoolLocks,
	max_deadline_window_secs: i64,
}

impl SwapService {
	pub fn new(
		storage: Arc<dyn Storage>,
		ledger: Arc<LedgerService>,
		approvals: Arc<ApprovalService>,
		max_deadline_window_secs: i64,
	) -> Self {
		Self {
			storage,
			ledger,
			approvals,
			pool_locks: PoolLocks::new(),
			max_deadline_window_secs,
		}
	}

	/// Create a pending swap intent and return the payload to be signed.
	/// Mutates neither reserves nor balances.
	pub async fn init_swap(
		&self,
		ctx: &AuthContext,
		request: &InitSwapRequest,
	) -> SwapResult<SwapInitResponse> {
		request.validate()?;
		let now = Utc::now().timestamp();
		if request.deadline_ts > now + self.max_deadline_window_secs {
			return Err(SwapValidationError::DeadlineTooFar {
				deadline_ts: request.deadline_ts,
				max_window_secs: self.max_deadline_window_secs,
			}
			.into());
		}

		let pool = self
			.storage
			.get_pool(&request.pool_id)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?
			.ok_or_else(|| PoolError::NotFound(request.pool_id.clone()))?;
		if !pool.is_active {
			return Err(PoolError::Inactive(pool.pool_id).into());
		}
		let asset_out_id = pool
			.asset_out_for(&request.asset_in_id)
			.ok_or_else(|| SwapValidationError::AssetNotInPool {
				pool_id: pool.pool_id.clone(),
				asset_id: request.asset_in_id.clone(),
			})?
			.to_string();

		let swap = Swap {
			swap_id: uuid::Uuid::new_v4().to_string(),
			pool_id: pool.pool_id.clone(),
			user_id: ctx.user_id.clone(),
			asset_in_id: request.asset_in_id.clone(),
			asset_out_id,
			amount_in: request.amount_in,
			min_out: request.min_out,
			amount_out: None,
			fee_bps: pool.fee_bps,
			lp_fee_bps: pool.lp_fee_bps,
			platform_fee_bps: pool.platform_fee_bps,
			fee_amount_total: Decimal::ZERO,
			fee_amount_lp: Decimal::ZERO,
			fee_amount_platform: Decimal::ZERO,
			status: SwapStatus::PendingApproval,
			nonce: arena_types::swaps::new_nonce(),
			deadline_ts: request.deadline_ts,
			created_at: Utc::now(),
			executed_at: None,
		};

		self.storage
			.create_swap(swap.clone())
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?;

		info!(
			"Swap {} initialized for user {} on pool {} ({} of {})",
			swap.swap_id, ctx.user_id, swap.pool_id, swap.amount_in, swap.asset_in_id
		);

		Ok(SwapInitResponse {
			swap_id: swap.swap_id.clone(),
			payload: swap.approval_payload(),
		})
	}

	/// Confirm a pending swap with a signed artifact.
	///
	/// Confirming an already-terminal swap is a safe no-op that returns the
	/// stored outcome; no balances, reserves or audit rows change.
	pub async fn confirm_swap(
		&self,
		ctx: &AuthContext,
		swap_id: &str,
		artifact: &arena_types::ApprovalArtifact,
	) -> SwapResult<SwapConfirmResponse> {
		let swap = self.load_owned_swap(ctx, swap_id).await?;
		if swap.status.is_terminal() {
			return Self::terminal_outcome(&swap);
		}

		// Verify against the server-held intent; client parameters are never
		// trusted for anything but the artifact itself.
		use arena_types::CanonicalPayload;
		let expected_payload = swap.approval_payload().canonical_payload();
		let approval = self
			.approvals
			.verify(&swap, &expected_payload, artifact, ctx)
			.await?;

		let now = Utc::now();
		if swap.is_expired_at(now) {
			let mut expired = swap;
			expired.status = SwapStatus::Expired;
			self.storage
				.update_swap(expired)
				.await
				.map_err(|e| SwapError::Storage(e.to_string()))?;
			debug!("Swap {} expired at confirm", swap_id);
			return Err(SwapError::DeadlineExceeded);
		}

		// Critical section: reserve read-modify-write for this pool.
		let _guard = self.pool_locks.lock(&swap.pool_id).await;

		// Reload under the lock; a concurrent confirm, cancel or the expiry
		// sweep may have advanced the state while we waited.
		let mut swap = self.load_owned_swap(ctx, swap_id).await?;
		if swap.status.is_terminal() {
			return Self::terminal_outcome(&swap);
		}

		let pool = self
			.storage
			.get_pool(&swap.pool_id)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?
			.ok_or_else(|| PoolError::NotFound(swap.pool_id.clone()))?;
		let mut liquidity = self
			.storage
			.get_liquidity(&swap.pool_id)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?
			.ok_or_else(|| PoolError::NotFound(swap.pool_id.clone()))?;

		// Re-price against current reserves; other swaps may have moved them
		// since init.
		let breakdown = quote::quote(&pool, &liquidity, &swap.asset_in_id, swap.amount_in)?;

		if breakdown.amount_out < swap.min_out {
			swap.status = SwapStatus::Failed;
			self.storage
				.update_swap(swap.clone())
				.await
				.map_err(|e| SwapError::Storage(e.to_string()))?;
			info!(
				"Swap {} failed on slippage: quoted {} below min_out {}",
				swap_id, breakdown.amount_out, swap.min_out
			);
			return Err(SwapError::Slippage {
				quoted: breakdown.amount_out,
				min_out: swap.min_out,
			});
		}

		// Commit. The ledger batch is the only fallible step and runs first:
		// on InsufficientFunds nothing has mutated and the swap stays
		// pending, so the client can retry after funding.
		let (trader_changes, platform_fee) =
			Self::trade_balance_changes(&pool, &swap, &breakdown, self.ledger.platform_account_id());
		self.ledger
			.settle_swap(trader_changes, platform_fee, &swap.swap_id)
			.await?;

		Self::apply_reserve_update(&mut liquidity, &breakdown);
		liquidity.updated_at = now;
		self.storage
			.update_liquidity(liquidity)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?;

		self.storage
			.create_approval(approval)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?;

		swap.mark_executed(&breakdown, now);
		self.storage
			.update_swap(swap.clone())
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?;

		info!(
			"Swap {} executed: {} {} in, {} {} out (fee {} bps)",
			swap.swap_id,
			swap.amount_in,
			swap.asset_in_id,
			breakdown.amount_out,
			swap.asset_out_id,
			swap.fee_bps
		);

		Ok(SwapConfirmResponse {
			swap_id: swap.swap_id,
			amount_out: breakdown.amount_out,
		})
	}

	/// Force a pending swap to `Expired`. Terminal swaps are returned as-is.
	pub async fn cancel_swap(&self, ctx: &AuthContext, swap_id: &str) -> SwapResult<SwapView> {
		let mut swap = self.load_owned_swap(ctx, swap_id).await?;
		if swap.status == SwapStatus::PendingApproval {
			swap.status = SwapStatus::Expired;
			self.storage
				.update_swap(swap.clone())
				.await
				.map_err(|e| SwapError::Storage(e.to_string()))?;
			info!("Swap {} cancelled by user {}", swap_id, ctx.user_id);
		}
		Ok(SwapView::from(&swap))
	}

	pub async fn get_swap(&self, ctx: &AuthContext, swap_id: &str) -> SwapResult<SwapView> {
		let swap = self.load_owned_swap(ctx, swap_id).await?;
		Ok(SwapView::from(&swap))
	}

	pub async fn swaps_for_user(&self, ctx: &AuthContext) -> SwapResult<Vec<SwapView>> {
		let swaps = self
			.storage
			.get_swaps_by_user(&ctx.user_id)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?;
		Ok(swaps.iter().map(SwapView::from).collect())
	}

	async fn load_owned_swap(&self, ctx: &AuthContext, swap_id: &str) -> SwapResult<Swap> {
		let swap = self
			.storage
			.get_swap(swap_id)
			.await
			.map_err(|e| SwapError::Storage(e.to_string()))?
			.ok_or_else(|| SwapError::NotFound(swap_id.to_string()))?;
		if swap.user_id != ctx.user_id {
			return Err(SwapError::Forbidden(swap_id.to_string()));
		}
		Ok(swap)
	}

	/// Map a terminal swap back to the outcome its confirm produced
	fn terminal_outcome(swap: &Swap) -> SwapResult<SwapConfirmResponse> {
		match swap.status {
			SwapStatus::Executed => Ok(SwapConfirmResponse {
				swap_id: swap.swap_id.clone(),
				amount_out: swap.amount_out.unwrap_or(Decimal::ZERO),
			}),
			SwapStatus::Expired => Err(SwapError::DeadlineExceeded),
			SwapStatus::Failed => Err(SwapError::Slippage {
				quoted: swap.amount_out.unwrap_or(Decimal::ZERO),
				min_out: swap.min_out,
			}),
			SwapStatus::PendingApproval => Err(SwapError::Storage(
				"terminal outcome requested for pending swap".to_string(),
			)),
		}
	}

	/// Balance movements for one executed swap: trader debit/credit plus the
	/// platform's fee share in the settlement asset. The LP share is not
	/// transferred anywhere; it stays in the pool as reserve growth.
	fn trade_balance_changes(
		pool: &Pool,
		swap: &Swap,
		breakdown: &QuoteBreakdown,
		platform_account_id: &str,
	) -> (Vec<BalanceChange>, Option<BalanceChange>) {
		let trader = vec![
			BalanceChange::debit(&swap.user_id, &swap.asset_in_id, breakdown.amount_in),
			BalanceChange::credit(&swap.user_id, &swap.asset_out_id, breakdown.amount_out),
		];
		let platform_fee = if breakdown.fee_platform > Decimal::ZERO {
			Some(BalanceChange::credit(
				platform_account_id,
				&pool.asset_settlement_id,
				breakdown.fee_platform,
			))
		} else {
			None
		};
		(trader, platform_fee)
	}

	/// Reserve update rule. Only real reserves move; virtual reserves are a
	/// fixed subsidy and never mutate. Subtractions floor at zero.
	fn apply_reserve_update(liquidity: &mut PoolLiquidity, breakdown: &QuoteBreakdown) {
		match breakdown.direction {
			SwapDirection::SettlementIn => {
				liquidity.real_settlement +=
					breakdown.amount_in - breakdown.fee_platform;
				liquidity.real_registered =
					(liquidity.real_registered - breakdown.amount_out).max(Decimal::ZERO);
			},
			SwapDirection::RegisteredIn => {
				liquidity.real_registered += breakdown.amount_in;
				liquidity.real_settlement = (liquidity.real_settlement
					- (breakdown.amount_out + breakdown.fee_platform))
					.max(Decimal::ZERO);
			},
		}
	}
}
