//! Ledger service
//!
//! Owns the balance store and the append-only audit trail. Every mutation is
//! a matched batch of entries applied atomically by the storage backend.
//! Deposits and withdrawals run through here too, gated by the custody
//! collaborator.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use arena_custody::{CustodyClient, InvoiceRequest, PayoutRequest};
use arena_storage::{Storage, StorageError};
use arena_types::{
	BalanceChange, Deposit, DepositRequest, FundingError, FundingResult, FundingStatus,
	LedgerEntry, LedgerError, LedgerRefType, LedgerResult, UserBalance, Withdrawal,
	WithdrawalRequest,
};

/// Balance ledger and funding flows
pub struct LedgerService {
	storage: Arc<dyn Storage>,
	custody: Arc<dyn CustodyClient>,
	/// Account credited with the platform fee share; explicit configuration,
	/// never resolved from ambient state
	platform_account_id: String,
}

fn map_ledger_storage(error: StorageError) -> LedgerError {
	match error {
		StorageError::InsufficientBalance { user_id, asset_id } => {
			LedgerError::InsufficientFunds { user_id, asset_id }
		},
		other => LedgerError::Storage(other.to_string()),
	}
}

/// Millisatoshi per whole settlement unit
const MSAT_PER_SETTLEMENT_UNIT: i64 = 100_000_000_000;

fn decimal_to_msat(amount: Decimal) -> FundingResult<u64> {
	(amount * Decimal::from(MSAT_PER_SETTLEMENT_UNIT))
		.trunc()
		.to_u64()
		.ok_or_else(|| FundingError::InvalidParameter {
			reason: "amount out of range for invoicing".to_string(),
		})
}

fn decimal_to_base_units(amount: Decimal) -> FundingResult<u64> {
	amount
		.trunc()
		.to_u64()
		.ok_or_else(|| FundingError::InvalidParameter {
			reason: "amount out of range for invoicing".to_string(),
		})
}

impl LedgerService {
	pub fn new(
		storage: Arc<dyn Storage>,
		custody: Arc<dyn CustodyClient>,
		platform_account_id: String,
	) -> Self {
		Self {
			storage,
			custody,
			platform_account_id,
		}
	}

	pub fn platform_account_id(&self) -> &str {
		&self.platform_account_id
	}

	/// Balance row for (user, asset), zero-initialized on first access
	pub async fn get_or_create_balance(
		&self,
		user_id: &str,
		asset_id: &str,
	) -> LedgerResult<UserBalance> {
		if let Some(balance) = self
			.storage
			.get_balance(user_id, asset_id)
			.await
			.map_err(map_ledger_storage)?
		{
			return Ok(balance);
		}
		let zero = UserBalance::zero(user_id, asset_id);
		self.storage
			.upsert_balance(zero.clone())
			.await
			.map_err(map_ledger_storage)?;
		Ok(zero)
	}

	pub async fn balances_for_user(&self, user_id: &str) -> LedgerResult<Vec<UserBalance>> {
		self.storage
			.list_balances_by_user(user_id)
			.await
			.map_err(map_ledger_storage)
	}

	pub async fn entries_for_user(&self, user_id: &str) -> LedgerResult<Vec<LedgerEntry>> {
		self.storage
			.list_entries_by_user(user_id)
			.await
			.map_err(map_ledger_storage)
	}

	/// Apply a uniform batch: one entry per change, all under one ref
	pub async fn apply_entries(
		&self,
		changes: &[BalanceChange],
		ref_type: LedgerRefType,
		ref_id: &str,
	) -> LedgerResult<()> {
		if changes.is_empty() {
			return Err(LedgerError::EmptyBatch);
		}
		let entries = changes
			.iter()
			.map(|change| LedgerEntry::new(change, ref_type, ref_id))
			.collect();
		self.storage
			.apply_ledger_entries(entries)
			.await
			.map_err(map_ledger_storage)
	}

	/// Apply the balance movements of one executed swap atomically: trader
	/// debit and credit under a `Swap` ref, the platform fee share under a
	/// `Fee` ref, all referencing the swap id.
	pub async fn settle_swap(
		&self,
		trader_changes: Vec<BalanceChange>,
		platform_fee: Option<BalanceChange>,
		swap_id: &str,
	) -> LedgerResult<()> {
		let mut entries: Vec<LedgerEntry> = trader_changes
			.iter()
			.map(|change| LedgerEntry::new(change, LedgerRefType::Swap, swap_id))
			.collect();
		if let Some(fee) = platform_fee {
			if fee.delta != Decimal::ZERO {
				entries.push(LedgerEntry::new(&fee, LedgerRefType::Fee, swap_id));
			}
		}
		if entries.is_empty() {
			return Err(LedgerError::EmptyBatch);
		}
		self.storage
			.apply_ledger_entries(entries)
			.await
			.map_err(map_ledger_storage)
	}

	/// Record an inbound transfer awaiting custody settlement. When the
	/// caller brings no invoice, custody creates one and its reference is
	/// returned on the deposit row for the user to pay.
	pub async fn request_deposit(
		&self,
		user_id: &str,
		request: &DepositRequest,
	) -> FundingResult<Deposit> {
		if request.amount <= Decimal::ZERO {
			return Err(FundingError::InvalidParameter {
				reason: "amount must be positive".to_string(),
			});
		}
		let external_ref = match request.external_ref.as_deref() {
			Some(external_ref) if !external_ref.is_empty() => external_ref.to_string(),
			_ => self.create_deposit_invoice(user_id, request).await?,
		};
		let deposit = Deposit::new(user_id, request, external_ref);
		self.storage
			.create_deposit(deposit.clone())
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?;
		info!(
			"Deposit {} recorded for user {} ({} of asset {})",
			deposit.deposit_id, user_id, deposit.amount, deposit.asset_id
		);
		Ok(deposit)
	}

	async fn create_deposit_invoice(
		&self,
		user_id: &str,
		request: &DepositRequest,
	) -> FundingResult<String> {
		let custody_asset_id = self
			.storage
			.get_asset(&request.asset_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?
			.and_then(|asset| asset.custody_asset_id);
		let invoice_request = match custody_asset_id {
			Some(asset_id) => InvoiceRequest::Asset {
				asset_id,
				amount: decimal_to_base_units(request.amount)?,
			},
			None => InvoiceRequest::Lightning {
				amount_msat: decimal_to_msat(request.amount)?,
				memo: Some(format!("deposit for {}", user_id)),
			},
		};
		let invoice = self
			.custody
			.create_invoice(invoice_request)
			.await
			.map_err(|e| FundingError::Custody(e.to_string()))?;
		Ok(invoice.invoice)
	}

	/// Credit a deposit once custody confirms settlement. Safe to retry: a
	/// second call returns the stored row without crediting again.
	pub async fn settle_deposit(
		&self,
		user_id: &str,
		deposit_id: &str,
	) -> FundingResult<Deposit> {
		let deposit = self
			.storage
			.get_deposit(deposit_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?
			.ok_or_else(|| FundingError::DepositNotFound(deposit_id.to_string()))?;
		if deposit.user_id != user_id {
			return Err(FundingError::Forbidden(deposit_id.to_string()));
		}
		if deposit.status == FundingStatus::Settled {
			return Ok(deposit);
		}

		let settled = self
			.custody
			.deposit_settled(&deposit.external_ref)
			.await
			.map_err(|e| FundingError::Custody(e.to_string()))?;
		if !settled {
			return Err(FundingError::NotSettled {
				external_ref: deposit.external_ref,
			});
		}

		// Atomically claim the Pending -> Settled transition; only the
		// claiming caller credits the balance.
		let claimed = self
			.storage
			.settle_deposit_once(deposit_id, Utc::now())
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?;
		let Some(settled_row) = claimed else {
			// Another settle won the race; return the stored outcome.
			return self
				.storage
				.get_deposit(deposit_id)
				.await
				.map_err(|e| FundingError::Storage(e.to_string()))?
				.ok_or_else(|| FundingError::DepositNotFound(deposit_id.to_string()));
		};

		let credit = BalanceChange::credit(user_id, &settled_row.asset_id, settled_row.amount);
		self.apply_entries(&[credit], LedgerRefType::Deposit, deposit_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?;

		info!(
			"Deposit {} settled: credited {} of asset {} to user {}",
			deposit_id, settled_row.amount, settled_row.asset_id, user_id
		);
		Ok(settled_row)
	}

	/// Debit and pay out a withdrawal through custody. The available-balance
	/// check happens inside the atomic debit, so a concurrent withdrawal
	/// cannot double-spend the same funds.
	pub async fn request_withdrawal(
		&self,
		user_id: &str,
		request: &WithdrawalRequest,
	) -> FundingResult<Withdrawal> {
		if request.amount <= Decimal::ZERO {
			return Err(FundingError::InvalidParameter {
				reason: "amount must be positive".to_string(),
			});
		}

		let mut withdrawal = Withdrawal::new(user_id, request);

		let debit = BalanceChange::debit(user_id, &request.asset_id, request.amount);
		match self
			.apply_entries(&[debit], LedgerRefType::Withdraw, &withdrawal.withdrawal_id)
			.await
		{
			Ok(()) => {},
			Err(LedgerError::InsufficientFunds { asset_id, .. }) => {
				return Err(FundingError::InsufficientFunds { asset_id });
			},
			Err(e) => return Err(FundingError::Storage(e.to_string())),
		}

		self.storage
			.create_withdrawal(withdrawal.clone())
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?;

		// Assets issued through custody pay out over the asset rail; the
		// settlement asset goes over Lightning.
		let is_asset = self
			.storage
			.get_asset(&request.asset_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?
			.map(|asset| asset.custody_asset_id.is_some())
			.unwrap_or(false);
		let payout = PayoutRequest {
			invoice: request.external_ref.clone(),
			is_asset,
		};
		match self.custody.execute_payout(payout).await {
			Ok(payment_ref) => {
				withdrawal.status = FundingStatus::Settled;
				withdrawal.settled_at = Some(Utc::now());
				self.storage
					.update_withdrawal(withdrawal.clone())
					.await
					.map_err(|e| FundingError::Storage(e.to_string()))?;
				info!(
					"Withdrawal {} paid out via custody ({})",
					withdrawal.withdrawal_id, payment_ref
				);
				Ok(withdrawal)
			},
			Err(custody_error) => {
				// Payout failed: mark the row and refund with a compensating
				// entry; the ledger stays append-only.
				warn!(
					"Withdrawal {} payout failed: {}",
					withdrawal.withdrawal_id, custody_error
				);
				withdrawal.status = FundingStatus::Failed;
				self.storage
					.update_withdrawal(withdrawal.clone())
					.await
					.map_err(|e| FundingError::Storage(e.to_string()))?;
				let refund =
					BalanceChange::credit(user_id, &request.asset_id, request.amount);
				self.apply_entries(
					&[refund],
					LedgerRefType::Withdraw,
					&withdrawal.withdrawal_id,
				)
				.await
				.map_err(|e| FundingError::Storage(e.to_string()))?;
				Err(FundingError::Custody(custody_error.to_string()))
			},
		}
	}

	pub async fn get_deposit(&self, user_id: &str, deposit_id: &str) -> FundingResult<Deposit> {
		let deposit = self
			.storage
			.get_deposit(deposit_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?
			.ok_or_else(|| FundingError::DepositNotFound(deposit_id.to_string()))?;
		if deposit.user_id != user_id {
			return Err(FundingError::Forbidden(deposit_id.to_string()));
		}
		Ok(deposit)
	}

	pub async fn get_withdrawal(
		&self,
		user_id: &str,
		withdrawal_id: &str,
	) -> FundingResult<Withdrawal> {
		let withdrawal = self
			.storage
			.get_withdrawal(withdrawal_id)
			.await
			.map_err(|e| FundingError::Storage(e.to_string()))?
			.ok_or_else(|| FundingError::WithdrawalNotFound(withdrawal_id.to_string()))?;
		if withdrawal.user_id != user_id {
			return Err(FundingError::Forbidden(withdrawal_id.to_string()));
		}
		Ok(withdrawal)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use arena_custody::{CustodyError, CustodyResult, Invoice, InvoiceRequest, NodeInfo};
	use arena_storage::MemoryStore;
	use async_trait::async_trait;
	use rust_decimal_macros::dec;
	use std::collections::HashSet;
	use std::sync::Mutex;

	/// Custody stub with a configurable set of settled references
	struct StubCustody {
		settled_refs: Mutex<HashSet<String>>,
		fail_payouts: bool,
	}

	impl StubCustody {
		fn new() -> Self {
			Self {
				settled_refs: Mutex::new(HashSet::new()),
				fail_payouts: false,
			}
		}

		fn with_settled(refs: &[&str]) -> Self {
			Self {
				settled_refs: Mutex::new(refs.iter().map(|r| r.to_string()).collect()),
				fail_payouts: false,
			}
		}

		fn failing_payouts() -> Self {
			Self {
				fail_payouts: true,
				..Self::new()
			}
		}
	}

	#[async_trait]
	impl CustodyClient for StubCustody {
		async fn node_info(&self) -> CustodyResult<NodeInfo> {
			Ok(NodeInfo {
				pubkey: "stub".to_string(),
				num_channels: 0,
			})
		}

		async fn issue_asset(
			&self,
			_ticker: &str,
			_name: &str,
			_amount: u64,
			_precision: u32,
		) -> CustodyResult<String> {
			Ok("stub-asset".to_string())
		}

		async fn create_invoice(&self, _request: InvoiceRequest) -> CustodyResult<Invoice> {
			Ok(Invoice {
				invoice: "stub-invoice".to_string(),
				expiration_ts: None,
			})
		}

		async fn deposit_settled(&self, external_ref: &str) -> CustodyResult<bool> {
			Ok(self.settled_refs.lock().unwrap().contains(external_ref))
		}

		async fn execute_payout(&self, _request: PayoutRequest) -> CustodyResult<String> {
			if self.fail_payouts {
				return Err(CustodyError::Api {
					status: 400,
					message: "no route".to_string(),
				});
			}
			Ok("payment-hash".to_string())
		}
	}

	fn service_with(custody: StubCustody) -> LedgerService {
		LedgerService::new(
			Arc::new(MemoryStore::with_expiry_sweep(false)),
			Arc::new(custody),
			"platform".to_string(),
		)
	}

	#[tokio::test]
	async fn test_first_access_is_zero_initialized() {
		let ledger = service_with(StubCustody::new());
		let balance = ledger.get_or_create_balance("alice", "btc").await.unwrap();
		assert_eq!(balance.balance, Decimal::ZERO);
		assert_eq!(balance.available, Decimal::ZERO);
	}

	#[tokio::test]
	async fn test_deposit_settles_once() {
		let ledger = service_with(StubCustody::with_settled(&["invoice-1"]));
		let deposit = ledger
			.request_deposit(
				"alice",
				&DepositRequest {
					asset_id: "btc".to_string(),
					amount: dec!(2),
					external_ref: Some("invoice-1".to_string()),
				},
			)
			.await
			.unwrap();

		let settled = ledger
			.settle_deposit("alice", &deposit.deposit_id)
			.await
			.unwrap();
		assert_eq!(settled.status, FundingStatus::Settled);

		// Second settle returns the stored row and credits nothing extra
		let again = ledger
			.settle_deposit("alice", &deposit.deposit_id)
			.await
			.unwrap();
		assert_eq!(again.status, FundingStatus::Settled);

		let balance = ledger.get_or_create_balance("alice", "btc").await.unwrap();
		assert_eq!(balance.balance, dec!(2));
		let entries = ledger.entries_for_user("alice").await.unwrap();
		assert_eq!(entries.len(), 1);
	}

	#[tokio::test]
	async fn test_deposit_without_ref_gets_custody_invoice() {
		let ledger = service_with(StubCustody::with_settled(&["stub-invoice"]));
		let deposit = ledger
			.request_deposit(
				"alice",
				&DepositRequest {
					asset_id: "btc".to_string(),
					amount: dec!(1),
					external_ref: None,
				},
			)
			.await
			.unwrap();
		assert_eq!(deposit.external_ref, "stub-invoice");

		let settled = ledger
			.settle_deposit("alice", &deposit.deposit_id)
			.await
			.unwrap();
		assert_eq!(settled.status, FundingStatus::Settled);
	}

	#[tokio::test]
	async fn test_unsettled_deposit_not_credited() {
		let ledger = service_with(StubCustody::new());
		let deposit = ledger
			.request_deposit(
				"alice",
				&DepositRequest {
					asset_id: "btc".to_string(),
					amount: dec!(2),
					external_ref: Some("invoice-unpaid".to_string()),
				},
			)
			.await
			.unwrap();

		let result = ledger.settle_deposit("alice", &deposit.deposit_id).await;
		assert!(matches!(result, Err(FundingError::NotSettled { .. })));

		let balance = ledger.get_or_create_balance("alice", "btc").await.unwrap();
		assert_eq!(balance.balance, Decimal::ZERO);
	}

	#[tokio::test]
	async fn test_withdrawal_requires_available_balance() {
		let ledger = service_with(StubCustody::new());
		let result = ledger
			.request_withdrawal(
				"alice",
				&WithdrawalRequest {
					asset_id: "btc".to_string(),
					amount: dec!(1),
					external_ref: "invoice-out".to_string(),
				},
			)
			.await;
		assert!(matches!(result, Err(FundingError::InsufficientFunds { .. })));
	}

	#[tokio::test]
	async fn test_withdrawal_debits_and_settles() {
		let ledger = service_with(StubCustody::with_settled(&["invoice-1"]));
		let deposit = ledger
			.request_deposit(
				"alice",
				&DepositRequest {
					asset_id: "btc".to_string(),
					amount: dec!(3),
					external_ref: Some("invoice-1".to_string()),
				},
			)
			.await
			.unwrap();
		ledger
			.settle_deposit("alice", &deposit.deposit_id)
			.await
			.unwrap();

		let withdrawal = ledger
			.request_withdrawal(
				"alice",
				&WithdrawalRequest {
					asset_id: "btc".to_string(),
					amount: dec!(1),
					external_ref: "invoice-out".to_string(),
				},
			)
			.await
			.unwrap();
		assert_eq!(withdrawal.status, FundingStatus::Settled);

		let balance = ledger.get_or_create_balance("alice", "btc").await.unwrap();
		assert_eq!(balance.balance, dec!(2));
	}

	#[tokio::test]
	async fn test_failed_payout_refunds() {
		let store = Arc::new(MemoryStore::with_expiry_sweep(false));
		let ledger = LedgerService::new(
			Arc::clone(&store) as Arc<dyn Storage>,
			Arc::new(StubCustody::failing_payouts()),
			"platform".to_string(),
		);

		// Seed a balance directly
		ledger
			.apply_entries(
				&[BalanceChange::credit("alice", "btc", dec!(3))],
				LedgerRefType::Deposit,
				"seed",
			)
			.await
			.unwrap();

		let result = ledger
			.request_withdrawal(
				"alice",
				&WithdrawalRequest {
					asset_id: "btc".to_string(),
					amount: dec!(1),
					external_ref: "invoice-out".to_string(),
				},
			)
			.await;
		assert!(matches!(result, Err(FundingError::Custody(_))));

		// Debit and compensating credit leave the balance unchanged
		let balance = ledger.get_or_create_balance("alice", "btc").await.unwrap();
		assert_eq!(balance.balance, dec!(3));
		let entries = ledger.entries_for_user("alice").await.unwrap();
		assert_eq!(entries.len(), 3);
	}

	#[tokio::test]
	async fn test_empty_batch_rejected() {
		let ledger = service_with(StubCustody::new());
		let result = ledger
			.apply_entries(&[], LedgerRefType::Deposit, "ref")
			.await;
		assert!(matches!(result, Err(LedgerError::EmptyBatch)));
	}
}
