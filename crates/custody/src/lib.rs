//! Arena Custody
//!
//! Client for the external asset custody/issuance service (an RGB Lightning
//! Node). The exchange consults it for deposit settlement state, asks it to
//! create deposit invoices, issues registered assets through it and executes
//! withdrawal payouts; it never computes AMM math here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod rln_client;

pub use rln_client::RlnClient;

/// Result type for custody operations
pub type CustodyResult<T> = Result<T, CustodyError>;

/// Errors surfaced by the custody client
#[derive(Debug, Error)]
pub enum CustodyError {
	#[error("custody request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("custody rejected request ({status}): {message}")]
	Api { status: u16, message: String },

	#[error("unexpected custody response: {0}")]
	InvalidResponse(String),
}

/// Node summary returned by the custody service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfo {
	pub pubkey: String,
	#[serde(default)]
	pub num_channels: u32,
}

/// What kind of invoice to create for an inbound transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvoiceRequest {
	/// Settlement-asset deposit over Lightning
	Lightning {
		amount_msat: u64,
		memo: Option<String>,
	},
	/// Registered-asset deposit
	Asset { asset_id: String, amount: u64 },
}

/// An invoice the depositor must pay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
	pub invoice: String,
	#[serde(default)]
	pub expiration_ts: Option<i64>,
}

/// Payout instruction for a withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRequest {
	/// Invoice supplied by the withdrawing user
	pub invoice: String,
	/// True when the invoice is for a registered asset rather than the
	/// settlement asset
	pub is_asset: bool,
}

/// Custody collaborator interface.
///
/// `deposit_settled` and `node_info` are reads and safe to retry; invoice
/// creation, issuance and payout execution are not retried by the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustodyClient: Send + Sync {
	async fn node_info(&self) -> CustodyResult<NodeInfo>;
	/// Issue a new registered asset; returns the custody asset id
	async fn issue_asset(
		&self,
		ticker: &str,
		name: &str,
		amount: u64,
		precision: u32,
	) -> CustodyResult<String>;
	async fn create_invoice(&self, request: InvoiceRequest) -> CustodyResult<Invoice>;
	/// Whether the transfer behind `external_ref` has settled
	async fn deposit_settled(&self, external_ref: &str) -> CustodyResult<bool>;
	/// Execute a payout; returns the custody-side payment reference
	async fn execute_payout(&self, request: PayoutRequest) -> CustodyResult<String>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_mock_custody_client() {
		let mut mock = MockCustodyClient::new();
		mock.expect_deposit_settled()
			.returning(|external_ref| Ok(external_ref == "paid-invoice"));

		assert!(mock.deposit_settled("paid-invoice").await.unwrap());
		assert!(!mock.deposit_settled("unpaid-invoice").await.unwrap());
	}
}
