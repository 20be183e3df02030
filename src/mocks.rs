//! Mock implementations and fixtures for tests and demos
//!
//! `MockCustody` stands in for the RGB Lightning Node; the signer helpers
//! produce real BIP-340 artifacts so the verification path is exercised for
//! real in tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use k256::schnorr::SigningKey;

use arena_custody::{
	CustodyClient, CustodyError, CustodyResult, Invoice, InvoiceRequest, NodeInfo, PayoutRequest,
};
use arena_service::ApprovalService;
use arena_types::{ApprovalArtifact, CanonicalPayload, SwapApprovalPayload};

/// In-memory custody stand-in with configurable settled transfers
pub struct MockCustody {
	settled_refs: Mutex<HashSet<String>>,
	fail_payouts: bool,
}

impl MockCustody {
	pub fn new() -> Self {
		Self {
			settled_refs: Mutex::new(HashSet::new()),
			fail_payouts: false,
		}
	}

	/// Custody that refuses every payout
	pub fn with_failing_payouts() -> Self {
		Self {
			fail_payouts: true,
			..Self::new()
		}
	}

	/// Mark a transfer reference as settled
	pub fn settle(&self, external_ref: &str) {
		self.settled_refs
			.lock()
			.expect("settled refs lock")
			.insert(external_ref.to_string());
	}
}

impl Default for MockCustody {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl CustodyClient for MockCustody {
	async fn node_info(&self) -> CustodyResult<NodeInfo> {
		Ok(NodeInfo {
			pubkey: "mock-node".to_string(),
			num_channels: 1,
		})
	}

	async fn issue_asset(
		&self,
		ticker: &str,
		_name: &str,
		_amount: u64,
		_precision: u32,
	) -> CustodyResult<String> {
		Ok(format!("mock-custody-{}", ticker.to_lowercase()))
	}

	async fn create_invoice(&self, _request: InvoiceRequest) -> CustodyResult<Invoice> {
		Ok(Invoice {
			invoice: "mock-invoice".to_string(),
			expiration_ts: None,
		})
	}

	async fn deposit_settled(&self, external_ref: &str) -> CustodyResult<bool> {
		Ok(self
			.settled_refs
			.lock()
			.expect("settled refs lock")
			.contains(external_ref))
	}

	async fn execute_payout(&self, request: PayoutRequest) -> CustodyResult<String> {
		if self.fail_payouts {
			return Err(CustodyError::Api {
				status: 400,
				message: "no route to destination".to_string(),
			});
		}
		Ok(format!("mock-payment-{}", request.invoice))
	}
}

/// Deterministic signing key for tests
pub fn mock_signer() -> SigningKey {
	SigningKey::from_bytes(&[42u8; 32]).expect("valid mock key")
}

/// Hex x-only pubkey for a signing key
pub fn signer_pubkey(key: &SigningKey) -> String {
	hex::encode(key.verifying_key().to_bytes())
}

/// Produce a correctly signed approval artifact for a swap payload
pub fn sign_swap_payload(payload: &SwapApprovalPayload, key: &SigningKey) -> ApprovalArtifact {
	let mut artifact = ApprovalArtifact {
		id: String::new(),
		pubkey: signer_pubkey(key),
		created_at: Utc::now().timestamp(),
		kind: 1,
		tags: vec![],
		content: payload.canonical_payload(),
		sig: String::new(),
	};
	artifact.id = ApprovalService::compute_event_id(&artifact).expect("event id");
	let id_bytes = hex::decode(&artifact.id).expect("hex id");
	let signature = key.sign_raw(&id_bytes, &[0u8; 32]).expect("schnorr sign");
	artifact.sig = hex::encode(signature.to_bytes());
	artifact
}
