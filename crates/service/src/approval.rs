//! Swap authorization verification
//!
//! Validates that a client-submitted signed event authorizes the exact
//! server-held swap intent. The event id must equal the SHA-256 of the
//! serialized event, the content must equal the canonical payload, and the
//! BIP-340 schnorr signature over the id must verify against the claimed
//! signer key. A swap can consume at most one approval; any attempt after
//! that is rejected as replayed, valid signature or not.

use std::sync::Arc;

use k256::schnorr::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use arena_storage::Storage;
use arena_types::{Approval, ApprovalArtifact, ApprovalError, ApprovalResult, AuthContext, Swap};

/// Verifier for swap authorization artifacts
pub struct ApprovalService {
	storage: Arc<dyn Storage>,
	/// Skips cryptographic checks when set; single-use bookkeeping still
	/// applies. Never enable in production.
	verify_disabled: bool,
}

impl ApprovalService {
	pub fn new(storage: Arc<dyn Storage>, verify_disabled: bool) -> Self {
		if verify_disabled {
			warn!("Approval signature verification is DISABLED - unsafe outside development");
		}
		Self {
			storage,
			verify_disabled,
		}
	}

	/// Recompute the event id: SHA-256 over the serialized array form
	/// `[0, pubkey, created_at, kind, tags, content]`.
	pub fn compute_event_id(artifact: &ApprovalArtifact) -> ApprovalResult<String> {
		let serialized = serde_json::to_string(&(
			0u8,
			&artifact.pubkey,
			artifact.created_at,
			artifact.kind,
			&artifact.tags,
			&artifact.content,
		))
		.map_err(|e| ApprovalError::Malformed {
			reason: format!("unserializable event: {}", e),
		})?;
		let digest = Sha256::digest(serialized.as_bytes());
		Ok(hex::encode(digest))
	}

	/// Verify `artifact` against the server-held swap and its canonical
	/// payload. On success returns the approval row for the caller to
	/// persist inside the commit transaction; nothing is written here.
	pub async fn verify(
		&self,
		swap: &Swap,
		expected_payload: &str,
		artifact: &ApprovalArtifact,
		ctx: &AuthContext,
	) -> ApprovalResult<Approval> {
		// The replay guard applies in every mode: one approval per swap.
		let existing = self
			.storage
			.get_approval_by_swap(&swap.swap_id)
			.await
			.map_err(|e| ApprovalError::Storage(e.to_string()))?;
		if existing.is_some() {
			return Err(ApprovalError::Replayed);
		}

		if self.verify_disabled {
			warn!(
				"Accepting unverified approval for swap {} (verification disabled)",
				swap.swap_id
			);
			return Ok(Approval::new(&swap.swap_id, artifact));
		}

		artifact.validate_shape()?;

		if !artifact.pubkey.eq_ignore_ascii_case(&ctx.pubkey) {
			return Err(ApprovalError::SignerMismatch);
		}

		// Bind the signature to the exact server-held parameters: the signed
		// content must be the canonical payload, byte for byte.
		if artifact.content != expected_payload {
			return Err(ApprovalError::PayloadMismatch);
		}

		let recomputed = Self::compute_event_id(artifact)?;
		if !recomputed.eq_ignore_ascii_case(&artifact.id) {
			return Err(ApprovalError::EventIdMismatch);
		}

		let id_bytes = hex::decode(&artifact.id).map_err(|_| ApprovalError::Malformed {
			reason: "id is not valid hex".to_string(),
		})?;
		let pubkey_bytes =
			hex::decode(&artifact.pubkey).map_err(|_| ApprovalError::Malformed {
				reason: "pubkey is not valid hex".to_string(),
			})?;
		let sig_bytes = hex::decode(&artifact.sig).map_err(|_| ApprovalError::Malformed {
			reason: "sig is not valid hex".to_string(),
		})?;

		let verifying_key =
			VerifyingKey::from_bytes(&pubkey_bytes).map_err(|_| ApprovalError::InvalidSignature)?;
		let signature =
			Signature::try_from(sig_bytes.as_slice()).map_err(|_| ApprovalError::InvalidSignature)?;
		verifying_key
			.verify_raw(&id_bytes, &signature)
			.map_err(|_| ApprovalError::InvalidSignature)?;

		debug!(
			"Approval verified for swap {} by signer {}",
			swap.swap_id, artifact.pubkey
		);
		Ok(Approval::new(&swap.swap_id, artifact))
	}
}
