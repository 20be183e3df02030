//! Swap authorization artifacts
//!
//! A confirm call carries a signed event in the shape the original signing
//! clients produce: the canonical payload JSON as `content`, an id that is
//! the SHA-256 of the serialized event, and a BIP-340 schnorr signature over
//! that id. At most one approval row ever exists per swap; the row itself
//! is the replay guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type for approval operations
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Client-submitted signed artifact authorizing one swap intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalArtifact {
	/// SHA-256 content hash, 64 hex chars
	pub id: String,
	/// Signer's x-only public key, 64 hex chars
	pub pubkey: String,
	pub created_at: i64,
	pub kind: u32,
	#[serde(default)]
	pub tags: Vec<Vec<String>>,
	/// Must equal the server-held canonical payload
	pub content: String,
	/// BIP-340 schnorr signature, 128 hex chars
	pub sig: String,
}

impl ApprovalArtifact {
	/// Cheap shape checks before any cryptography
	pub fn validate_shape(&self) -> Result<(), ApprovalError> {
		if self.id.len() != 64 || !is_hex(&self.id) {
			return Err(ApprovalError::Malformed {
				reason: "id must be 64 hex chars".to_string(),
			});
		}
		if self.pubkey.len() != 64 || !is_hex(&self.pubkey) {
			return Err(ApprovalError::Malformed {
				reason: "pubkey must be 64 hex chars".to_string(),
			});
		}
		if self.sig.len() != 128 || !is_hex(&self.sig) {
			return Err(ApprovalError::Malformed {
				reason: "sig must be 128 hex chars".to_string(),
			});
		}
		Ok(())
	}
}

fn is_hex(value: &str) -> bool {
	value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Stored record of a consumed authorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
	pub approval_id: String,
	pub swap_id: String,
	pub signer_pubkey: String,
	pub event_id: String,
	pub sig: String,
	pub approved: bool,
	pub created_at: DateTime<Utc>,
}

impl Approval {
	pub fn new(swap_id: &str, artifact: &ApprovalArtifact) -> Self {
		Self {
			approval_id: Uuid::new_v4().to_string(),
			swap_id: swap_id.to_string(),
			signer_pubkey: artifact.pubkey.clone(),
			event_id: artifact.id.clone(),
			sig: artifact.sig.clone(),
			approved: true,
			created_at: Utc::now(),
		}
	}
}

/// Errors raised while verifying an authorization artifact
#[derive(Debug, Error)]
pub enum ApprovalError {
	#[error("malformed artifact: {reason}")]
	Malformed { reason: String },

	#[error("artifact signer does not match the authenticated user")]
	SignerMismatch,

	#[error("artifact content does not match the stored swap intent")]
	PayloadMismatch,

	#[error("artifact id does not match the recomputed content hash")]
	EventIdMismatch,

	#[error("invalid signature")]
	InvalidSignature,

	#[error("swap authorization was already consumed")]
	Replayed,

	#[error("storage error: {0}")]
	Storage(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	fn artifact() -> ApprovalArtifact {
		ApprovalArtifact {
			id: "a".repeat(64),
			pubkey: "b".repeat(64),
			created_at: 1_700_000_000,
			kind: 1,
			tags: vec![],
			content: "{}".to_string(),
			sig: "c".repeat(128),
		}
	}

	#[test]
	fn test_valid_shape() {
		assert!(artifact().validate_shape().is_ok());
	}

	#[test]
	fn test_short_id_rejected() {
		let mut bad = artifact();
		bad.id.truncate(10);
		assert!(matches!(
			bad.validate_shape(),
			Err(ApprovalError::Malformed { .. })
		));
	}

	#[test]
	fn test_non_hex_sig_rejected() {
		let mut bad = artifact();
		bad.sig = "z".repeat(128);
		assert!(matches!(
			bad.validate_shape(),
			Err(ApprovalError::Malformed { .. })
		));
	}
}
