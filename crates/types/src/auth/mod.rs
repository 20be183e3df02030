//! Authenticated request context
//!
//! The session/login handshake lives outside this engine. Upstream
//! infrastructure authenticates the caller and forwards the resulting
//! identity; the core trusts it as given.

use serde::{Deserialize, Serialize};

/// Identity attached to every authenticated operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
	/// Stable user identifier from the session layer
	pub user_id: String,
	/// The user's signing public key (x-only, 64 hex chars)
	pub pubkey: String,
}

impl AuthContext {
	pub fn new(user_id: impl Into<String>, pubkey: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			pubkey: pubkey.into(),
		}
	}
}
