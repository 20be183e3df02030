//! Authenticated identity extraction
//!
//! The login handshake lives in the upstream session layer, which forwards
//! the authenticated identity as `x-user-id` and `x-user-pubkey` headers.
//! The engine trusts these values as given; requests without them are
//! rejected before any handler logic runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use arena_types::AuthContext;

use crate::handlers::common::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the user's signing pubkey (x-only, hex)
pub const USER_PUBKEY_HEADER: &str = "x-user-pubkey";

/// Extractor wrapping the trusted identity headers
pub struct Identity(pub AuthContext);

impl<S> FromRequestParts<S> for Identity
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let user_id = header_value(parts, USER_ID_HEADER)?;
		let pubkey = header_value(parts, USER_PUBKEY_HEADER)?;
		Ok(Identity(AuthContext::new(user_id, pubkey)))
	}
}

fn header_value(parts: &Parts, name: &str) -> Result<String, ApiError> {
	parts
		.headers
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.to_string())
		.filter(|value| !value.is_empty())
		.ok_or_else(|| ApiError::unauthorized(format!("missing {} header", name)))
}
