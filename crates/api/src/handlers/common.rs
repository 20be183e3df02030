//! Error boundary shared by all handlers
//!
//! Domain errors carry their kind; this is the single place that kind turns
//! into an HTTP status and response body. Responses never echo signature
//! material back.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use arena_types::{
	ApprovalError, AssetError, FundingError, LedgerError, PoolError, QuoteError, SwapError,
};

/// Error response format shared by handlers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

/// Transport-level error with its mapped status code
#[derive(Debug)]
pub struct ApiError {
	pub status: StatusCode,
	pub code: &'static str,
	pub message: String,
}

impl ApiError {
	fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
		Self {
			status,
			code,
			message: message.into(),
		}
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorResponse {
			error: self.code.to_string(),
			message: self.message,
			timestamp: chrono::Utc::now().timestamp(),
		};
		(self.status, Json(body)).into_response()
	}
}

impl From<QuoteError> for ApiError {
	fn from(error: QuoteError) -> Self {
		match &error {
			QuoteError::InvalidParameter { .. } => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			QuoteError::PoolNotFound(_) => {
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
			},
			QuoteError::PoolInactive(_) => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			QuoteError::NoLiquidity => Self::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"NO_LIQUIDITY",
				error.to_string(),
			),
			QuoteError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}

impl From<PoolError> for ApiError {
	fn from(error: PoolError) -> Self {
		match &error {
			PoolError::Validation(_) | PoolError::Inactive(_) => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			PoolError::NotFound(_) | PoolError::AssetNotFound(_) => {
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
			},
			PoolError::DuplicatePair { .. } => {
				Self::new(StatusCode::CONFLICT, "CONFLICT", error.to_string())
			},
			PoolError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}

impl From<AssetError> for ApiError {
	fn from(error: AssetError) -> Self {
		match &error {
			AssetError::NotFound(_) => {
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
			},
			AssetError::InvalidSymbol { .. } => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			AssetError::Custody(_) => Self::new(
				StatusCode::BAD_GATEWAY,
				"CUSTODY_ERROR",
				error.to_string(),
			),
			AssetError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}

impl From<ApprovalError> for ApiError {
	fn from(error: ApprovalError) -> Self {
		match &error {
			ApprovalError::Malformed { .. } => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			ApprovalError::SignerMismatch => {
				Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", error.to_string())
			},
			ApprovalError::PayloadMismatch
			| ApprovalError::EventIdMismatch
			| ApprovalError::InvalidSignature => Self::new(
				StatusCode::UNAUTHORIZED,
				"INVALID_SIGNATURE",
				error.to_string(),
			),
			ApprovalError::Replayed => {
				Self::new(StatusCode::CONFLICT, "REPLAYED_NONCE", error.to_string())
			},
			ApprovalError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}

impl From<LedgerError> for ApiError {
	fn from(error: LedgerError) -> Self {
		match &error {
			LedgerError::InsufficientFunds { .. } => Self::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"INSUFFICIENT_FUNDS",
				error.to_string(),
			),
			LedgerError::EmptyBatch => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			LedgerError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}

impl From<SwapError> for ApiError {
	fn from(error: SwapError) -> Self {
		match error {
			SwapError::Validation(inner) => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", inner.to_string())
			},
			SwapError::NotFound(_) => Self::new(
				StatusCode::NOT_FOUND,
				"NOT_FOUND",
				error.to_string(),
			),
			SwapError::Forbidden(_) => {
				Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", error.to_string())
			},
			SwapError::DeadlineExceeded => Self::new(
				StatusCode::GONE,
				"DEADLINE_EXCEEDED",
				error.to_string(),
			),
			SwapError::Slippage { .. } => Self::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"SLIPPAGE",
				error.to_string(),
			),
			SwapError::Pool(inner) => inner.into(),
			SwapError::Quote(inner) => inner.into(),
			SwapError::Approval(inner) => inner.into(),
			SwapError::Ledger(inner) => inner.into(),
			SwapError::Storage(message) => Self::internal(message),
		}
	}
}

impl From<FundingError> for ApiError {
	fn from(error: FundingError) -> Self {
		match &error {
			FundingError::InvalidParameter { .. } => {
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", error.to_string())
			},
			FundingError::DepositNotFound(_) | FundingError::WithdrawalNotFound(_) => {
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
			},
			FundingError::Forbidden(_) => {
				Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", error.to_string())
			},
			FundingError::NotSettled { .. } => {
				Self::new(StatusCode::CONFLICT, "NOT_SETTLED", error.to_string())
			},
			FundingError::InsufficientFunds { .. } => Self::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"INSUFFICIENT_FUNDS",
				error.to_string(),
			),
			FundingError::Custody(_) => Self::new(
				StatusCode::BAD_GATEWAY,
				"CUSTODY_ERROR",
				error.to_string(),
			),
			FundingError::Storage(_) => Self::internal(error.to_string()),
		}
	}
}
