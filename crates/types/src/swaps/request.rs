//! Swap request payloads

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::approvals::ApprovalArtifact;

use super::errors::SwapValidationError;

/// Body of a swap init call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitSwapRequest {
	pub pool_id: String,
	pub asset_in_id: String,
	pub amount_in: Decimal,
	pub min_out: Decimal,
	/// Unix seconds; must be in the future at init time
	pub deadline_ts: i64,
}

impl InitSwapRequest {
	/// Parameter checks that need no storage access
	pub fn validate(&self) -> Result<(), SwapValidationError> {
		if self.amount_in <= Decimal::ZERO {
			return Err(SwapValidationError::NonPositiveAmountIn);
		}
		if self.min_out.is_sign_negative() {
			return Err(SwapValidationError::NegativeMinOut);
		}
		if self.deadline_ts <= Utc::now().timestamp() {
			return Err(SwapValidationError::DeadlineInPast {
				deadline_ts: self.deadline_ts,
			});
		}
		Ok(())
	}
}

/// Body of a swap confirm call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmSwapRequest {
	pub artifact: ApprovalArtifact,
}
