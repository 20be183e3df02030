//! Arena Types
//!
//! Shared models and traits for the Arena Exchange engine.
//! This crate contains all domain models organized by business entity.

pub mod approvals;
pub mod assets;
pub mod auth;
pub mod funding;
pub mod ledger;
pub mod models;
pub mod payload;
pub mod pools;
pub mod quotes;
pub mod storage;
pub mod swaps;

// Re-export chrono, serde_json and rust_decimal for convenience
pub use chrono;
pub use rust_decimal;
pub use serde_json;

// Re-export commonly used types for convenience
pub use assets::{Asset, AssetError, NewAsset};

pub use pools::{CreatePoolRequest, Pool, PoolError, PoolLiquidity};

pub use quotes::{
	QuoteBreakdown, QuoteError, QuoteRequest, QuoteResponse, QuoteResult, SwapDirection,
};

pub use swaps::{
	ConfirmSwapRequest, InitSwapRequest, Swap, SwapApprovalPayload, SwapConfirmResponse, SwapError,
	SwapInitResponse, SwapResult, SwapStatus, SwapView,
};

pub use approvals::{Approval, ApprovalArtifact, ApprovalError, ApprovalResult};

pub use ledger::{BalanceChange, LedgerEntry, LedgerError, LedgerRefType, LedgerResult, UserBalance};

pub use funding::{
	Deposit, DepositRequest, FundingError, FundingResult, FundingStatus, Withdrawal,
	WithdrawalRequest,
};

pub use auth::AuthContext;

pub use models::{rescale, SecretString, AMOUNT_SCALE};

pub use payload::CanonicalPayload;

pub use storage::{
	AssetStorageTrait, FundingStorageTrait, LedgerStorageTrait, PoolStorageTrait, StorageError,
	StorageResult, StorageStats, StorageTrait, SwapStorageTrait,
};
