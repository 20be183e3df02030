//! Storage trait definitions
//!
//! Pluggable persistence seam for the exchange. The in-memory backend lives
//! in `arena-storage`; any other backend implements the same traits.

pub mod errors;
pub mod traits;

pub use errors::{StorageError, StorageResult};
pub use traits::{
	AssetStorageTrait, FundingStorageTrait, LedgerStorageTrait, PoolStorageTrait, StorageStats,
	StorageTrait, SwapStorageTrait,
};
