//! Arena Storage
//!
//! Pluggable storage implementations for the Arena Exchange engine.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use traits::{
	AssetStorage, FundingStorage, LedgerStorage, PoolStorage, Storage, StorageError,
	StorageResult, StorageStats, SwapStorage,
};
