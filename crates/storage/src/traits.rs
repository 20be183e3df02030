//! Storage traits for pluggable storage implementations

// Re-export the storage traits from the types crate
pub use arena_types::storage::{
	AssetStorageTrait as AssetStorage, FundingStorageTrait as FundingStorage,
	LedgerStorageTrait as LedgerStorage, PoolStorageTrait as PoolStorage, StorageError,
	StorageResult, StorageStats, StorageTrait as Storage, SwapStorageTrait as SwapStorage,
};
