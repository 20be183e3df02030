//! Arena Service
//!
//! Business logic for the Arena Exchange engine: pricing, the swap state
//! machine, authorization verification, the balance ledger and the asset
//! registry.

pub mod approval;
pub mod ledger;
pub mod quote;
pub mod registry;
pub mod swap;

pub use approval::ApprovalService;
pub use ledger::LedgerService;
pub use quote::{quote, QuoteService};
pub use registry::RegistryService;
pub use swap::SwapService;
