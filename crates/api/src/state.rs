use std::sync::Arc;

use arena_custody::CustodyClient;
use arena_service::{LedgerService, QuoteService, RegistryService, SwapService};
use arena_storage::Storage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub quote_service: Arc<QuoteService>,
	pub swap_service: Arc<SwapService>,
	pub ledger_service: Arc<LedgerService>,
	pub registry_service: Arc<RegistryService>,
	pub storage: Arc<dyn Storage>,
	pub custody: Arc<dyn CustodyClient>,
}
