//! Arena Exchange Library
//!
//! A two-asset constant-product AMM exchange engine with ledgered balances,
//! deposit/withdrawal accounting and signed swap intents.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use arena_config::{load_config, log_service_info, log_settings_summary, log_startup_complete};
use arena_custody::{CustodyClient, RlnClient};

// Core domain types - the most commonly used types
pub use arena_types::{
	chrono,
	rust_decimal,
	// External dependencies for convenience
	serde_json,
	// Primary domain entities
	Approval,
	ApprovalArtifact,
	// Error types
	ApprovalError,
	Asset,
	AssetError,
	AuthContext,
	BalanceChange,
	ConfirmSwapRequest,
	CreatePoolRequest,
	Deposit,
	DepositRequest,
	FundingError,
	FundingStatus,
	InitSwapRequest,
	LedgerEntry,
	LedgerError,
	LedgerRefType,
	NewAsset,
	Pool,
	PoolError,
	PoolLiquidity,
	QuoteError,
	QuoteRequest,
	QuoteResponse,
	Swap,
	SwapApprovalPayload,
	SwapConfirmResponse,
	SwapError,
	SwapInitResponse,
	SwapStatus,
	UserBalance,
	Withdrawal,
	WithdrawalRequest,
};

// Service layer
pub use arena_service::{
	ApprovalService, LedgerService, QuoteService, RegistryService, SwapService,
};

// Storage layer
pub use arena_storage::{MemoryStore, Storage, StorageError, StorageResult};

// API layer
pub use arena_api::{create_router, AppState, Identity};

// Custody layer
pub use arena_custody::{CustodyError, InvoiceRequest, PayoutRequest};

// Config
pub use arena_config::Settings;

// Module aliases for direct access to the member crates
pub mod types {
	pub use arena_types::*;
}

pub mod storage {
	pub use arena_storage::*;
}

pub mod service {
	pub use arena_service::*;
}

pub mod api {
	pub use arena_api::*;
}

pub mod config {
	pub use arena_config::*;
}

pub mod custody {
	pub use arena_custody::*;
}

pub mod mocks;

/// Builder for configuring and starting the exchange
pub struct ExchangeBuilder<S = MemoryStore>
where
	S: Storage + Clone + 'static,
{
	settings: Option<Settings>,
	storage: S,
	custody: Option<Arc<dyn CustodyClient>>,
}

impl ExchangeBuilder<MemoryStore> {
	/// Create a builder with default in-memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}
}

impl Default for ExchangeBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S> ExchangeBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a builder with the provided storage backend
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			custody: None,
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Set a custom custody client (tests plug a mock in here)
	pub fn with_custody(mut self, custody: Arc<dyn CustodyClient>) -> Self {
		self.custody = Some(custody);
		self
	}

	/// Wire the services and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings.validate()?;

		let storage: Arc<dyn Storage> = Arc::new(self.storage.clone());

		let custody = match self.custody {
			Some(custody) => custody,
			None => {
				let bearer = settings
					.custody
					.bearer
					.as_ref()
					.map(|value| value.resolve_for_secret())
					.transpose()?;
				Arc::new(RlnClient::new(
					settings.custody.base_url.clone(),
					bearer,
					settings.custody.timeout_ms,
				)?) as Arc<dyn CustodyClient>
			},
		};

		let ledger_service = Arc::new(LedgerService::new(
			Arc::clone(&storage),
			Arc::clone(&custody),
			settings.exchange.platform_account_id.clone(),
		));
		let approval_service = Arc::new(ApprovalService::new(
			Arc::clone(&storage),
			settings.exchange.approval_verify_disabled,
		));
		let swap_service = Arc::new(SwapService::new(
			Arc::clone(&storage),
			Arc::clone(&ledger_service),
			approval_service,
			settings.exchange.max_deadline_window_secs,
		));
		let quote_service = Arc::new(QuoteService::new(Arc::clone(&storage)));
		let registry_service = Arc::new(RegistryService::new(
			Arc::clone(&storage),
			Arc::clone(&custody),
		));

		storage.start_background_tasks().await?;

		let app_state = AppState {
			quote_service,
			swap_service,
			ledger_service,
			registry_service,
			storage,
			custody,
		};

		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server: .env, config, tracing, bind and serve
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_default(),
		};

		init_tracing(&settings)?;
		log_service_info();
		log_settings_summary(&settings);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /api/v1/quotes");
		info!("  POST /api/v1/swaps");
		info!("  POST /api/v1/swaps/{{id}}/confirm");
		info!("  GET  /api/v1/balances");
		info!("  POST /api/v1/deposits");
		info!("  POST /api/v1/withdrawals");
		info!("  GET  /api/v1/pools");

		axum::serve(listener, app).await?;

		Ok(())
	}
}

fn init_tracing(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
	use arena_config::LogFormat;

	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

	match settings.logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter);
			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter);
			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		},
	}

	Ok(())
}
