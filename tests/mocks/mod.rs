//! Shared fixtures for the end-to-end suites

use std::sync::Arc;

use k256::schnorr::SigningKey;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::task::JoinHandle;

use arena_exchange::mocks::{mock_signer, signer_pubkey, MockCustody};
use arena_exchange::types::{BalanceChange, CreatePoolRequest, LedgerRefType, NewAsset};
use arena_exchange::{AppState, AuthContext, ExchangeBuilder, MemoryStore, Settings};

/// A spawned exchange server plus direct access to its state for seeding
#[allow(dead_code)]
pub struct TestServer {
	pub base_url: String,
	pub state: AppState,
	pub custody: Arc<MockCustody>,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	#[allow(dead_code)]
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with_custody(Arc::new(MockCustody::new())).await
	}

	#[allow(dead_code)]
	pub async fn spawn_with_custody(
		custody: Arc<MockCustody>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let settings = Settings::default();

		let (router, state) =
			ExchangeBuilder::with_storage(MemoryStore::with_expiry_sweep(false))
				.with_settings(settings)
				.with_custody(Arc::clone(&custody) as Arc<dyn arena_custody::CustodyClient>)
				.start()
				.await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, router).await;
		});

		// Give the server a moment to start accepting
		tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

		Ok(Self {
			base_url,
			state,
			custody,
			handle,
		})
	}

	#[allow(dead_code)]
	pub fn abort(self) {
		self.handle.abort();
	}
}

/// Seeded market: one BTC/TKN pool plus a funded trader
#[allow(dead_code)]
pub struct Market {
	pub pool_id: String,
	pub settlement_asset_id: String,
	pub registered_asset_id: String,
	pub trader: AuthContext,
	pub signer: SigningKey,
}

/// Reserves and fee split from the reference scenario: 1 BTC / 100000 TKN,
/// 1% fee split 50/50.
#[allow(dead_code)]
pub async fn seed_market(state: &AppState) -> Market {
	let settlement = state
		.registry_service
		.get_or_create_asset(NewAsset {
			symbol: "BTC".to_string(),
			name: "Bitcoin".to_string(),
			precision: 8,
			custody_asset_id: None,
			created_by: None,
			issue_supply: None,
		})
		.await
		.expect("settlement asset");
	let registered = state
		.registry_service
		.get_or_create_asset(NewAsset {
			symbol: "TKN".to_string(),
			name: "Test Token".to_string(),
			precision: 0,
			custody_asset_id: Some("rgb:mock-tkn".to_string()),
			created_by: None,
			issue_supply: None,
		})
		.await
		.expect("registered asset");

	let (pool, _liquidity) = state
		.registry_service
		.create_pool(&CreatePoolRequest {
			asset_settlement_id: settlement.asset_id.clone(),
			asset_registered_id: registered.asset_id.clone(),
			fee_bps: 100,
			lp_fee_bps: 50,
			platform_fee_bps: 50,
			is_virtual: false,
			real_settlement: dec!(1),
			real_registered: dec!(100000),
			virtual_settlement: Decimal::ZERO,
			virtual_registered: Decimal::ZERO,
		})
		.await
		.expect("pool");

	let signer = mock_signer();
	let trader = AuthContext::new("trader-1", signer_pubkey(&signer));

	state
		.ledger_service
		.apply_entries(
			&[
				BalanceChange::credit(&trader.user_id, &settlement.asset_id, dec!(10)),
				BalanceChange::credit(&trader.user_id, &registered.asset_id, dec!(10000)),
			],
			LedgerRefType::Deposit,
			"seed",
		)
		.await
		.expect("seed balances");

	Market {
		pool_id: pool.pool_id,
		settlement_asset_id: settlement.asset_id,
		registered_asset_id: registered.asset_id,
		trader,
		signer,
	}
}

/// Attach the trusted identity headers the session layer would set
#[allow(dead_code)]
pub fn authed(
	request: reqwest::RequestBuilder,
	ctx: &AuthContext,
) -> reqwest::RequestBuilder {
	request
		.header("x-user-id", &ctx.user_id)
		.header("x-user-pubkey", &ctx.pubkey)
}
