//! Arena Exchange Server
//!
//! Main entry point for the exchange server

use arena_exchange::ExchangeBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	ExchangeBuilder::new().start_server().await
}
