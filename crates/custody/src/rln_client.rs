//! REST client for an RGB Lightning Node (RLN)
//!
//! Thin wrapper over the node's JSON endpoints. All AMM semantics stay in
//! the service layer; this client only moves custody state back and forth.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use arena_types::SecretString;

use crate::{
	CustodyClient, CustodyError, CustodyResult, Invoice, InvoiceRequest, NodeInfo, PayoutRequest,
};

/// HTTP client for the RLN custody node
pub struct RlnClient {
	http: reqwest::Client,
	base_url: String,
	bearer: Option<SecretString>,
}

impl RlnClient {
	pub fn new(
		base_url: String,
		bearer: Option<SecretString>,
		timeout_ms: u64,
	) -> CustodyResult<Self> {
		let http = reqwest::Client::builder()
			.timeout(Duration::from_millis(timeout_ms))
			.build()?;
		Ok(Self {
			http,
			base_url: base_url.trim_end_matches('/').to_string(),
			bearer,
		})
	}

	async fn post<T: DeserializeOwned>(
		&self,
		path: &str,
		body: serde_json::Value,
	) -> CustodyResult<T> {
		let url = format!("{}{}", self.base_url, path);
		debug!("custody request: POST {}", path);

		let mut request = self.http.post(&url).json(&body);
		if let Some(bearer) = &self.bearer {
			request = request.bearer_auth(bearer.expose_secret());
		}

		let response = request.send().await?;
		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(CustodyError::Api {
				status: status.as_u16(),
				message,
			});
		}

		response
			.json::<T>()
			.await
			.map_err(|e| CustodyError::InvalidResponse(e.to_string()))
	}
}

#[derive(Debug, Deserialize)]
struct InvoiceResponse {
	invoice: String,
	#[serde(default)]
	expiration_timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct InvoiceStatusResponse {
	status: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
	payment_hash: String,
}

#[derive(Debug, Deserialize)]
struct IssuedAsset {
	asset_id: String,
}

#[derive(Debug, Deserialize)]
struct IssueAssetResponse {
	asset: IssuedAsset,
}

#[async_trait]
impl CustodyClient for RlnClient {
	async fn node_info(&self) -> CustodyResult<NodeInfo> {
		let url = format!("{}/nodeinfo", self.base_url);
		let mut request = self.http.get(&url);
		if let Some(bearer) = &self.bearer {
			request = request.bearer_auth(bearer.expose_secret());
		}
		let response = request.send().await?;
		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(CustodyError::Api {
				status: status.as_u16(),
				message,
			});
		}
		response
			.json::<NodeInfo>()
			.await
			.map_err(|e| CustodyError::InvalidResponse(e.to_string()))
	}

	async fn issue_asset(
		&self,
		ticker: &str,
		name: &str,
		amount: u64,
		precision: u32,
	) -> CustodyResult<String> {
		let response: IssueAssetResponse = self
			.post(
				"/issueassetnia",
				json!({
					"ticker": ticker,
					"name": name,
					"amounts": [amount],
					"precision": precision,
				}),
			)
			.await?;
		Ok(response.asset.asset_id)
	}

	async fn create_invoice(&self, request: InvoiceRequest) -> CustodyResult<Invoice> {
		let response: InvoiceResponse = match request {
			InvoiceRequest::Lightning { amount_msat, memo } => {
				let mut body = json!({ "amount_msat": amount_msat });
				if let Some(memo) = memo {
					body["description"] = json!(memo);
				}
				self.post("/lninvoice", body).await?
			},
			InvoiceRequest::Asset { asset_id, amount } => {
				self.post("/rgbinvoice", json!({ "asset_id": asset_id, "amount": amount }))
					.await?
			},
		};
		Ok(Invoice {
			invoice: response.invoice,
			expiration_ts: response.expiration_timestamp,
		})
	}

	async fn deposit_settled(&self, external_ref: &str) -> CustodyResult<bool> {
		let response: InvoiceStatusResponse = self
			.post("/invoicestatus", json!({ "invoice": external_ref }))
			.await?;
		Ok(response.status.eq_ignore_ascii_case("succeeded"))
	}

	async fn execute_payout(&self, request: PayoutRequest) -> CustodyResult<String> {
		let path = if request.is_asset {
			"/sendasset"
		} else {
			"/sendpayment"
		};
		let response: PaymentResponse =
			self.post(path, json!({ "invoice": request.invoice })).await?;
		Ok(response.payment_hash)
	}
}
