use axum::{
	routing::{get, post},
	Router,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{
	cancel_swap, confirm_swap, create_asset, create_pool, get_assets, get_balances, get_deposit,
	get_pool, get_pools, get_swap, get_swaps, get_withdrawal, health, post_deposit, post_quote,
	post_swap, post_withdrawal, ready, settle_deposit,
};
use crate::security::add_security_headers;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
	let cors = CorsLayer::permissive();
	let body_limit = RequestBodyLimitLayer::new(64 * 1024);
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/ready", get(ready))
		.route("/api/v1/quotes", post(post_quote))
		.route("/api/v1/swaps", post(post_swap).get(get_swaps))
		.route("/api/v1/swaps/{id}", get(get_swap))
		.route("/api/v1/swaps/{id}/confirm", post(confirm_swap))
		.route("/api/v1/swaps/{id}/cancel", post(cancel_swap))
		.route("/api/v1/balances", get(get_balances))
		.route("/api/v1/deposits", post(post_deposit))
		.route("/api/v1/deposits/{id}", get(get_deposit))
		.route("/api/v1/deposits/{id}/settle", post(settle_deposit))
		.route("/api/v1/withdrawals", post(post_withdrawal))
		.route("/api/v1/withdrawals/{id}", get(get_withdrawal))
		.route("/api/v1/pools", get(get_pools).post(create_pool))
		.route("/api/v1/pools/{id}", get(get_pool))
		.route("/api/v1/assets", get(get_assets).post(create_asset));

	let router = router
		.layer(cors)
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(body_limit);

	add_security_headers(router)
}
