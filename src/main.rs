//! Loyalty gateway HTTP entrypoint.
//!
//! This binary launches an Axum-based HTTP server exposing read-only views
//! over loyalty program contracts on supported EVM networks.
//!
//! Endpoints:
//! - `GET /bounties` – Active bounties of a loyalty program
//! - `GET /prizes` – Active prizes
//! - `GET /reward-templates` – Active reward templates
//! - `GET /members` – Enrolled members with point totals
//! - `GET /members/details` – One member's completed bounties, vouchers, and prizes
//! - `GET /vouchers` – Vouchers owned by a user
//! - `GET /supported` – Networks this gateway serves
//!
//! This server includes:
//! - OpenTelemetry tracing via `TraceLayer`
//! - CORS support for cross-origin clients
//! - A read-only provider cache for per-network RPC routing
//! - A request timeout that abandons in-flight batches
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `HOST`, `PORT` control the binding address
//! - `RPC_URL_*` variables override per-network RPC endpoints
//! - `FETCH_CONCURRENCY`, `REQUEST_TIMEOUT_SECS` tune aggregation passes
//! - `OTEL_*` variables enable tracing export

use axum::Router;
use axum::http::Method;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors;
use tower_http::timeout::TimeoutLayer;

use loyalty_rs::config::Config;
use loyalty_rs::gateway::LoyaltyGateway;
use loyalty_rs::handlers;
use loyalty_rs::provider_cache::ProviderCache;
use loyalty_rs::sig_down::SigDown;
use loyalty_rs::telemetry::Telemetry;

/// Initializes the loyalty gateway server.
///
/// - Loads `.env` variables.
/// - Initializes tracing and, when configured, OpenTelemetry export.
/// - Connects read-only providers for supported networks.
/// - Starts an Axum HTTP server with the gateway handlers.
///
/// Binds to the address specified by the `HOST` and `PORT` env vars.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize rustls crypto provider (ring)
    rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
        .expect("Failed to initialize rustls crypto provider");

    // Load .env variables
    dotenv().ok();

    let telemetry = Telemetry::new();

    let config = Config::load()?;
    let provider_cache = ProviderCache::from_env()?;
    let gateway = LoyaltyGateway::new(provider_cache, config.fetch_concurrency());
    let axum_state = Arc::new(gateway);

    let http_endpoints = Router::new()
        .merge(handlers::routes().with_state(axum_state))
        .layer(telemetry.http_tracing())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(
            cors::CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET])
                .allow_headers(cors::Any),
        );

    let addr = SocketAddr::new(config.host(), config.port());
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind to {}: {}", addr, e))?;

    let sig_down = SigDown::try_new()?;
    let cancellation_token = sig_down.cancellation_token();
    let graceful_shutdown = async move { cancellation_token.cancelled().await };
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(graceful_shutdown)
        .await?;

    Ok(())
}
