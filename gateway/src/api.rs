//! # REST API
//!
//! Builds the axum router that exposes the gateway's HTTP interface.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                      |
//! |--------|-------------------------------|----------------------------------|
//! | GET    | `/health`                     | Liveness probe                   |
//! | GET    | `/status`                     | Gateway status summary           |
//! | GET    | `/wallet/address`             | The wallet's public address      |
//! | GET    | `/wallet/balance`             | Native balance in SOL            |
//! | GET    | `/wallet/balance/usdc`        | Balance of the configured USDC   |
//! | GET    | `/wallet/token-balance/:mint` | Balance of an arbitrary mint     |
//! | GET    | `/wallet/ata/list`            | Associated token accounts        |
//! | GET    | `/wallet/ata/:address/mint`   | Mint held by a token account     |
//! | GET    | `/token/metadata/:mint`       | Full token metadata              |
//! | GET    | `/token/name/:mint`           | Just the token name              |
//!
//! Failures are a generic `{ "error": "..." }` body: 404 when the chain has
//! no answer (missing account, missing metadata), 500 for everything else.
//! Malformed addresses in the path are 500s too; the service contract treats
//! any unanswerable request as an upstream failure.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use zenith_wallet::address::Pubkey;
use zenith_wallet::metadata::MetadataService;
use zenith_wallet::wallet::WalletService;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The gateway's reported version string.
    pub version: String,
    /// Which settings mode the gateway was started with.
    pub mode: String,
    /// The upstream node this gateway queries.
    pub rpc_url: String,
    /// Wallet queries (balances, token accounts).
    pub wallet: Arc<WalletService>,
    /// Token metadata queries.
    pub metadata: Arc<MetadataService>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// The returned router is ready to be served on the configured port.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/wallet/address", get(wallet_address_handler))
        .route("/wallet/balance", get(sol_balance_handler))
        .route("/wallet/balance/usdc", get(usdc_balance_handler))
        .route("/wallet/token-balance/:mint", get(token_balance_handler))
        .route("/wallet/ata/list", get(ata_list_handler))
        .route("/wallet/ata/:address/mint", get(ata_mint_handler))
        .route("/token/metadata/:mint", get(token_metadata_handler))
        .route("/token/name/:mint", get(token_name_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Gateway software version.
    pub version: String,
    /// Settings mode the gateway is running in.
    pub mode: String,
    /// Upstream RPC endpoint.
    pub rpc_url: String,
    /// The wallet address this gateway reads for.
    pub address: String,
    /// Mint reported as native SOL.
    pub sol_mint: String,
    /// Mint used by the USDC balance endpoint.
    pub usdc_mint: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Response payload for `GET /wallet/address`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddressResponse {
    /// Base58 wallet address.
    pub address: String,
}

/// Response payload for every balance endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Balance in whole tokens (SOL for the native endpoint).
    pub balance: f64,
}

/// Response payload for `GET /wallet/ata/list`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AtaListResponse {
    /// Base58 addresses of the wallet's token accounts.
    pub atas: Vec<String>,
}

/// Response payload for `GET /wallet/ata/:address/mint`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MintResponse {
    /// Base58 mint address.
    pub mint: String,
}

/// Response payload for `GET /token/name/:mint`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NameResponse {
    /// Token name from the metadata account.
    pub name: String,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the gateway is alive.
///
/// This is the liveness probe for orchestrators. It intentionally does not
/// touch the upstream node — that belongs in `/status` checks and alerts.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — returns the gateway's configuration summary.
///
/// Deliberately answers from local state only, so it stays useful when the
/// upstream node is the thing being debugged.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.http_requests_total.inc();

    let resp = StatusResponse {
        version: state.version.clone(),
        mode: state.mode.clone(),
        rpc_url: state.rpc_url.clone(),
        address: state.wallet.address().to_string(),
        sol_mint: state.wallet.sol_mint().to_string(),
        usdc_mint: state.wallet.usdc_mint().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    Json(resp)
}

/// `GET /wallet/address` — the wallet's public address.
async fn wallet_address_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.http_requests_total.inc();

    Json(AddressResponse {
        address: state.wallet.address().to_string(),
    })
}

/// `GET /wallet/balance` — native balance in SOL.
async fn sol_balance_handler(State(state): State<AppState>) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    match state.wallet.sol_balance().await {
        Ok(balance) => Json(BalanceResponse { balance }).into_response(),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get wallet balance: {e}"),
            )
        }
    }
}

/// `GET /wallet/balance/usdc` — balance of the configured USDC mint.
async fn usdc_balance_handler(State(state): State<AppState>) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    match state.wallet.usdc_balance().await {
        Ok(balance) => Json(BalanceResponse { balance }).into_response(),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get USDC balance: {e}"),
            )
        }
    }
}

/// `GET /wallet/token-balance/:mint` — balance of an arbitrary mint.
async fn token_balance_handler(
    Path(mint): Path<String>,
    State(state): State<AppState>,
) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    let result = match mint.parse::<Pubkey>() {
        Ok(mint) => state
            .wallet
            .token_balance(&mint)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(balance) => Json(BalanceResponse { balance }).into_response(),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get token balance: {e}"),
            )
        }
    }
}

/// `GET /wallet/ata/list` — all token accounts the wallet owns.
async fn ata_list_handler(State(state): State<AppState>) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    match state.wallet.token_accounts().await {
        Ok(accounts) => Json(AtaListResponse {
            atas: accounts.iter().map(|a| a.to_string()).collect(),
        })
        .into_response(),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get ATA list: {e}"),
            )
        }
    }
}

/// `GET /wallet/ata/:address/mint` — the mint a token account holds.
///
/// Returns 404 when the account does not exist on chain.
async fn ata_mint_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    let result = match address.parse::<Pubkey>() {
        Ok(account) => state.wallet.mint_of(&account).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(Some(mint)) => Json(MintResponse {
            mint: mint.to_string(),
        })
        .into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "Mint not found for this ATA".to_string(),
        ),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get token mint: {e}"),
            )
        }
    }
}

/// `GET /token/metadata/:mint` — full metadata for a mint.
///
/// Returns 404 when no metadata account exists for the mint.
async fn token_metadata_handler(
    Path(mint): Path<String>,
    State(state): State<AppState>,
) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    let result = match mint.parse::<Pubkey>() {
        Ok(mint) => state
            .metadata
            .token_metadata(&mint)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(Some(metadata)) => Json(metadata).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Metadata not found".to_string()),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get token metadata: {e}"),
            )
        }
    }
}

/// `GET /token/name/:mint` — just the token's name.
///
/// Returns 404 when no metadata account exists for the mint.
async fn token_name_handler(
    Path(mint): Path<String>,
    State(state): State<AppState>,
) -> Response {
    state.metrics.http_requests_total.inc();
    let _timer = state.metrics.upstream_latency_seconds.start_timer();

    let result = match mint.parse::<Pubkey>() {
        Ok(mint) => state
            .metadata
            .token_name(&mint)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(Some(name)) => Json(NameResponse { name }).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Token name not found".to_string()),
        Err(e) => {
            state.metrics.upstream_errors_total.inc();
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get token name: {e}"),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
