// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Zenith Gateway
//!
//! Entry point for the `zenith-gateway` binary. Parses CLI arguments,
//! initializes logging and metrics, builds the wallet context, and serves
//! the REST API.
//!
//! The binary supports four subcommands:
//!
//! - `run`     — start the gateway
//! - `init`    — write a starter settings file with a fresh keypair
//! - `status`  — query a running gateway's status endpoint
//! - `version` — print build version information
//!
//! The wallet context (keypair, RPC client, services) is constructed fully
//! before anything binds a socket, so the tests exercise the same
//! construction path. No global state, no initialization order puzzles.

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use zenith_wallet::rpc::SolanaRpc;
use zenith_wallet::settings::{self, Settings};
use zenith_wallet::{HttpRpcClient, MetadataService, WalletKeypair, WalletService};

use cli::{Commands, ZenithCli};
use logging::LogFormat;
use metrics::GatewayMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ZenithCli::parse();

    match cli.command {
        Commands::Run(args) => run_gateway(args).await,
        Commands::Init(args) => init_gateway(args),
        Commands::Status(args) => query_status(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the gateway: REST API server plus the metrics endpoint.
async fn run_gateway(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "zenith_gateway=info,zenith_wallet=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        config = %args.config.display(),
        mode = %args.mode,
        port = args.port,
        metrics_port = args.metrics_port,
        "starting zenith-gateway"
    );

    // --- Settings ---
    let settings = Settings::load(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    let network = settings
        .network(&args.mode)
        .with_context(|| format!("mode {:?} not present in settings", args.mode))?;

    // --- Keypair ---
    // A broken key in the settings file is survivable in development: warn
    // and point the gateway at a throwaway wallet instead of refusing to
    // start. Every balance served after this line belongs to a wallet
    // nobody funded.
    let keypair = match network.keypair() {
        Ok(kp) => kp,
        Err(e) => {
            tracing::warn!(
                "configured wallet key is unusable ({e}); falling back to an ephemeral keypair"
            );
            WalletKeypair::generate()
        }
    };

    // --- RPC client + services ---
    let rpc: Arc<dyn SolanaRpc> = Arc::new(HttpRpcClient::new(network.rpc_url.clone()));
    let wallet = Arc::new(WalletService::new(
        keypair,
        Arc::clone(&rpc),
        network.sol_mint,
        network.usdc_mint,
    ));
    let metadata = Arc::new(MetadataService::new(rpc));
    let node_metrics = Arc::new(GatewayMetrics::new());

    tracing::info!(address = %wallet.address(), rpc_url = %network.rpc_url, "wallet context ready");

    // Initial balance snapshot. Failures are logged, not fatal; the node
    // may simply not be reachable yet.
    match wallet.sol_balance().await {
        Ok(balance) => tracing::info!(balance, "SOL balance"),
        Err(e) => tracing::warn!("could not fetch SOL balance: {e}"),
    }
    match wallet.usdc_balance().await {
        Ok(balance) => tracing::info!(balance, "USDC balance"),
        Err(e) => tracing::warn!("could not fetch USDC balance: {e}"),
    }

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: args.mode.clone(),
        rpc_url: network.rpc_url.clone(),
        wallet,
        metadata,
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("REST API listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("zenith-gateway stopped");
    Ok(())
}

/// Writes a starter settings file with a freshly generated keypair.
fn init_gateway(args: cli::InitArgs) -> Result<()> {
    logging::init_logging("zenith_gateway=info", LogFormat::Pretty);

    if args.config.exists() && !args.force {
        bail!(
            "settings file {} already exists (pass --force to overwrite)",
            args.config.display()
        );
    }

    if let Some(parent) = args.config.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let keypair = WalletKeypair::generate();
    let contents = settings::starter_toml(&args.mode, &args.rpc_url, &keypair.to_secret_bytes());
    std::fs::write(&args.config, contents)
        .with_context(|| format!("failed to write settings to {}", args.config.display()))?;

    // The file holds a secret key; restrict permissions on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&args.config, std::fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!(
        address = %keypair.pubkey(),
        config = %args.config.display(),
        "settings file written"
    );

    println!("Gateway initialized successfully.");
    println!("  Settings file  : {}", args.config.display());
    println!("  Mode           : {}", args.mode);
    println!("  RPC endpoint   : {}", args.rpc_url);
    println!("  Wallet address : {}", keypair.pubkey());

    Ok(())
}

/// Queries a running gateway's status endpoint and prints the result.
async fn query_status(args: cli::StatusArgs) -> Result<()> {
    let url = format!("{}/status", args.gateway_url.trim_end_matches('/'));
    let body = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {}", url))?
        .error_for_status()?
        .text()
        .await?;
    println!("{}", body);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("zenith-gateway {}", env!("CARGO_PKG_VERSION"));
    println!("rustc          {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
