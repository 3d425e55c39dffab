//! # CLI Interface
//!
//! Defines the command-line argument structure for `zenith-gateway` using
//! `clap` derive. Supports four subcommands: `run`, `init`, `status`,
//! and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use zenith_wallet::config::{DEFAULT_GATEWAY_PORT, DEFAULT_METRICS_PORT, DEFAULT_MODE};

/// Zenith wallet gateway.
///
/// A read-only HTTP facade over a Solana wallet: balances, associated token
/// accounts, and token metadata, served as JSON. It holds a keypair but
/// never signs with it; the secret key only determines *which* wallet the
/// gateway reads.
#[derive(Parser, Debug)]
#[command(
    name = "zenith-gateway",
    about = "Read-only Solana wallet gateway",
    version,
    propagate_version = true
)]
pub struct ZenithCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the gateway binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway.
    Run(RunArgs),
    /// Write a starter settings file with a freshly generated keypair.
    Init(InitArgs),
    /// Query the status of a running gateway.
    Status(StatusArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the settings file (TOML).
    #[arg(
        long,
        short = 'c',
        env = "ZENITH_CONFIG",
        default_value = "config/zenith.toml"
    )]
    pub config: PathBuf,

    /// Which `[networks.<mode>]` table of the settings file to use.
    #[arg(long, short = 'm', env = "ZENITH_MODE", default_value = DEFAULT_MODE)]
    pub mode: String,

    /// Port for the REST API.
    #[arg(long, env = "ZENITH_PORT", default_value_t = DEFAULT_GATEWAY_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "ZENITH_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "ZENITH_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `init` subcommand.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the settings file.
    #[arg(
        long,
        short = 'c',
        env = "ZENITH_CONFIG",
        default_value = "config/zenith.toml"
    )]
    pub config: PathBuf,

    /// Mode name for the generated `[networks.<mode>]` table.
    #[arg(long, default_value = DEFAULT_MODE)]
    pub mode: String,

    /// RPC endpoint to write into the settings file.
    #[arg(long, default_value = "https://api.devnet.solana.com")]
    pub rpc_url: String,

    /// Overwrite an existing settings file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Base URL of the running gateway.
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    pub gateway_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        ZenithCli::command().debug_assert();
    }
}
