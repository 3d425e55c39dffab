//! # Settings
//!
//! Per-mode gateway configuration, loaded once at startup from a TOML file.
//! Each named mode (`dev`, `live`, whatever the deployment calls them) gets
//! its own table with an RPC endpoint, the wallet's secret key, and the two
//! mints the balance endpoints care about:
//!
//! ```toml
//! [networks.dev]
//! rpc_url = "https://api.devnet.solana.com"
//! wallet_secret_key = [174, 47, 154, ...]   # 64 bytes, seed ‖ public key
//! sol_mint = "So11111111111111111111111111111111111111112"
//! usdc_mint = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
//! ```
//!
//! Loading is strict: a malformed file or an unknown mode is an error here.
//! What to do about an unusable *key* is a policy decision that belongs to
//! the binary (dev setups fall back to a throwaway keypair; see the gateway's
//! `run` command), so [`NetworkSettings::keypair`] just reports the problem.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::address::Pubkey;
use crate::config::{USDC_MINT, WRAPPED_SOL_MINT};
use crate::keypair::{KeyError, WalletKeypair};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML (or is missing required fields).
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The requested mode has no `[networks.<mode>]` table.
    #[error("unknown mode {mode:?} (available: {available})")]
    UnknownMode {
        /// The mode that was asked for.
        mode: String,
        /// Comma-separated list of modes the file actually defines.
        available: String,
    },
}

/// The parsed settings file: one [`NetworkSettings`] per named mode.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Mode name → per-network configuration.
    pub networks: BTreeMap<String, NetworkSettings>,
}

/// Configuration for a single named mode.
#[derive(Deserialize)]
pub struct NetworkSettings {
    /// JSON-RPC endpoint of the Solana node to query.
    pub rpc_url: String,

    /// The wallet's 64-byte secret key (seed followed by public key), in the
    /// array format Solana tooling writes.
    pub wallet_secret_key: Vec<u8>,

    /// Mint reported by the SOL-flavored endpoints. Defaults to wrapped SOL.
    #[serde(default = "default_sol_mint")]
    pub sol_mint: Pubkey,

    /// Mint used by the `/wallet/balance/usdc` endpoint. Defaults to the
    /// mainnet USDC mint; devnet deployments will want to override it.
    #[serde(default = "default_usdc_mint")]
    pub usdc_mint: Pubkey,
}

fn default_sol_mint() -> Pubkey {
    WRAPPED_SOL_MINT
}

fn default_usdc_mint() -> Pubkey {
    USDC_MINT
}

impl Settings {
    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Look up the configuration for a mode.
    pub fn network(&self, mode: &str) -> Result<&NetworkSettings, SettingsError> {
        self.networks
            .get(mode)
            .ok_or_else(|| SettingsError::UnknownMode {
                mode: mode.to_string(),
                available: self
                    .networks
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl NetworkSettings {
    /// Build the wallet keypair from the configured secret key.
    ///
    /// Fails if the material is not 64 consistent bytes. Deciding whether
    /// that is fatal is the caller's job.
    pub fn keypair(&self) -> Result<WalletKeypair, KeyError> {
        WalletKeypair::from_secret_bytes(&self.wallet_secret_key)
    }
}

impl fmt::Debug for NetworkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The secret key is the one field that must never hit a log line.
        f.debug_struct("NetworkSettings")
            .field("rpc_url", &self.rpc_url)
            .field("wallet_secret_key", &"[redacted]")
            .field("sol_mint", &self.sol_mint)
            .field("usdc_mint", &self.usdc_mint)
            .finish()
    }
}

/// Render a starter settings file for `zenith-gateway init`.
///
/// The secret key is written in the same integer-array format Solana's own
/// keygen produces, so the two files stay interchangeable.
pub fn starter_toml(mode: &str, rpc_url: &str, secret_key: &[u8]) -> String {
    let key_list = secret_key
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[networks.{mode}]\n\
         rpc_url = \"{rpc_url}\"\n\
         wallet_secret_key = [{key_list}]\n\
         sol_mint = \"{}\"\n\
         usdc_mint = \"{}\"\n",
        WRAPPED_SOL_MINT, USDC_MINT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_secret() -> Vec<u8> {
        let kp = WalletKeypair::from_seed(&[0x11u8; 32]);
        let mut out = vec![0x11u8; 32];
        out.extend_from_slice(kp.pubkey().as_bytes());
        out
    }

    fn sample_toml() -> String {
        starter_toml("dev", "https://api.devnet.solana.com", &sample_secret())
    }

    #[test]
    fn starter_toml_parses_back() {
        let settings: Settings = toml::from_str(&sample_toml()).unwrap();
        let net = settings.network("dev").unwrap();
        assert_eq!(net.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(net.sol_mint, WRAPPED_SOL_MINT);
        assert_eq!(net.usdc_mint, USDC_MINT);
        assert_eq!(
            net.keypair().unwrap().pubkey().to_string(),
            "F25s3DdjXdCxYBhh2z8FBusVEMT4b9bGNFVKJi3wFoF4"
        );
    }

    #[test]
    fn unknown_mode_lists_what_exists() {
        let settings: Settings = toml::from_str(&sample_toml()).unwrap();
        let err = settings.network("live").unwrap_err();
        match err {
            SettingsError::UnknownMode { mode, available } => {
                assert_eq!(mode, "live");
                assert_eq!(available, "dev");
            }
            other => panic!("expected UnknownMode, got {other:?}"),
        }
    }

    #[test]
    fn mints_default_when_omitted() {
        let raw = "\
            [networks.dev]\n\
            rpc_url = \"http://localhost:8899\"\n\
            wallet_secret_key = []\n";
        let settings: Settings = toml::from_str(raw).unwrap();
        let net = settings.network("dev").unwrap();
        assert_eq!(net.sol_mint, WRAPPED_SOL_MINT);
        assert_eq!(net.usdc_mint, USDC_MINT);
    }

    #[test]
    fn short_key_surfaces_as_key_error() {
        let raw = "\
            [networks.dev]\n\
            rpc_url = \"http://localhost:8899\"\n\
            wallet_secret_key = [1, 2, 3]\n";
        let settings: Settings = toml::from_str(raw).unwrap();
        let net = settings.network("dev").unwrap();
        assert!(matches!(net.keypair(), Err(KeyError::BadLength(3))));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_toml().as_bytes()).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(settings.network("dev").is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn multiple_modes_coexist() {
        let raw = format!("{}\n{}", sample_toml(), {
            let mut live = sample_toml().replace("[networks.dev]", "[networks.live]");
            live = live.replace("devnet", "mainnet-beta");
            live
        });
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(settings.network("dev").is_ok());
        assert!(settings.network("live").is_ok());
    }

    #[test]
    fn debug_redacts_the_secret_key() {
        let settings: Settings = toml::from_str(&sample_toml()).unwrap();
        let s = format!("{:?}", settings.network("dev").unwrap());
        assert!(s.contains("[redacted]"));
        assert!(!s.contains("17, 17, 17")); // 0x11 bytes must not appear
    }
}
