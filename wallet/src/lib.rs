// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Zenith Wallet — Core Library
//!
//! The SDK layer behind the Zenith gateway: everything needed to read a
//! Solana wallet's world without ever being able to spend from it. The crate
//! loads keys and answers queries. That is the entire threat surface, on
//! purpose.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! read-only wallet service:
//!
//! - **config** — Well-known program ids, mints, and constants. One home.
//! - **address** — The 32-byte `Pubkey` and its Base58 clothing.
//! - **keypair** — Ed25519 key loading. The only module that touches secrets.
//! - **pda** — Program-derived-address search. The one real algorithm here.
//! - **settings** — Per-mode TOML configuration (rpc url, key, mints).
//! - **rpc** — The JSON-RPC 2.0 client that talks to a Solana node.
//! - **wallet** — Balance and token-account queries for the loaded wallet.
//! - **metadata** — Token metadata lookups via the metadata program.
//!
//! ## Design Philosophy
//!
//! 1. Read-only by construction: there is no signing path to misuse.
//! 2. The network lives behind a trait, so every service is testable offline.
//! 3. Wire formats are parsed by hand and documented; no black-box SDKs.

pub mod address;
pub mod config;
pub mod keypair;
pub mod metadata;
pub mod pda;
pub mod rpc;
pub mod settings;
pub mod wallet;

pub use address::Pubkey;
pub use keypair::WalletKeypair;
pub use metadata::{MetadataService, TokenMetadata};
pub use pda::find_program_address;
pub use rpc::{HttpRpcClient, SolanaRpc};
pub use settings::Settings;
pub use wallet::WalletService;
