//! # Solana JSON-RPC Client
//!
//! The gateway's only window onto the chain. Four read-only JSON-RPC 2.0
//! methods, wrapped behind the [`SolanaRpc`] trait so every consumer can be
//! tested against a mock instead of a live node. The network is a
//! collaborator here, not a dependency.
//!
//! Account data travels base64-encoded and is decoded to raw bytes before it
//! leaves this module; callers parse layouts, not encodings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::address::Pubkey;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by RPC calls.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The HTTP request itself failed (connect, timeout, non-2xx status).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("node returned error {code}: {message}")]
    Node {
        /// Numeric JSON-RPC error code.
        code: i64,
        /// Human-readable error description from the node.
        message: String,
    },

    /// The node's response did not have the shape we were promised.
    #[error("malformed response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Result Types
// ---------------------------------------------------------------------------

/// A fetched on-chain account, with its data already base64-decoded.
#[derive(Debug, Clone)]
pub struct Account {
    /// Balance of the account itself, in lamports.
    pub lamports: u64,
    /// The program that owns this account.
    pub owner: Pubkey,
    /// Raw account data. Layout depends on the owning program.
    pub data: Vec<u8>,
}

/// A token amount as the node reports it: raw base units plus the mint's
/// decimal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    /// Amount in the token's smallest unit.
    pub amount: u64,
    /// Number of decimals the mint defines.
    pub decimals: u8,
}

impl TokenAmount {
    /// The human-facing amount: base units scaled down by the mint's
    /// decimals. `1_500_000` at 6 decimals is `1.5`.
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

// ---------------------------------------------------------------------------
// The Trait
// ---------------------------------------------------------------------------

/// The read-only slice of the Solana RPC surface this service needs.
///
/// Kept deliberately small: four methods is the entire contract between the
/// gateway and the chain, and a mock fits on one screen.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Lamport balance of an address (`getBalance`).
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError>;

    /// Fetch an account (`getAccountInfo`). `None` when it does not exist.
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError>;

    /// Addresses of all token accounts owned by `owner` under `program`
    /// (`getTokenAccountsByOwner`).
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program: &Pubkey,
    ) -> Result<Vec<Pubkey>, RpcError>;

    /// Balance of an existing token account (`getTokenAccountBalance`).
    async fn get_token_account_balance(
        &self,
        account: &Pubkey,
    ) -> Result<TokenAmount, RpcError>;
}

// ---------------------------------------------------------------------------
// Wire Types
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// A JSON-RPC 2.0 response envelope. Exactly one of `result`/`error` is
/// populated by a conforming node.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Solana wraps most results in `{ context, value }`; we only ever want the
/// value.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// `getAccountInfo` account shape with base64 encoding requested.
#[derive(Debug, Deserialize)]
struct RawAccount {
    lamports: u64,
    owner: String,
    /// `[data, encoding]` pair; the encoding tag echoes what we asked for.
    data: (String, String),
}

/// One entry of a `getTokenAccountsByOwner` listing.
#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
}

/// `getTokenAccountBalance` value shape. The node stringifies the raw
/// amount because u64 does not survive every JSON parser.
#[derive(Debug, Deserialize)]
struct RawTokenAmount {
    amount: String,
    decimals: u8,
}

fn decode_account(raw: RawAccount) -> Result<Account, RpcError> {
    let owner = raw
        .owner
        .parse::<Pubkey>()
        .map_err(|e| RpcError::Malformed(format!("bad owner pubkey: {e}")))?;
    let data = base64::decode(&raw.data.0)
        .map_err(|e| RpcError::Malformed(format!("bad account data: {e}")))?;
    Ok(Account {
        lamports: raw.lamports,
        owner,
        data,
    })
}

fn decode_token_amount(raw: RawTokenAmount) -> Result<TokenAmount, RpcError> {
    let amount = raw
        .amount
        .parse::<u64>()
        .map_err(|e| RpcError::Malformed(format!("bad token amount {:?}: {e}", raw.amount)))?;
    Ok(TokenAmount {
        amount,
        decimals: raw.decimals,
    })
}

// ---------------------------------------------------------------------------
// HTTP Implementation
// ---------------------------------------------------------------------------

/// [`SolanaRpc`] over HTTP, one POST per call.
///
/// Request ids are a process-local counter; they only need to be unique per
/// connection, and we never pipeline.
pub struct HttpRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client for the given node endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, "rpc call");

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        let result = response.result.ok_or_else(|| {
            RpcError::Malformed("response carries neither result nor error".into())
        })?;
        serde_json::from_value(result).map_err(|e| RpcError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl SolanaRpc for HttpRpcClient {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        let wrapped: WithContext<u64> = self
            .call("getBalance", json!([pubkey.to_string()]))
            .await?;
        Ok(wrapped.value)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError> {
        let wrapped: WithContext<Option<RawAccount>> = self
            .call(
                "getAccountInfo",
                json!([pubkey.to_string(), { "encoding": "base64" }]),
            )
            .await?;
        wrapped.value.map(decode_account).transpose()
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program: &Pubkey,
    ) -> Result<Vec<Pubkey>, RpcError> {
        let wrapped: WithContext<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "programId": program.to_string() },
                    { "encoding": "base64" }
                ]),
            )
            .await?;

        wrapped
            .value
            .into_iter()
            .map(|entry| {
                entry
                    .pubkey
                    .parse::<Pubkey>()
                    .map_err(|e| RpcError::Malformed(format!("bad token account pubkey: {e}")))
            })
            .collect()
    }

    async fn get_token_account_balance(
        &self,
        account: &Pubkey,
    ) -> Result<TokenAmount, RpcError> {
        let wrapped: WithContext<RawTokenAmount> = self
            .call("getTokenAccountBalance", json!([account.to_string()]))
            .await?;
        decode_token_amount(wrapped.value)
    }
}
