//! # Token Metadata
//!
//! [`MetadataService`] resolves a mint to its on-chain metadata: derive the
//! metadata account address (a PDA under the metadata program), fetch the
//! account, and parse the layout by hand.
//!
//! The account layout is Borsh-serialized: a one-byte kind tag, the update
//! authority, the mint, then three length-prefixed strings (name, symbol,
//! uri). The on-chain program writes the strings at fixed capacity and pads
//! them with NULs, so parsing must trim trailing zeros or every name comes
//! back with a tail of `\0`.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::address::Pubkey;
use crate::pda::{derive_metadata_address, PdaError};
use crate::rpc::{RpcError, SolanaRpc};

/// kind tag ‖ update authority ‖ mint precede the string section.
const STRINGS_OFFSET: usize = 1 + 32 + 32;

/// Offset of the mint field within the account.
const MINT_OFFSET: usize = 1 + 32;

/// Errors that can occur during metadata lookups.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The node could not be reached or rejected the query.
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    /// Deriving the metadata address failed.
    #[error("derivation error: {0}")]
    Derivation(#[from] PdaError),

    /// The metadata account exists but its data does not parse.
    #[error("malformed metadata account {account}: {reason}")]
    Malformed {
        /// The metadata account whose data was rejected.
        account: Pubkey,
        /// What exactly did not parse.
        reason: String,
    },
}

/// Parsed token metadata, shaped like the gateway's JSON response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    /// Token name, NUL-padding stripped.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Off-chain metadata URI.
    pub uri: String,
    /// The mint this metadata describes.
    pub mint: Pubkey,
    /// The metadata account the fields were read from.
    pub metadata_address: Pubkey,
}

/// Metadata lookups against the chain.
pub struct MetadataService {
    rpc: Arc<dyn SolanaRpc>,
}

impl MetadataService {
    /// Build the service around an RPC handle.
    pub fn new(rpc: Arc<dyn SolanaRpc>) -> Self {
        Self { rpc }
    }

    /// The metadata account address for a mint.
    pub fn metadata_address(&self, mint: &Pubkey) -> Result<Pubkey, MetadataError> {
        Ok(derive_metadata_address(mint)?)
    }

    /// Full metadata for a mint, or `None` when no metadata account exists.
    pub async fn token_metadata(
        &self,
        mint: &Pubkey,
    ) -> Result<Option<TokenMetadata>, MetadataError> {
        let address = self.metadata_address(mint)?;

        let Some(account) = self.rpc.get_account(&address).await? else {
            tracing::debug!(%mint, %address, "no metadata account for mint");
            return Ok(None);
        };

        let (name, symbol, uri) = parse_metadata(&account.data, mint)
            .map_err(|reason| MetadataError::Malformed { account: address, reason })?;

        Ok(Some(TokenMetadata {
            name,
            symbol,
            uri,
            mint: *mint,
            metadata_address: address,
        }))
    }

    /// Just the token's name, or `None` when no metadata account exists.
    pub async fn token_name(&self, mint: &Pubkey) -> Result<Option<String>, MetadataError> {
        Ok(self.token_metadata(mint).await?.map(|m| m.name))
    }
}

/// Parse `(name, symbol, uri)` out of a metadata account.
///
/// The embedded mint must match the mint the address was derived from; a
/// mismatch means the parse offsets are wrong or the account is not what it
/// claims to be, and either way the data cannot be trusted.
fn parse_metadata(data: &[u8], mint: &Pubkey) -> Result<(String, String, String), String> {
    if data.len() < STRINGS_OFFSET {
        return Err(format!(
            "data is {} bytes, header needs {STRINGS_OFFSET}",
            data.len()
        ));
    }

    if &data[MINT_OFFSET..MINT_OFFSET + 32] != mint.as_bytes() {
        return Err("embedded mint does not match the queried mint".into());
    }

    let (name, offset) = read_string(data, STRINGS_OFFSET)?;
    let (symbol, offset) = read_string(data, offset)?;
    let (uri, _) = read_string(data, offset)?;
    Ok((name, symbol, uri))
}

/// Read one length-prefixed, NUL-padded string. Returns the string and the
/// offset just past it.
fn read_string(data: &[u8], offset: usize) -> Result<(String, usize), String> {
    let end_of_len = offset
        .checked_add(4)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| format!("truncated string length at offset {offset}"))?;

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&data[offset..end_of_len]);
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = end_of_len
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| format!("string at offset {offset} overruns the account"))?;

    let bytes = &data[end_of_len..end];
    let trimmed = match bytes.iter().rposition(|b| *b != 0) {
        Some(last) => &bytes[..=last],
        None => &[],
    };

    let value = std::str::from_utf8(trimmed)
        .map_err(|e| format!("string at offset {offset} is not UTF-8: {e}"))?
        .to_string();
    Ok((value, end))
}
