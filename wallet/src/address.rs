//! # Addresses
//!
//! A Solana address is a Base58-encoded 32-byte value, usually an Ed25519
//! public key, sometimes a program-derived address that deliberately is not
//! one. There is no hashing step and no checksum beyond what Base58 decoding
//! gives you for free, so [`Pubkey`] is a thin newtype: 32 bytes plus the
//! encoding rituals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing an address string.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The string is not valid Base58.
    #[error("base58 decode failed: {0}")]
    Base58(String),

    /// The decoded payload is not exactly 32 bytes.
    #[error("expected 32 bytes, got {0}")]
    BadLength(usize),
}

/// A 32-byte Solana address.
///
/// Displays and serializes as its canonical Base58 string; that is the only
/// form users, config files, and the JSON-RPC wire ever see. The raw bytes
/// are for hashing and derivation, nothing else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    /// Wrap raw bytes as an address. `const` so program ids can live in
    /// `config.rs` as compile-time constants.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a Base58 address string.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Base58(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AddressError::BadLength(v.len()))?;
        Ok(Self(arr))
    }

    /// The canonical Base58 encoding.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// The raw 32 bytes, for hashing and seed concatenation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.to_base58())
    }
}

impl FromStr for Pubkey {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl TryFrom<String> for Pubkey {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_base58(&s)
    }
}

impl From<Pubkey> for String {
    fn from(pk: Pubkey) -> Self {
        pk.to_base58()
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The System Program address is 32 zero bytes, which encodes to a run
    /// of Base58 ones.
    #[test]
    fn system_program_address() {
        let zeros = Pubkey::new([0u8; 32]);
        assert_eq!(zeros.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn roundtrip_encode_decode() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let pk = Pubkey::from_base58(address).unwrap();
        assert_eq!(pk.to_base58(), address);
    }

    #[test]
    fn known_bytes_encode_as_expected() {
        let pk = Pubkey::new([0x42u8; 32]);
        assert_eq!(pk.to_string(), "5TeWSsjg2gbxCyWVniXeCmwM7UtHTCK7svzJr5xYJzHf");
    }

    #[test]
    fn garbage_returns_error() {
        assert!(matches!(
            Pubkey::from_base58("not-a-valid-address!!!"),
            Err(AddressError::Base58(_))
        ));
    }

    #[test]
    fn too_short_returns_error() {
        // "1" decodes to a single zero byte, which is not 32 bytes.
        assert!(matches!(
            Pubkey::from_base58("1"),
            Err(AddressError::BadLength(1))
        ));
    }

    #[test]
    fn from_str_matches_from_base58() {
        let s = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
        let a: Pubkey = s.parse().unwrap();
        let b = Pubkey::from_base58(s).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serde_uses_base58_strings() {
        let pk = Pubkey::new([0x42u8; 32]);
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, "\"5TeWSsjg2gbxCyWVniXeCmwM7UtHTCK7svzJr5xYJzHf\"");

        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn serde_rejects_malformed_strings() {
        assert!(serde_json::from_str::<Pubkey>("\"zz!!\"").is_err());
    }

    #[test]
    fn debug_shows_base58_not_bytes() {
        let pk = Pubkey::new([0u8; 32]);
        assert_eq!(format!("{:?}", pk), "Pubkey(11111111111111111111111111111111)");
    }
}
