//! # Keypair Loading
//!
//! The one module in this crate allowed to hold secret material. The gateway
//! only ever *reads* chain state, but it still needs the keypair to know
//! which wallet it is reading for: the public half becomes the address every
//! query hangs off.
//!
//! Solana tooling stores secret keys as 64 bytes, the 32-byte Ed25519 seed
//! followed by the 32-byte public key. The public half is redundant (it is
//! recomputed from the seed), which makes it a free consistency check. A
//! truncated or spliced key file fails loudly here instead of silently
//! serving balances for the wrong wallet.
//!
//! Key bytes are never logged. If you add logging to this module, you will
//! be asked to leave.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::address::Pubkey;
use crate::config::{SECRET_KEY_LENGTH, SEED_LENGTH};

/// Errors that can occur while constructing a keypair.
///
/// Intentionally vague about *why* material was rejected — leaking details
/// about key bytes through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The secret key material is not the expected 64 bytes.
    #[error("invalid secret key: expected 64 bytes, got {0}")]
    BadLength(usize),

    /// The embedded public key does not match the one derived from the seed.
    #[error("secret key is inconsistent: embedded public key does not match the seed")]
    KeypairMismatch,
}

/// An Ed25519 wallet keypair.
///
/// No `Serialize`/`Deserialize`: exporting secret material should be a
/// deliberate act, not something that happens because a keypair ended up
/// inside a response struct.
pub struct WalletKeypair {
    signing_key: SigningKey,
}

impl WalletKeypair {
    /// Load a keypair from the 64-byte Solana secret-key format
    /// (seed followed by public key).
    ///
    /// The public half is recomputed from the seed and compared against the
    /// embedded copy; a mismatch means the material was corrupted or
    /// assembled from two different keys, and is rejected.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::BadLength(bytes.len()));
        }

        let mut seed = [0u8; SEED_LENGTH];
        seed.copy_from_slice(&bytes[..SEED_LENGTH]);
        let signing_key = SigningKey::from_bytes(&seed);

        if signing_key.verifying_key().to_bytes()[..] != bytes[SEED_LENGTH..] {
            return Err(KeyError::KeypairMismatch);
        }

        Ok(Self { signing_key })
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// **Warning**: a weak seed makes a weak key. Only hand this bytes that
    /// came from a CSPRNG or a proper KDF.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Generate a fresh keypair from the OS cryptographic RNG.
    ///
    /// Used as the dev-mode fallback when the configured key material is
    /// unusable: the service stays up, pointed at a throwaway wallet.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The wallet's public address.
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Export the 64-byte secret-key format (seed followed by public key).
    ///
    /// **Handle with extreme care.** This exists for `init`-style tooling
    /// that writes key files; nothing on a request path should ever call it.
    pub fn to_secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut out = [0u8; SECRET_KEY_LENGTH];
        out[..SEED_LENGTH].copy_from_slice(&self.signing_key.to_bytes());
        out[SEED_LENGTH..].copy_from_slice(&self.signing_key.verifying_key().to_bytes());
        out
    }
}

impl fmt::Debug for WalletKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material in debug output. Not even "partially."
        write!(f, "WalletKeypair(pub={})", self.pubkey())
    }
}
