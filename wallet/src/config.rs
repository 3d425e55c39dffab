//! # Well-Known Constants
//!
//! Every magic number and magic address in Zenith lives here. If you're
//! hardcoding a program id somewhere else, you're doing it wrong and you
//! owe the team coffee.
//!
//! The program ids are stored pre-decoded as 32-byte arrays because Base58
//! cannot be decoded in a `const` context. Each one has a round-trip test
//! below pinning it to its canonical Base58 form, so a stray byte cannot
//! survive review.

use crate::address::Pubkey;

// ---------------------------------------------------------------------------
// Program Ids
// ---------------------------------------------------------------------------

/// SPL Token program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`.
/// Owns every fungible-token account this service will ever list.
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// Associated Token Account program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`.
/// The deriving authority for every wallet's canonical token accounts.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

/// Token Metadata program: `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`.
/// Both a seed and the deriving authority for metadata addresses.
pub const METADATA_PROGRAM_ID: Pubkey = Pubkey::new([
    0x0b, 0x70, 0x65, 0xb1, 0xe3, 0xd1, 0x7c, 0x45, 0x38, 0x9d, 0x52, 0x7f, 0x6b, 0x04, 0xc3,
    0xcd, 0x58, 0xb8, 0x6c, 0x73, 0x1a, 0xa0, 0xfd, 0xb5, 0x49, 0xb6, 0xd1, 0xbc, 0x03, 0xf8,
    0x29, 0x46,
]);

// ---------------------------------------------------------------------------
// Well-Known Mints
// ---------------------------------------------------------------------------

/// Wrapped SOL mint: `So11111111111111111111111111111111111111112`.
/// The default `sol_mint` when a settings file doesn't override it.
pub const WRAPPED_SOL_MINT: Pubkey = Pubkey::new([
    0x06, 0x9b, 0x88, 0x57, 0xfe, 0xab, 0x81, 0x84, 0xfb, 0x68, 0x7f, 0x63, 0x46, 0x18, 0xc0,
    0x35, 0xda, 0xc4, 0x39, 0xdc, 0x1a, 0xeb, 0x3b, 0x55, 0x98, 0xa0, 0xf0, 0x00, 0x00, 0x00,
    0x00, 0x01,
]);

/// Mainnet USDC mint: `EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v`.
/// Devnet and testnet use different mints; set them in the settings file.
pub const USDC_MINT: Pubkey = Pubkey::new([
    0xc6, 0xfa, 0x7a, 0xf3, 0xbe, 0xdb, 0xad, 0x3a, 0x3d, 0x65, 0xf3, 0x6a, 0xab, 0xc9, 0x74,
    0x31, 0xb1, 0xbb, 0xe4, 0xc2, 0xd2, 0xf6, 0xe0, 0xe4, 0x7c, 0xa6, 0x02, 0x03, 0x45, 0x2f,
    0x5d, 0x61,
]);

// ---------------------------------------------------------------------------
// Units & Limits
// ---------------------------------------------------------------------------

/// Lamports per SOL. 10^9, same relationship as satoshis to bitcoin, and
/// just as easy to get wrong by three orders of magnitude in a UI.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Solana secret-key files carry 64 bytes: the 32-byte Ed25519 seed followed
/// by the 32-byte public key. Anything else is not a Solana keypair.
pub const SECRET_KEY_LENGTH: usize = 64;

/// Ed25519 seeds and public keys are 32 bytes each.
pub const SEED_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default port for the gateway's REST API.
pub const DEFAULT_GATEWAY_PORT: u16 = 3001;

/// Default port for the Prometheus metrics endpoint.
pub const DEFAULT_METRICS_PORT: u16 = 3002;

/// Default settings-file mode when neither the CLI flag nor `ZENITH_MODE`
/// says otherwise.
pub const DEFAULT_MODE: &str = "dev";

#[cfg(test)]
mod tests {
    use super::*;

    // Each constant is pinned to its canonical Base58 form. If one of these
    // fails, a byte was fat-fingered and nothing downstream can be trusted.

    #[test]
    fn token_program_id_roundtrip() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn associated_token_program_id_roundtrip() {
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn metadata_program_id_roundtrip() {
        assert_eq!(
            METADATA_PROGRAM_ID.to_string(),
            "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"
        );
    }

    #[test]
    fn wrapped_sol_mint_roundtrip() {
        assert_eq!(
            WRAPPED_SOL_MINT.to_string(),
            "So11111111111111111111111111111111111111112"
        );
    }

    #[test]
    fn usdc_mint_roundtrip() {
        assert_eq!(
            USDC_MINT.to_string(),
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
        );
    }

    #[test]
    fn lamport_conversion_is_one_billion() {
        assert_eq!(LAMPORTS_PER_SOL, 10u64.pow(9));
    }

    #[test]
    fn key_lengths_compose() {
        // seed + public key = secret key file. If this breaks, Ed25519 broke.
        assert_eq!(SEED_LENGTH * 2, SECRET_KEY_LENGTH);
    }
}
