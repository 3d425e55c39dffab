//! # Wallet Queries
//!
//! [`WalletService`] answers every "how much does this wallet hold" question
//! the gateway exposes. It owns the loaded keypair and a handle to the RPC
//! layer, and is constructed once at startup, explicitly, away from the
//! HTTP lifecycle, so tests can hand it a mock chain and never open a socket.
//!
//! Balance semantics follow the token programs, not our preferences:
//! a wallet's balance for a mint lives in its associated token account, and
//! a missing account simply means zero, because wallets that never touched a token
//! should not produce errors.

use std::sync::Arc;
use thiserror::Error;

use crate::address::Pubkey;
use crate::config::{LAMPORTS_PER_SOL, TOKEN_PROGRAM_ID};
use crate::keypair::WalletKeypair;
use crate::pda::{derive_associated_token_address, PdaError};
use crate::rpc::{RpcError, SolanaRpc};

/// SPL token accounts start with the mint address.
const TOKEN_ACCOUNT_MINT_LEN: usize = 32;

/// Errors that can occur during wallet queries.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The node could not be reached or rejected the query.
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    /// Deriving the associated token account failed.
    #[error("derivation error: {0}")]
    Derivation(#[from] PdaError),

    /// An account exists but its data does not parse as a token account.
    #[error("malformed token account {account}: {reason}")]
    MalformedAccount {
        /// The account whose data was rejected.
        account: Pubkey,
        /// What exactly did not parse.
        reason: String,
    },
}

/// Read-only queries against a single wallet.
pub struct WalletService {
    keypair: WalletKeypair,
    rpc: Arc<dyn SolanaRpc>,
    sol_mint: Pubkey,
    usdc_mint: Pubkey,
}

impl WalletService {
    /// Build the service around a loaded keypair and an RPC handle.
    pub fn new(
        keypair: WalletKeypair,
        rpc: Arc<dyn SolanaRpc>,
        sol_mint: Pubkey,
        usdc_mint: Pubkey,
    ) -> Self {
        Self {
            keypair,
            rpc,
            sol_mint,
            usdc_mint,
        }
    }

    /// The wallet's public address.
    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// The configured native-SOL mint (reported by `/status`).
    pub fn sol_mint(&self) -> Pubkey {
        self.sol_mint
    }

    /// The configured USDC mint.
    pub fn usdc_mint(&self) -> Pubkey {
        self.usdc_mint
    }

    /// Native balance in SOL.
    pub async fn sol_balance(&self) -> Result<f64, WalletError> {
        let lamports = self.rpc.get_balance(&self.address()).await?;
        Ok(lamports as f64 / LAMPORTS_PER_SOL as f64)
    }

    /// Balance of the configured USDC mint.
    pub async fn usdc_balance(&self) -> Result<f64, WalletError> {
        self.token_balance(&self.usdc_mint).await
    }

    /// Balance of an arbitrary mint, scaled by the mint's own decimals.
    ///
    /// Resolves the wallet's associated token account for the mint and asks
    /// the node for its balance. No account means the wallet never held the
    /// token: the balance is zero, not an error.
    pub async fn token_balance(&self, mint: &Pubkey) -> Result<f64, WalletError> {
        let ata = derive_associated_token_address(&self.address(), mint)?;

        if self.rpc.get_account(&ata).await?.is_none() {
            tracing::debug!(%mint, %ata, "no token account for mint, balance is zero");
            return Ok(0.0);
        }

        let amount = self.rpc.get_token_account_balance(&ata).await?;
        Ok(amount.ui_amount())
    }

    /// All token accounts the wallet owns under the SPL token program.
    pub async fn token_accounts(&self) -> Result<Vec<Pubkey>, WalletError> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(&self.address(), &TOKEN_PROGRAM_ID)
            .await?;
        Ok(accounts)
    }

    /// The mint a token account holds, or `None` when the account does not
    /// exist.
    pub async fn mint_of(&self, token_account: &Pubkey) -> Result<Option<Pubkey>, WalletError> {
        let Some(account) = self.rpc.get_account(token_account).await? else {
            return Ok(None);
        };

        if account.data.len() < TOKEN_ACCOUNT_MINT_LEN {
            return Err(WalletError::MalformedAccount {
                account: *token_account,
                reason: format!(
                    "data is {} bytes, mint field needs {}",
                    account.data.len(),
                    TOKEN_ACCOUNT_MINT_LEN
                ),
            });
        }

        let mut mint = [0u8; 32];
        mint.copy_from_slice(&account.data[..TOKEN_ACCOUNT_MINT_LEN]);
        Ok(Some(Pubkey::new(mint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{Account, TokenAmount};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// An in-memory chain: exactly the accounts and balances a test installs.
    #[derive(Default)]
    struct MockRpc {
        balances: HashMap<Pubkey, u64>,
        accounts: HashMap<Pubkey, Account>,
        token_accounts: Vec<Pubkey>,
        token_balances: HashMap<Pubkey, TokenAmount>,
    }

    #[async_trait]
    impl SolanaRpc for MockRpc {
        async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
            Ok(self.balances.get(pubkey).copied().unwrap_or(0))
        }

        async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError> {
            Ok(self.accounts.get(pubkey).cloned())
        }

        async fn get_token_accounts_by_owner(
            &self,
            _owner: &Pubkey,
            _program: &Pubkey,
        ) -> Result<Vec<Pubkey>, RpcError> {
            Ok(self.token_accounts.clone())
        }

        async fn get_token_account_balance(
            &self,
            account: &Pubkey,
        ) -> Result<TokenAmount, RpcError> {
            self.token_balances.get(account).copied().ok_or(RpcError::Node {
                code: -32602,
                message: "could not find account".into(),
            })
        }
    }

    fn service(rpc: MockRpc) -> WalletService {
        WalletService::new(
            WalletKeypair::from_seed(&[0x11u8; 32]),
            Arc::new(rpc),
            crate::config::WRAPPED_SOL_MINT,
            crate::config::USDC_MINT,
        )
    }

    fn token_account_data(mint: &Pubkey) -> Vec<u8> {
        // mint ‖ owner ‖ amount ‖ padding up to the SPL account size
        let mut data = mint.as_bytes().to_vec();
        data.extend_from_slice(&[0u8; 133]);
        data
    }

    #[tokio::test]
    async fn sol_balance_converts_lamports() {
        let mut rpc = MockRpc::default();
        let address = WalletKeypair::from_seed(&[0x11u8; 32]).pubkey();
        rpc.balances.insert(address, 2_500_000_000);

        let svc = service(rpc);
        assert!((svc.sol_balance().await.unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn token_balance_for_missing_account_is_zero() {
        let svc = service(MockRpc::default());
        let balance = svc.token_balance(&Pubkey::new([0xAA; 32])).await.unwrap();
        assert_eq!(balance, 0.0);
    }

    #[tokio::test]
    async fn token_balance_scales_by_mint_decimals() {
        let mint = Pubkey::new([0xAA; 32]);
        let owner = WalletKeypair::from_seed(&[0x11u8; 32]).pubkey();
        let ata = derive_associated_token_address(&owner, &mint).unwrap();

        let mut rpc = MockRpc::default();
        rpc.accounts.insert(
            ata,
            Account {
                lamports: 2_039_280,
                owner: TOKEN_PROGRAM_ID,
                data: token_account_data(&mint),
            },
        );
        rpc.token_balances.insert(
            ata,
            TokenAmount {
                amount: 12_340_000,
                decimals: 6,
            },
        );

        let svc = service(rpc);
        assert!((svc.token_balance(&mint).await.unwrap() - 12.34).abs() < 1e-9);
    }

    #[tokio::test]
    async fn usdc_balance_uses_the_configured_mint() {
        let owner = WalletKeypair::from_seed(&[0x11u8; 32]).pubkey();
        let ata = derive_associated_token_address(&owner, &crate::config::USDC_MINT).unwrap();

        let mut rpc = MockRpc::default();
        rpc.accounts.insert(
            ata,
            Account {
                lamports: 2_039_280,
                owner: TOKEN_PROGRAM_ID,
                data: token_account_data(&crate::config::USDC_MINT),
            },
        );
        rpc.token_balances.insert(
            ata,
            TokenAmount {
                amount: 500_000,
                decimals: 6,
            },
        );

        let svc = service(rpc);
        assert!((svc.usdc_balance().await.unwrap() - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn token_accounts_lists_what_the_node_reports() {
        let mut rpc = MockRpc::default();
        rpc.token_accounts = vec![Pubkey::new([1; 32]), Pubkey::new([2; 32])];

        let svc = service(rpc);
        let accounts = svc.token_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0], Pubkey::new([1; 32]));
    }

    #[tokio::test]
    async fn mint_of_reads_the_first_32_bytes() {
        let mint = Pubkey::new([0xBB; 32]);
        let token_account = Pubkey::new([0x01; 32]);

        let mut rpc = MockRpc::default();
        rpc.accounts.insert(
            token_account,
            Account {
                lamports: 2_039_280,
                owner: TOKEN_PROGRAM_ID,
                data: token_account_data(&mint),
            },
        );

        let svc = service(rpc);
        assert_eq!(svc.mint_of(&token_account).await.unwrap(), Some(mint));
    }

    #[tokio::test]
    async fn mint_of_missing_account_is_none() {
        let svc = service(MockRpc::default());
        let result = svc.mint_of(&Pubkey::new([0x01; 32])).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn mint_of_rejects_truncated_data() {
        let token_account = Pubkey::new([0x01; 32]);
        let mut rpc = MockRpc::default();
        rpc.accounts.insert(
            token_account,
            Account {
                lamports: 1,
                owner: TOKEN_PROGRAM_ID,
                data: vec![0u8; 16],
            },
        );

        let svc = service(rpc);
        assert!(matches!(
            svc.mint_of(&token_account).await,
            Err(WalletError::MalformedAccount { .. })
        ));
    }
}
