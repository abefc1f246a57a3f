//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use lib_lisk::{Deployment, LoanInfo, Network, Result, SwapParams, TxOutcome};

/// Trait for every ledger interaction the application performs.
///
/// The production implementation ([`crate::services::ledger::ChainLedger`])
/// drives a JSON-RPC provider; tests substitute an in-memory mock so the
/// orchestration layer can be exercised without a network.
///
/// Write methods submit and return the transaction hash without waiting for
/// inclusion; confirmation is a separate concern handled through
/// [`wait_for_receipt`](LedgerService::wait_for_receipt) so callers can track
/// a pending action while the receipt is still outstanding.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Network this ledger targets.
    fn network(&self) -> Network;

    /// Deployed contract addresses.
    fn deployment(&self) -> &Deployment;

    /// Address of the configured signer; `None` in read-only mode.
    fn signer_address(&self) -> Option<Address>;

    /// Verify connectivity and chain-id agreement; returns the chain id.
    async fn health_check(&self) -> Result<u64>;

    // -- Reads

    /// USDC balance of `owner`.
    async fn usdc_balance(&self, owner: Address) -> Result<U256>;

    /// Remaining USDC `spender` may move on behalf of `owner`.
    async fn usdc_allowance(&self, owner: Address, spender: Address) -> Result<U256>;

    /// Loan record for `user` (zeroed record when no loan history).
    async fn loan_info(&self, user: Address) -> Result<LoanInfo>;

    /// Margin the ledger requires for a position of `amount`.
    async fn required_margin(&self, amount: U256) -> Result<U256>;

    /// Pool share of a position of `amount`.
    async fn pool_funding(&self, amount: U256) -> Result<U256>;

    /// `owner`'s deposited lending-pool balance.
    async fn pool_balance(&self, owner: Address) -> Result<U256>;

    /// Total USDC deposited across all lenders.
    async fn pool_total_deposits(&self) -> Result<U256>;

    /// Token balance held inside a restricted wallet.
    async fn restricted_balance(&self, wallet: Address, token: Address) -> Result<U256>;

    /// Whether the restricted wallet may call into `target`.
    async fn is_target_approved(&self, wallet: Address, target: Address) -> Result<bool>;

    /// Whether the restricted wallet may invoke this 4-byte selector.
    async fn is_selector_approved(&self, wallet: Address, selector: [u8; 4]) -> Result<bool>;

    /// Whether `token` is on the restricted wallet's whitelist.
    async fn is_token_whitelisted(&self, wallet: Address, token: Address) -> Result<bool>;

    // -- Writes (submit, return the transaction hash)

    /// Approve `spender` to move `amount` USDC for the signer.
    async fn approve_usdc(&self, spender: Address, amount: U256) -> Result<TxHash>;

    /// Open a loan for a position of `amount` base units.
    async fn create_loan(&self, amount: U256) -> Result<TxHash>;

    /// Repay the signer's active loan.
    async fn repay_loan(&self) -> Result<TxHash>;

    /// Deposit `amount` USDC into the lending pool.
    async fn pool_deposit(&self, amount: U256) -> Result<TxHash>;

    /// Withdraw `amount` USDC from the lending pool.
    async fn pool_withdraw(&self, amount: U256) -> Result<TxHash>;

    /// Proxy a raw call through the restricted wallet.
    async fn restricted_execute(
        &self,
        wallet: Address,
        target: Address,
        data: Bytes,
    ) -> Result<TxHash>;

    /// Withdraw `amount` of `token` from the restricted wallet to its owner.
    async fn restricted_withdraw(
        &self,
        wallet: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash>;

    /// Withdraw the restricted wallet's entire balance of `token`.
    async fn restricted_withdraw_all(&self, wallet: Address, token: Address) -> Result<TxHash>;

    /// Single-hop exact-input swap routed through the restricted wallet.
    async fn swap_exact_input(&self, wallet: Address, params: SwapParams) -> Result<TxHash>;

    // -- Confirmation

    /// Poll until the transaction lands or the configured timeout elapses.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxOutcome>;
}
