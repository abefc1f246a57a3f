//! # Chain Ledger
//!
//! Live [`LedgerService`] implementation backed by the Lisk RPC via
//! `lib-lisk`. This is the only place that knows which contract a given
//! read or write lands on; everything above it speaks in terms of the
//! service trait so tests can swap in a mock ledger.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use lib_lisk::client::LiskClient;
use lib_lisk::contracts::{erc20, lending_pool, loan_manager, restricted_wallet};
use lib_lisk::{ChainError, Deployment, LoanInfo, Network, SwapParams, TxOutcome};
use tracing::info;

use crate::config::Config;
use crate::core::LedgerService;

/// Ledger adapter holding the RPC client and the protocol's deployment.
pub struct ChainLedger {
    client: LiskClient,
    deployment: Deployment,
    receipt_poll: Duration,
    receipt_timeout: Duration,
}

impl ChainLedger {
    /// Build a client for the configured network and look up the protocol
    /// deployment there.
    ///
    /// Fails when the network has no deployment (mainnet, for now) or the
    /// RPC URL / private key are malformed. Does not touch the network;
    /// connectivity is checked later via [`LedgerService::health_check`].
    pub fn connect(config: &Config) -> lib_lisk::Result<Self> {
        let deployment = Deployment::for_network(config.network).ok_or_else(|| {
            ChainError::Config(format!(
                "no protocol deployment on {}",
                config.network.label()
            ))
        })?;

        let mut builder = LiskClient::builder().network(config.network);
        if let Some(url) = &config.rpc_url {
            builder = builder.rpc_url(url.clone());
        }
        if let Some(key) = &config.private_key {
            builder = builder.private_key(key.clone());
        }
        let client = builder.build()?;

        info!(
            network = config.network.label(),
            read_only = client.signer_address().is_none(),
            "ledger adapter ready"
        );

        Ok(Self {
            client,
            deployment,
            receipt_poll: config.receipt_poll,
            receipt_timeout: config.receipt_timeout,
        })
    }
}

#[async_trait]
impl LedgerService for ChainLedger {
    fn network(&self) -> Network {
        self.client.network()
    }

    fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    fn signer_address(&self) -> Option<Address> {
        self.client.signer_address()
    }

    async fn health_check(&self) -> lib_lisk::Result<u64> {
        self.client.health_check().await
    }

    async fn usdc_balance(&self, owner: Address) -> lib_lisk::Result<U256> {
        erc20::balance_of(&self.client, self.deployment.usdc, owner).await
    }

    async fn usdc_allowance(&self, owner: Address, spender: Address) -> lib_lisk::Result<U256> {
        erc20::allowance(&self.client, self.deployment.usdc, owner, spender).await
    }

    async fn loan_info(&self, user: Address) -> lib_lisk::Result<LoanInfo> {
        loan_manager::get_loan_info(&self.client, &self.deployment, user).await
    }

    async fn required_margin(&self, amount: U256) -> lib_lisk::Result<U256> {
        loan_manager::get_required_margin(&self.client, &self.deployment, amount).await
    }

    async fn pool_funding(&self, amount: U256) -> lib_lisk::Result<U256> {
        loan_manager::get_pool_funding(&self.client, &self.deployment, amount).await
    }

    async fn pool_balance(&self, owner: Address) -> lib_lisk::Result<U256> {
        lending_pool::balance_of(&self.client, &self.deployment, owner).await
    }

    async fn pool_total_deposits(&self) -> lib_lisk::Result<U256> {
        lending_pool::total_deposits(&self.client, &self.deployment).await
    }

    async fn restricted_balance(&self, wallet: Address, token: Address) -> lib_lisk::Result<U256> {
        restricted_wallet::get_balance(&self.client, wallet, token).await
    }

    async fn is_target_approved(&self, wallet: Address, target: Address) -> lib_lisk::Result<bool> {
        restricted_wallet::is_target_approved(&self.client, wallet, target).await
    }

    async fn is_selector_approved(
        &self,
        wallet: Address,
        selector: [u8; 4],
    ) -> lib_lisk::Result<bool> {
        restricted_wallet::is_selector_approved(&self.client, wallet, selector).await
    }

    async fn is_token_whitelisted(&self, wallet: Address, token: Address) -> lib_lisk::Result<bool> {
        restricted_wallet::is_token_whitelisted(&self.client, wallet, token).await
    }

    async fn approve_usdc(&self, spender: Address, amount: U256) -> lib_lisk::Result<TxHash> {
        erc20::approve(&self.client, self.deployment.usdc, spender, amount).await
    }

    async fn create_loan(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        loan_manager::create_loan(&self.client, &self.deployment, amount).await
    }

    async fn repay_loan(&self) -> lib_lisk::Result<TxHash> {
        loan_manager::repay_loan(&self.client, &self.deployment).await
    }

    async fn pool_deposit(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        lending_pool::deposit(&self.client, &self.deployment, amount).await
    }

    async fn pool_withdraw(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        lending_pool::withdraw(&self.client, &self.deployment, amount).await
    }

    async fn restricted_execute(
        &self,
        wallet: Address,
        target: Address,
        data: Bytes,
    ) -> lib_lisk::Result<TxHash> {
        restricted_wallet::execute(&self.client, wallet, target, data).await
    }

    async fn restricted_withdraw(
        &self,
        wallet: Address,
        token: Address,
        amount: U256,
    ) -> lib_lisk::Result<TxHash> {
        restricted_wallet::withdraw(&self.client, wallet, token, amount).await
    }

    async fn restricted_withdraw_all(
        &self,
        wallet: Address,
        token: Address,
    ) -> lib_lisk::Result<TxHash> {
        restricted_wallet::withdraw_all(&self.client, wallet, token).await
    }

    async fn swap_exact_input(
        &self,
        wallet: Address,
        params: SwapParams,
    ) -> lib_lisk::Result<TxHash> {
        restricted_wallet::swap_exact_input_single(&self.client, wallet, params).await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> lib_lisk::Result<TxOutcome> {
        self.client
            .wait_for_receipt(hash, self.receipt_poll, self.receipt_timeout)
            .await
    }
}
