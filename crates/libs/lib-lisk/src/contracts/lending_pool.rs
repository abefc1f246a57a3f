//! Depositor side of the protocol: pool deposits, withdrawals and balances.

use alloy::primitives::{Address, TxHash, U256};
use tracing::info;

use crate::client::LiskClient;
use crate::contracts::{Deployment, ILendingPool};
use crate::error::{ChainError, Result};

/// `owner`'s deposited pool balance.
pub async fn balance_of(
    client: &LiskClient,
    deployment: &Deployment,
    owner: Address,
) -> Result<U256> {
    let pool = ILendingPool::new(deployment.lending_pool, client.provider());
    pool.balanceOf(owner)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("pool balanceOf failed: {}", e)))
}

/// Total USDC deposited across all lenders.
pub async fn total_deposits(client: &LiskClient, deployment: &Deployment) -> Result<U256> {
    let pool = ILendingPool::new(deployment.lending_pool, client.provider());
    pool.totalDeposits()
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("totalDeposits failed: {}", e)))
}

/// Submit a pool deposit. Requires a prior allowance for the pool.
pub async fn deposit(
    client: &LiskClient,
    deployment: &Deployment,
    amount: U256,
) -> Result<TxHash> {
    client.require_signer()?;
    let pool = ILendingPool::new(deployment.lending_pool, client.provider());
    let pending = pool
        .deposit(amount)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("pool deposit failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("pool deposit submitted: amount {} tx {}", amount, hash);
    Ok(hash)
}

/// Submit a pool withdrawal of `amount` base units.
pub async fn withdraw(
    client: &LiskClient,
    deployment: &Deployment,
    amount: U256,
) -> Result<TxHash> {
    client.require_signer()?;
    let pool = ILendingPool::new(deployment.lending_pool, client.provider());
    let pending = pool
        .withdraw(amount)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("pool withdraw failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("pool withdraw submitted: amount {} tx {}", amount, hash);
    Ok(hash)
}
