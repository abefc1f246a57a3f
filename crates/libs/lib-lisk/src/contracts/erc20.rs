//! ERC-20 reads and the approve write for the settlement asset.

use alloy::primitives::{Address, TxHash, U256};
use tracing::{debug, info};

use crate::client::LiskClient;
use crate::contracts::IERC20;
use crate::error::{ChainError, Result};

/// Token balance of `owner`.
pub async fn balance_of(client: &LiskClient, token: Address, owner: Address) -> Result<U256> {
    let erc20 = IERC20::new(token, client.provider());
    let balance = erc20
        .balanceOf(owner)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("balanceOf failed: {}", e)))?;
    debug!("balanceOf({}) on {} = {}", owner, token, balance);
    Ok(balance)
}

/// Remaining amount `spender` may transfer on behalf of `owner`.
pub async fn allowance(
    client: &LiskClient,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256> {
    let erc20 = IERC20::new(token, client.provider());
    erc20
        .allowance(owner, spender)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("allowance failed: {}", e)))
}

/// Submit an approve transaction and return its hash without waiting for the
/// receipt.
pub async fn approve(
    client: &LiskClient,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TxHash> {
    client.require_signer()?;
    let erc20 = IERC20::new(token, client.provider());
    let pending = erc20
        .approve(spender, amount)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("approve failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("approve submitted: spender {} amount {} tx {}", spender, amount, hash);
    Ok(hash)
}
