//! Restricted-wallet surface: allowlist reads, balances, and the constrained
//! write operations (proxy execute, withdrawals, single-hop swaps).

use alloy::primitives::{aliases::U24, Address, Bytes, FixedBytes, TxHash, U256};
use tracing::{debug, info};

use crate::client::LiskClient;
use crate::contracts::IRestrictedWallet;
use crate::error::{ChainError, Result};

/// Parameters for a single-hop exact-input swap routed through the
/// restricted wallet.
#[derive(Debug, Clone, Copy)]
pub struct SwapParams {
    pub router: Address,
    pub token_in: Address,
    pub token_out: Address,
    /// Pool fee in hundredths of a bip (500 / 3000 / 10000).
    pub fee: u32,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Unix seconds after which the router must reject the swap.
    pub deadline: u64,
}

/// Token balance held inside the restricted wallet.
pub async fn get_balance(client: &LiskClient, wallet: Address, token: Address) -> Result<U256> {
    let rw = IRestrictedWallet::new(wallet, client.provider());
    let balance = rw
        .getBalance(token)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("getBalance failed: {}", e)))?;
    debug!("restricted wallet {} holds {} of {}", wallet, balance, token);
    Ok(balance)
}

/// Whether the wallet may call into `target` at all.
pub async fn is_target_approved(
    client: &LiskClient,
    wallet: Address,
    target: Address,
) -> Result<bool> {
    let rw = IRestrictedWallet::new(wallet, client.provider());
    rw.isTargetApproved(target)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("isTargetApproved failed: {}", e)))
}

/// Whether the wallet may invoke a function with this 4-byte selector.
pub async fn is_selector_approved(
    client: &LiskClient,
    wallet: Address,
    selector: [u8; 4],
) -> Result<bool> {
    let rw = IRestrictedWallet::new(wallet, client.provider());
    rw.isSelectorApproved(FixedBytes::from(selector))
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("isSelectorApproved failed: {}", e)))
}

/// Whether `token` is on the wallet's token whitelist.
pub async fn is_token_whitelisted(
    client: &LiskClient,
    wallet: Address,
    token: Address,
) -> Result<bool> {
    let rw = IRestrictedWallet::new(wallet, client.provider());
    rw.isTokenWhitelisted(token)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("isTokenWhitelisted failed: {}", e)))
}

/// Submit a raw proxy call through the wallet. The ledger rejects targets,
/// selectors and tokens outside the allowlists.
pub async fn execute(
    client: &LiskClient,
    wallet: Address,
    target: Address,
    data: Bytes,
) -> Result<TxHash> {
    client.require_signer()?;
    let rw = IRestrictedWallet::new(wallet, client.provider());
    let pending = rw
        .execute(target, data)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("execute failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("restricted execute submitted: target {} tx {}", target, hash);
    Ok(hash)
}

/// Submit a withdrawal of `amount` of `token` back to the owner.
pub async fn withdraw(
    client: &LiskClient,
    wallet: Address,
    token: Address,
    amount: U256,
) -> Result<TxHash> {
    client.require_signer()?;
    let rw = IRestrictedWallet::new(wallet, client.provider());
    let pending = rw
        .withdraw(token, amount)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("restricted withdraw failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("restricted withdraw submitted: token {} amount {} tx {}", token, amount, hash);
    Ok(hash)
}

/// Submit a withdrawal of the wallet's entire balance of `token`.
pub async fn withdraw_all(client: &LiskClient, wallet: Address, token: Address) -> Result<TxHash> {
    client.require_signer()?;
    let rw = IRestrictedWallet::new(wallet, client.provider());
    let pending = rw
        .withdrawAll(token)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("restricted withdrawAll failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("restricted withdrawAll submitted: token {} tx {}", token, hash);
    Ok(hash)
}

/// Submit a single-hop exact-input swap through the wallet.
pub async fn swap_exact_input_single(
    client: &LiskClient,
    wallet: Address,
    params: SwapParams,
) -> Result<TxHash> {
    client.require_signer()?;
    let rw = IRestrictedWallet::new(wallet, client.provider());
    let pending = rw
        .swapExactInputSingle(
            params.router,
            params.token_in,
            params.token_out,
            U24::from(params.fee),
            params.amount_in,
            params.amount_out_minimum,
            U256::from(params.deadline),
        )
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("swapExactInputSingle failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!(
        "swap submitted: {} -> {} amount {} min out {} tx {}",
        params.token_in, params.token_out, params.amount_in, params.amount_out_minimum, hash
    );
    Ok(hash)
}
