//! Loan lifecycle: per-user loan record reads plus create/repay writes.

use alloy::primitives::{Address, TxHash, U256};
use tracing::{debug, info};

use crate::client::LiskClient;
use crate::contracts::{Deployment, ILoanManager};
use crate::error::{ChainError, Result};

/// A user's loan record as reported by the LoanManager.
///
/// `restricted_wallet` stays populated after repayment so leftover funds can
/// still be withdrawn from the wallet; `is_active` alone says whether the loan
/// is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanInfo {
    pub loan_amount: U256,
    pub margin_amount: U256,
    pub pool_funding: U256,
    /// Unix seconds of loan activation.
    pub start_time: u64,
    pub restricted_wallet: Address,
    pub is_active: bool,
}

impl LoanInfo {
    /// Whether a restricted wallet has ever been bound to this record.
    pub fn has_restricted_wallet(&self) -> bool {
        self.restricted_wallet != Address::ZERO
    }

    /// The bound restricted wallet, if any.
    pub fn bound_wallet(&self) -> Option<Address> {
        if self.has_restricted_wallet() {
            Some(self.restricted_wallet)
        } else {
            None
        }
    }

    /// Total position size funded by margin plus pool.
    pub fn position_size(&self) -> U256 {
        self.margin_amount.saturating_add(self.pool_funding)
    }
}

/// Fetch the loan record for `user`. A user with no loan history gets a
/// zeroed record with `is_active == false`.
pub async fn get_loan_info(
    client: &LiskClient,
    deployment: &Deployment,
    user: Address,
) -> Result<LoanInfo> {
    let lm = ILoanManager::new(deployment.loan_manager, client.provider());
    let ret = lm
        .getLoanInfo(user)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("getLoanInfo failed: {}", e)))?;

    let info = LoanInfo {
        loan_amount: ret.loanAmount,
        margin_amount: ret.marginAmount,
        pool_funding: ret.poolFunding,
        start_time: ret.startTime.saturating_to::<u64>(),
        restricted_wallet: ret.restrictedWallet,
        is_active: ret.isActive,
    };
    debug!("loan info for {}: {:?}", user, info);
    Ok(info)
}

/// Margin the ledger requires for a position of `amount`.
pub async fn get_required_margin(
    client: &LiskClient,
    deployment: &Deployment,
    amount: U256,
) -> Result<U256> {
    let lm = ILoanManager::new(deployment.loan_manager, client.provider());
    lm.getRequiredMargin(amount)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("getRequiredMargin failed: {}", e)))
}

/// Pool share of a position of `amount`.
pub async fn get_pool_funding(
    client: &LiskClient,
    deployment: &Deployment,
    amount: U256,
) -> Result<U256> {
    let lm = ILoanManager::new(deployment.loan_manager, client.provider());
    lm.getPoolFunding(amount)
        .call()
        .await
        .map_err(|e| ChainError::Contract(format!("getPoolFunding failed: {}", e)))
}

/// Submit a createLoan transaction for a position of `amount` base units.
pub async fn create_loan(
    client: &LiskClient,
    deployment: &Deployment,
    amount: U256,
) -> Result<TxHash> {
    client.require_signer()?;
    let lm = ILoanManager::new(deployment.loan_manager, client.provider());
    let pending = lm
        .createLoan(amount)
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("createLoan failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("createLoan submitted: amount {} tx {}", amount, hash);
    Ok(hash)
}

/// Submit a repayLoan transaction for the signer's active loan.
pub async fn repay_loan(client: &LiskClient, deployment: &Deployment) -> Result<TxHash> {
    client.require_signer()?;
    let lm = ILoanManager::new(deployment.loan_manager, client.provider());
    let pending = lm
        .repayLoan()
        .send()
        .await
        .map_err(|e| ChainError::Contract(format!("repayLoan failed: {}", e)))?;
    let hash = *pending.tx_hash();
    info!("repayLoan submitted: tx {}", hash);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn sample(active: bool, wallet: Address) -> LoanInfo {
        LoanInfo {
            loan_amount: U256::from(1_000_000_000u64),
            margin_amount: U256::from(200_000_000u64),
            pool_funding: U256::from(800_000_000u64),
            start_time: 1_700_000_000,
            restricted_wallet: wallet,
            is_active: active,
        }
    }

    #[test]
    fn test_bound_wallet() {
        let wallet = address!("a7e82b23460233c71e8553387b2d870003a34a50");
        assert_eq!(sample(true, wallet).bound_wallet(), Some(wallet));
        assert_eq!(sample(false, wallet).bound_wallet(), Some(wallet));
        assert_eq!(sample(true, Address::ZERO).bound_wallet(), None);
        assert!(!sample(false, Address::ZERO).has_restricted_wallet());
    }

    #[test]
    fn test_position_size() {
        let info = sample(true, Address::ZERO);
        assert_eq!(info.position_size(), U256::from(1_000_000_000u64));
    }
}
