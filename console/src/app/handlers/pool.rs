//! Lending-pool commands: approve, deposit, withdraw.

use alloy::primitives::{TxHash, U256};
use lib_lisk::{decimal_to_units, format_units, USDC_DECIMALS};

use crate::app::handlers::{require_signer, submit_tracked};
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};
use crate::trading::calc;

/// Grant the lending pool an unlimited USDC allowance.
pub async fn approve_pool(dash: &Dashboard) -> Result<TxHash> {
    require_signer(dash)?;
    let spender = dash.ledger.deployment().lending_pool;

    submit_tracked(
        dash,
        TxAction::Approve,
        vec![ReadKey::Allowance { spender }],
        dash.ledger.approve_usdc(spender, U256::MAX),
    )
    .await
}

/// Deposit `amount_text` USDC into the lending pool.
pub async fn deposit(dash: &Dashboard, amount_text: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let amount = calc::validate_positive(amount_text)?;
    let units = decimal_to_units(amount, USDC_DECIMALS)?;

    let spender = dash.ledger.deployment().lending_pool;
    let allowance = dash.ledger.usdc_allowance(owner, spender).await?;
    if calc::needs_approval(units, allowance) {
        return Err(AppError::ApprovalRequired(format!(
            "lending pool may spend {} USDC but needs {}; run `approve pool` first",
            format_units(allowance, USDC_DECIMALS),
            format_units(units, USDC_DECIMALS),
        )));
    }

    let balance = dash.ledger.usdc_balance(owner).await?;
    if !calc::has_sufficient_balance(balance, units) {
        return Err(AppError::InsufficientBalance(format!(
            "depositing {} USDC but wallet holds {}",
            format_units(units, USDC_DECIMALS),
            format_units(balance, USDC_DECIMALS),
        )));
    }

    submit_tracked(
        dash,
        TxAction::Deposit,
        vec![
            ReadKey::UsdcBalance,
            ReadKey::PoolBalance,
            ReadKey::PoolTotalDeposits,
            ReadKey::Allowance { spender },
        ],
        dash.ledger.pool_deposit(units),
    )
    .await
}

/// Withdraw `amount_text` USDC from the lending pool.
pub async fn withdraw(dash: &Dashboard, amount_text: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let amount = calc::validate_positive(amount_text)?;
    let units = decimal_to_units(amount, USDC_DECIMALS)?;

    let deposited = dash.ledger.pool_balance(owner).await?;
    if !calc::has_sufficient_balance(deposited, units) {
        return Err(AppError::InsufficientBalance(format!(
            "withdrawing {} USDC but only {} is deposited",
            format_units(units, USDC_DECIMALS),
            format_units(deposited, USDC_DECIMALS),
        )));
    }

    submit_tracked(
        dash,
        TxAction::PoolWithdraw,
        vec![
            ReadKey::UsdcBalance,
            ReadKey::PoolBalance,
            ReadKey::PoolTotalDeposits,
        ],
        dash.ledger.pool_withdraw(units),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dashboard_with, owner, MockLedger};
    use std::sync::Arc;

    fn usdc(n: u64) -> U256 {
        U256::from(n) * U256::from(1_000_000u64)
    }

    #[tokio::test]
    async fn test_deposit_blocked_until_approved() {
        let mock = Arc::new(MockLedger::new());
        mock.set_usdc_balance(owner(), usdc(500));
        let dash = dashboard_with(mock.clone());

        let err = deposit(&dash, "100").await.unwrap_err();
        assert!(matches!(err, AppError::ApprovalRequired(_)));
        assert!(!mock.called("pool_deposit"));
    }

    #[tokio::test]
    async fn test_deposit_checks_balance() {
        let mock = Arc::new(MockLedger::new());
        mock.set_allowance(owner(), mock.deployment().lending_pool, U256::MAX);
        mock.set_usdc_balance(owner(), usdc(50));
        let dash = dashboard_with(mock.clone());

        let err = deposit(&dash, "100").await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance(_)));

        deposit(&dash, "50").await.unwrap();
        assert!(mock.called("pool_deposit(50000000)"));
    }

    #[tokio::test]
    async fn test_withdraw_checks_deposited_balance() {
        let mock = Arc::new(MockLedger::new());
        mock.set_pool_balance(owner(), usdc(30));
        let dash = dashboard_with(mock.clone());

        let err = withdraw(&dash, "31").await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance(_)));

        withdraw(&dash, "30").await.unwrap();
        assert!(mock.called("pool_withdraw(30000000)"));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() {
        let mock = Arc::new(MockLedger::new());
        let dash = dashboard_with(mock);

        assert!(deposit(&dash, "0").await.is_err());
        assert!(deposit(&dash, "-5").await.is_err());
        assert!(withdraw(&dash, "nope").await.is_err());
    }
}
