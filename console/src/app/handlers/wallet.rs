//! Restricted-wallet fund movement: withdrawals and raw proxy calls.
//!
//! Everything here settles against the wallet bound to the signer's loan
//! record, and all of it is blocked while the loan is active; the wallet's
//! funds collateralize the open position until repayment.

use alloy::primitives::{Address, Bytes, TxHash};
use lib_lisk::{decimal_to_units, format_units, LoanInfo};

use crate::app::handlers::{require_signer, submit_tracked};
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};
use crate::trading::{calc, tokens};

/// Resolve the signer's restricted wallet and check the loan is settled.
async fn bound_inactive_wallet(dash: &Dashboard, owner: Address) -> Result<(LoanInfo, Address)> {
    let loan = dash.ledger.loan_info(owner).await?;
    let wallet = loan.bound_wallet().ok_or_else(|| {
        AppError::Validation(
            "no restricted wallet bound to this account; open a loan first".to_string(),
        )
    })?;
    if loan.is_active {
        return Err(AppError::LoanStillActive);
    }
    Ok((loan, wallet))
}

/// Withdraw `amount_text` of a token from the restricted wallet to its owner.
pub async fn withdraw(dash: &Dashboard, token_sym: &str, amount_text: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let token = tokens::find(token_sym)
        .ok_or_else(|| AppError::Validation(format!("unknown token: {}", token_sym)))?;
    let amount = calc::validate_positive(amount_text)?;
    let units = decimal_to_units(amount, token.decimals)?;

    let (_, wallet) = bound_inactive_wallet(dash, owner).await?;

    let held = dash.ledger.restricted_balance(wallet, token.address).await?;
    if !calc::has_sufficient_balance(held, units) {
        return Err(AppError::InsufficientRestrictedBalance(format!(
            "withdrawing {} {} but the restricted wallet holds {}",
            amount,
            token.symbol,
            format_units(held, token.decimals),
        )));
    }

    let mut refetch = vec![ReadKey::RestrictedBalance {
        wallet,
        token: token.address,
    }];
    if token.address == dash.ledger.deployment().usdc {
        refetch.push(ReadKey::UsdcBalance);
    }

    submit_tracked(
        dash,
        TxAction::Withdraw,
        refetch,
        dash.ledger.restricted_withdraw(wallet, token.address, units),
    )
    .await
}

/// Withdraw the restricted wallet's entire balance of a token.
pub async fn withdraw_all(dash: &Dashboard, token_sym: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let token = tokens::find(token_sym)
        .ok_or_else(|| AppError::Validation(format!("unknown token: {}", token_sym)))?;

    let (_, wallet) = bound_inactive_wallet(dash, owner).await?;

    let held = dash.ledger.restricted_balance(wallet, token.address).await?;
    if held.is_zero() {
        return Err(AppError::InsufficientRestrictedBalance(format!(
            "the restricted wallet holds no {}",
            token.symbol
        )));
    }

    let mut refetch = vec![ReadKey::RestrictedBalance {
        wallet,
        token: token.address,
    }];
    if token.address == dash.ledger.deployment().usdc {
        refetch.push(ReadKey::UsdcBalance);
    }

    submit_tracked(
        dash,
        TxAction::WithdrawAll,
        refetch,
        dash.ledger.restricted_withdraw_all(wallet, token.address),
    )
    .await
}

/// Proxy an arbitrary call through the restricted wallet.
///
/// The wallet contract enforces its allowlists on chain regardless; checking
/// the target and selector here first turns a doomed submission into an
/// instant local error.
pub async fn execute_call(dash: &Dashboard, target_text: &str, data_hex: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let target: Address = target_text
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid target address: {}", target_text)))?;
    let data: Bytes = data_hex
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid hex calldata: {}", data_hex)))?;

    let (_, wallet) = bound_inactive_wallet(dash, owner).await?;

    if !dash.ledger.is_target_approved(wallet, target).await? {
        return Err(AppError::Validation(format!(
            "target {} is not approved for this restricted wallet",
            target
        )));
    }
    if data.len() >= 4 {
        let selector = [data[0], data[1], data[2], data[3]];
        if !dash.ledger.is_selector_approved(wallet, selector).await? {
            return Err(AppError::Validation(format!(
                "selector 0x{} is not approved for this restricted wallet",
                alloy::hex::encode(selector)
            )));
        }
    }

    submit_tracked(
        dash,
        TxAction::Execute,
        vec![ReadKey::RestrictedBalance {
            wallet,
            token: dash.ledger.deployment().usdc,
        }],
        dash.ledger.restricted_execute(wallet, target, data),
    )
    .await
}
