//! Restricted-wallet swaps: local quoting plus the guarded submission.

use alloy::primitives::{TxHash, U256};
use lib_lisk::{decimal_to_units, SwapParams};
use lib_utils::time::unix_now;
use rust_decimal::Decimal;

use crate::app::handlers::{require_signer, submit_tracked};
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};
use crate::trading::calc::{self, DEFAULT_SWAP_VALIDITY};
use crate::trading::tokens::{self, FeeTier, Token};

/// Fully derived swap, ready to submit.
#[derive(Debug, Clone)]
pub struct SwapPlan {
    pub token_in: &'static Token,
    pub token_out: &'static Token,
    pub amount_in: Decimal,
    pub amount_in_units: U256,
    /// Worst acceptable output under the slippage tolerance.
    pub min_out: Decimal,
    pub min_out_units: U256,
    pub fee: FeeTier,
    /// Unix seconds after which the router must reject the swap.
    pub deadline: u64,
}

/// Derive a swap plan from user input. Pure apart from reading the clock.
pub fn quote(
    token_in_sym: &str,
    token_out_sym: &str,
    amount_text: &str,
    slippage_pct: Decimal,
) -> Result<SwapPlan> {
    let token_in = tokens::find(token_in_sym)
        .ok_or_else(|| AppError::Validation(format!("unknown token: {}", token_in_sym)))?;
    let token_out = tokens::find(token_out_sym)
        .ok_or_else(|| AppError::Validation(format!("unknown token: {}", token_out_sym)))?;
    if token_in.address == token_out.address {
        return Err(AppError::Validation(
            "cannot swap a token for itself".to_string(),
        ));
    }

    let amount_in = calc::validate_positive(amount_text)?;
    calc::validate_slippage(slippage_pct)?;

    let min_out = calc::min_amount_out(
        amount_in,
        token_in.price(),
        token_out.price(),
        slippage_pct,
        token_out.decimals,
    );

    Ok(SwapPlan {
        token_in,
        token_out,
        amount_in,
        amount_in_units: decimal_to_units(amount_in, token_in.decimals)?,
        min_out,
        min_out_units: decimal_to_units(min_out, token_out.decimals)?,
        fee: tokens::recommended_fee_tier(token_in, token_out),
        deadline: calc::swap_deadline(unix_now(), DEFAULT_SWAP_VALIDITY),
    })
}

/// Swap inside the restricted wallet.
///
/// Only possible once the loan is repaid: the restricted wallet exists (a
/// loan has been opened at some point), the loan is no longer active, both
/// tokens are on the wallet's whitelist and the wallet holds the input
/// amount.
pub async fn swap(
    dash: &Dashboard,
    token_in_sym: &str,
    token_out_sym: &str,
    amount_text: &str,
    slippage_pct: Decimal,
) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let plan = quote(token_in_sym, token_out_sym, amount_text, slippage_pct)?;

    let loan = dash.ledger.loan_info(owner).await?;
    let wallet = loan.bound_wallet().ok_or_else(|| {
        AppError::Validation(
            "no restricted wallet bound to this account; open a loan first".to_string(),
        )
    })?;
    if loan.is_active {
        return Err(AppError::LoanStillActive);
    }

    for token in [plan.token_in, plan.token_out] {
        if !dash.ledger.is_token_whitelisted(wallet, token.address).await? {
            return Err(AppError::Validation(format!(
                "{} is not whitelisted for this restricted wallet",
                token.symbol
            )));
        }
    }

    let held = dash.ledger.restricted_balance(wallet, plan.token_in.address).await?;
    if !calc::has_sufficient_balance(held, plan.amount_in_units) {
        return Err(AppError::InsufficientRestrictedBalance(format!(
            "swapping {} {} but the restricted wallet holds {}",
            plan.amount_in,
            plan.token_in.symbol,
            lib_lisk::format_units(held, plan.token_in.decimals),
        )));
    }

    let params = SwapParams {
        router: dash.ledger.deployment().swap_router,
        token_in: plan.token_in.address,
        token_out: plan.token_out.address,
        fee: plan.fee.value(),
        amount_in: plan.amount_in_units,
        amount_out_minimum: plan.min_out_units,
        deadline: plan.deadline,
    };

    submit_tracked(
        dash,
        TxAction::Swap,
        vec![
            ReadKey::RestrictedBalance {
                wallet,
                token: plan.token_in.address,
            },
            ReadKey::RestrictedBalance {
                wallet,
                token: plan.token_out.address,
            },
        ],
        dash.ledger.swap_exact_input(wallet, params),
    )
    .await
}
