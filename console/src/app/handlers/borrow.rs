//! Leverage-position commands: margin preview, approval and loan creation.

use alloy::primitives::{TxHash, U256};
use lib_lisk::{decimal_to_units, format_units, USDC_DECIMALS};
use rust_decimal::Decimal;

use crate::app::handlers::{require_signer, submit_tracked};
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};
use crate::trading::calc::{self, ApprovalPhase};

/// Derived view of a position the user is about to open.
#[derive(Debug, Clone)]
pub struct BorrowPreview {
    /// Position size in USDC.
    pub amount: Decimal,
    /// Locally computed 20% margin.
    pub margin: Decimal,
    /// Margin the loan manager quotes on chain, once fetched.
    pub required_margin: Option<U256>,
    /// Pool-funded share quoted on chain, once fetched.
    pub pool_funding: Option<U256>,
    /// Whether an approval has to land before the loan can open.
    pub phase: ApprovalPhase,
}

/// Quote a position without submitting anything.
///
/// Refreshes the on-chain quotes for this amount, then derives the preview
/// from the read cache. Works in read-only mode too, in which case the
/// approval phase always reports that an approval would be needed.
pub async fn preview(dash: &Dashboard, amount_text: &str) -> Result<BorrowPreview> {
    let amount = calc::validate_position_amount(amount_text)?;
    let margin = calc::margin_for(amount);
    let units = decimal_to_units(amount, USDC_DECIMALS)?;
    let spender = dash.ledger.deployment().loan_manager;

    let mut keys = vec![
        ReadKey::RequiredMargin { amount: units },
        ReadKey::PoolFunding { amount: units },
    ];
    if dash.ledger.signer_address().is_some() {
        keys.push(ReadKey::Allowance { spender });
    }
    dash.reads.refetch_many(&keys).await;

    let required_margin = dash.reads.amount(ReadKey::RequiredMargin { amount: units });
    let pool_funding = dash.reads.amount(ReadKey::PoolFunding { amount: units });

    // Fall back to the local 20% rule until the on-chain quote arrives.
    let required = match required_margin {
        Some(u) => u,
        None => decimal_to_units(margin, USDC_DECIMALS)?,
    };
    let phase = match dash.reads.amount(ReadKey::Allowance { spender }) {
        Some(allowance) => calc::approval_phase(required, allowance),
        None => ApprovalPhase::NeedsApproval,
    };

    Ok(BorrowPreview {
        amount,
        margin,
        required_margin,
        pool_funding,
        phase,
    })
}

/// Grant the loan manager an unlimited USDC allowance.
///
/// Approving the maximum once spares the user a second approval on every
/// position, matching how the web front end handles it.
pub async fn approve_margin(dash: &Dashboard) -> Result<TxHash> {
    require_signer(dash)?;
    let spender = dash.ledger.deployment().loan_manager;

    submit_tracked(
        dash,
        TxAction::Approve,
        vec![ReadKey::Allowance { spender }],
        dash.ledger.approve_usdc(spender, U256::MAX),
    )
    .await
}

/// Open a leveraged position of `amount_text` USDC.
///
/// Gating happens against fresh ledger reads, not the cache: one active loan
/// per wallet, the loan manager's quoted margin must be inside the current
/// allowance, and the wallet must hold that margin.
pub async fn open_loan(dash: &Dashboard, amount_text: &str) -> Result<TxHash> {
    let owner = require_signer(dash)?;
    let amount = calc::validate_position_amount(amount_text)?;
    let units = decimal_to_units(amount, USDC_DECIMALS)?;

    let loan = dash.ledger.loan_info(owner).await?;
    if loan.is_active {
        return Err(AppError::Validation(
            "a loan is already active; repay it before opening another".to_string(),
        ));
    }

    let required = dash.ledger.required_margin(units).await?;
    let spender = dash.ledger.deployment().loan_manager;
    let allowance = dash.ledger.usdc_allowance(owner, spender).await?;
    if calc::needs_approval(required, allowance) {
        return Err(AppError::ApprovalRequired(format!(
            "loan manager may spend {} USDC but needs {}; run `approve loan` first",
            format_units(allowance, USDC_DECIMALS),
            format_units(required, USDC_DECIMALS),
        )));
    }

    let balance = dash.ledger.usdc_balance(owner).await?;
    if !calc::has_sufficient_balance(balance, required) {
        return Err(AppError::InsufficientBalance(format!(
            "need {} USDC margin, wallet holds {}",
            format_units(required, USDC_DECIMALS),
            format_units(balance, USDC_DECIMALS),
        )));
    }

    submit_tracked(
        dash,
        TxAction::CreateLoan,
        vec![
            ReadKey::UsdcBalance,
            ReadKey::Allowance { spender },
            ReadKey::LoanInfo,
        ],
        dash.ledger.create_loan(units),
    )
    .await
}
