//! Loan repayment.

use alloy::primitives::TxHash;

use crate::app::handlers::{require_signer, submit_tracked};
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};

/// Repay the signer's active loan in full.
///
/// The loan manager settles against the restricted wallet, so no amount is
/// taken here. Repaying releases the margin and deactivates the loan, which
/// in turn re-enables restricted-wallet withdrawals.
pub async fn repay(dash: &Dashboard) -> Result<TxHash> {
    let owner = require_signer(dash)?;

    let loan = dash.ledger.loan_info(owner).await?;
    if !loan.is_active {
        return Err(AppError::NoActiveLoan);
    }

    submit_tracked(
        dash,
        TxAction::RepayLoan,
        vec![ReadKey::UsdcBalance, ReadKey::LoanInfo],
        dash.ledger.repay_loan(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dashboard_with, owner, MockLedger};
    use alloy::primitives::U256;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_repay_requires_active_loan() {
        let mock = Arc::new(MockLedger::new());
        let dash = dashboard_with(mock.clone());

        let err = repay(&dash).await.unwrap_err();
        assert!(matches!(err, AppError::NoActiveLoan));
        assert!(!mock.called("repay_loan"));
    }

    #[tokio::test]
    async fn test_repay_deactivates_loan() {
        let mock = Arc::new(MockLedger::new());
        mock.set_active_loan(owner(), U256::from(1_000_000_000u64));
        let dash = dashboard_with(mock.clone());

        repay(&dash).await.unwrap();
        let event = dash.event_rx.recv().await.unwrap();
        dash.apply(event).await;

        assert!(dash.actions.read().get(TxAction::RepayLoan).is_success());
        assert!(mock.called("repay_loan"));
        // The refetched loan record reports the position closed.
        assert_eq!(dash.reads.loan().map(|l| l.is_active), Some(false));
    }
}
