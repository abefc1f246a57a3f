//! # Action Handlers
//!
//! One module per dashboard command group. Every handler follows the same
//! shape: run the local pre-checks (validation, gating reads), then hand the
//! submission to [`submit_tracked`], which owns the per-action state machine:
//!
//! 1. mark the action Pending (rejecting a duplicate submission),
//! 2. submit through the ledger and record the returned hash,
//! 3. spawn a receipt watcher that reports the outcome back to the main
//!    loop as an [`AppEvent`], together with the reads the transaction
//!    invalidated.
//!
//! Pre-check failures never touch the action state; the action only leaves
//! Idle once the handler actually attempts a submission.

pub mod borrow;
pub mod pool;
pub mod repay;
pub mod swap;
pub mod wallet;

use std::future::Future;

use alloy::primitives::{Address, TxHash};
use tracing::{info, warn};

use crate::app::events::AppEvent;
use crate::app::reads::ReadKey;
use crate::app::state::TxAction;
use crate::app::Dashboard;
use crate::core::{AppError, LedgerService, Result};

/// Connected signer address, or a wallet error for read-only sessions.
pub(crate) fn require_signer(dash: &Dashboard) -> Result<Address> {
    dash.ledger.signer_address().ok_or_else(|| {
        AppError::Wallet("no signing key configured; running read-only".to_string())
    })
}

/// Drive one submission through the action state machine.
///
/// `refetch` lists the reads this transaction invalidates; they are refreshed
/// when the confirmation event is applied. A submission error maps to
/// [`AppError::ApprovalFailed`] for the approve action and
/// [`AppError::TransactionFailed`] for everything else.
pub(crate) async fn submit_tracked<F>(
    dash: &Dashboard,
    action: TxAction,
    refetch: Vec<ReadKey>,
    submit: F,
) -> Result<TxHash>
where
    F: Future<Output = lib_lisk::Result<TxHash>>,
{
    dash.actions.write().begin(action)?;

    match submit.await {
        Ok(hash) => {
            dash.actions.write().submitted(action, hash);
            dash.notifications.tx_submitted(action, hash);
            info!(action = action.label(), %hash, "transaction submitted");
            spawn_receipt_watcher(dash, action, hash, refetch);
            Ok(hash)
        }
        Err(e) => {
            let reason = e.to_string();
            dash.actions.write().failed(action, reason.clone());
            dash.notifications.tx_failed(action, &reason);
            warn!(action = action.label(), error = %reason, "submission failed");
            Err(match action {
                TxAction::Approve => AppError::ApprovalFailed(reason),
                _ => AppError::TransactionFailed(reason),
            })
        }
    }
}

/// Watch the receipt for a submitted transaction and report the outcome to
/// the main loop.
pub(crate) fn spawn_receipt_watcher(
    dash: &Dashboard,
    action: TxAction,
    hash: TxHash,
    refetch: Vec<ReadKey>,
) {
    let ledger = dash.ledger.clone();
    let events = dash.event_sender();

    tokio::spawn(async move {
        let event = match ledger.wait_for_receipt(hash).await {
            Ok(outcome) if outcome.success => AppEvent::TxConfirmed {
                action,
                outcome,
                refetch,
            },
            Ok(_) => AppEvent::TxFailed {
                action,
                hash: Some(hash),
                reason: "transaction reverted".to_string(),
            },
            Err(e) => AppEvent::TxFailed {
                action,
                hash: Some(hash),
                reason: e.to_string(),
            },
        };
        // Send fails only when the main loop is gone, i.e. during shutdown.
        let _ = events.send(event).await;
    });
}
