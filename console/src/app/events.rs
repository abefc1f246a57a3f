//! # Application Events
//!
//! Events emitted by background receipt watchers and consumed by the main
//! loop. Handlers submit a transaction, mark its action Pending and spawn a
//! watcher; the watcher reports back here once the receipt resolves, and
//! [`Dashboard::apply`](crate::app::Dashboard::apply) folds the outcome into
//! state and refreshes the ledger reads the transaction invalidated.

use alloy::primitives::TxHash;
use lib_lisk::TxOutcome;

use crate::app::reads::ReadKey;
use crate::app::state::TxAction;

/// Events flowing from background tasks to the main loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A submitted transaction was mined successfully.
    TxConfirmed {
        action: TxAction,
        outcome: TxOutcome,
        /// Ledger reads made stale by this transaction, refetched on apply.
        refetch: Vec<ReadKey>,
    },
    /// A submitted transaction reverted, or the receipt never arrived.
    TxFailed {
        action: TxAction,
        hash: Option<TxHash>,
        reason: String,
    },
}
