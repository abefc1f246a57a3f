//! # Transaction State
//!
//! One [`TransactionState`] per logical action, tracking it through the
//! Idle → Pending → Success | Error lifecycle, plus the [`ActionStates`]
//! registry holding all of them.
//!
//! Pending spans from submission until the receipt resolves; the hash is
//! recorded on the state as soon as the wallet returns it. A new submission
//! for an action that is already Pending is rejected locally so a double
//! keypress cannot produce two on-chain transactions. Success and Error are
//! terminal until the caller resets the action or starts a new attempt
//! (starting a new attempt implicitly resets).

use alloy::primitives::TxHash;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::error::{AppError, Result};

/// Every logical action the dashboard can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TxAction {
    /// ERC-20 approve for a protocol spender.
    Approve,
    /// Lending-pool deposit.
    Deposit,
    /// Lending-pool withdrawal.
    PoolWithdraw,
    /// Open a collateralized loan.
    CreateLoan,
    /// Repay the active loan.
    RepayLoan,
    /// Restricted-wallet swap.
    Swap,
    /// Restricted-wallet withdrawal.
    Withdraw,
    /// Restricted-wallet full withdrawal of one token.
    WithdrawAll,
    /// Restricted-wallet raw proxy call.
    Execute,
}

impl TxAction {
    pub const ALL: [TxAction; 9] = [
        TxAction::Approve,
        TxAction::Deposit,
        TxAction::PoolWithdraw,
        TxAction::CreateLoan,
        TxAction::RepayLoan,
        TxAction::Swap,
        TxAction::Withdraw,
        TxAction::WithdrawAll,
        TxAction::Execute,
    ];

    /// Short label used in logs, notifications and the `tx` table.
    pub fn label(&self) -> &'static str {
        match self {
            TxAction::Approve => "approve",
            TxAction::Deposit => "pool deposit",
            TxAction::PoolWithdraw => "pool withdraw",
            TxAction::CreateLoan => "create loan",
            TxAction::RepayLoan => "repay loan",
            TxAction::Swap => "swap",
            TxAction::Withdraw => "withdraw",
            TxAction::WithdrawAll => "withdraw all",
            TxAction::Execute => "execute",
        }
    }
}

/// Lifecycle stage of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TxStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl TxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Idle => "idle",
            TxStatus::Pending => "pending",
            TxStatus::Success => "success",
            TxStatus::Error => "error",
        }
    }
}

/// Ephemeral, in-memory record of one action's latest attempt.
///
/// Never persisted; lost when the process exits. The underlying on-chain
/// transaction, once submitted, is not affected by anything done to this
/// record.
#[derive(Debug, Clone, Default)]
pub struct TransactionState {
    pub status: TxStatus,
    /// Hash of the submitted transaction, once the wallet returned one.
    pub hash: Option<TxHash>,
    /// Human-readable failure message when status is Error.
    pub error: Option<String>,
}

impl TransactionState {
    /// Start a new attempt, clearing the previous outcome.
    pub fn begin(&mut self) {
        self.status = TxStatus::Pending;
        self.hash = None;
        self.error = None;
    }

    /// Record the transaction hash; the action stays Pending until the
    /// receipt resolves.
    pub fn submitted(&mut self, hash: TxHash) {
        self.hash = Some(hash);
    }

    /// The receipt confirmed the transaction.
    pub fn succeeded(&mut self) {
        self.status = TxStatus::Success;
        self.error = None;
    }

    /// Submission was rejected or the receipt reported a revert.
    pub fn failed(&mut self, error: String) {
        self.status = TxStatus::Error;
        self.error = Some(error);
    }

    /// Explicitly return to Idle, dropping hash and error.
    pub fn reset(&mut self) {
        *self = TransactionState::default();
    }

    pub fn is_pending(&self) -> bool {
        self.status == TxStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// Registry of transaction states, one slot per [`TxAction`].
///
/// Actions that have never run simply have no entry and read back as Idle.
#[derive(Debug, Default)]
pub struct ActionStates {
    actions: HashMap<TxAction, TransactionState>,
}

impl ActionStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of an action (Idle when it has never run).
    pub fn get(&self, action: TxAction) -> TransactionState {
        self.actions.get(&action).cloned().unwrap_or_default()
    }

    /// Begin a new attempt for `action`.
    ///
    /// Rejected with [`AppError::InFlight`] while a previous submission for
    /// the same action is still Pending.
    pub fn begin(&mut self, action: TxAction) -> Result<()> {
        let state = self.actions.entry(action).or_default();
        if state.is_pending() {
            return Err(AppError::InFlight(action.label().to_string()));
        }
        state.begin();
        Ok(())
    }

    pub fn submitted(&mut self, action: TxAction, hash: TxHash) {
        self.actions.entry(action).or_default().submitted(hash);
    }

    pub fn succeeded(&mut self, action: TxAction) {
        self.actions.entry(action).or_default().succeeded();
    }

    pub fn failed(&mut self, action: TxAction, error: String) {
        self.actions.entry(action).or_default().failed(error);
    }

    pub fn reset(&mut self, action: TxAction) {
        self.actions.entry(action).or_default().reset();
    }

    pub fn reset_all(&mut self) {
        self.actions.clear();
    }

    /// Whether any action currently has a submission outstanding.
    pub fn any_pending(&self) -> bool {
        self.actions.values().any(TransactionState::is_pending)
    }
}
