//! # Application Layer
//!
//! The [`Dashboard`] is the shared context behind every console command. It
//! owns the ledger adapter, the read cache, the per-action transaction
//! states, the wallet session and the notification center, and it is the
//! single place where background outcomes are folded back into state.
//!
//! ## Flow
//!
//! ```text
//!   command ──▶ handler ──▶ pre-checks (validation, gating reads)
//!                  │
//!                  ├─▶ action slot: Idle ─▶ Pending      (begin / submit)
//!                  │
//!                  └─▶ receipt watcher (spawned task)
//!                           │
//!                           ▼
//!                    AppEvent via channel
//!                           │
//!            main loop ──▶ Dashboard::apply
//!                           │
//!                  Pending ─▶ Success | Error
//!                  refetch invalidated reads
//! ```
//!
//! Handlers never mutate reads directly; a transaction's effects become
//! visible only through the refetches its confirmation triggers, so the
//! display always reflects what the ledger reports rather than what the
//! client hopes happened.

pub mod events;
pub mod handlers;
pub mod reads;
pub mod state;

pub use events::AppEvent;
pub use reads::{ReadEntry, ReadKey, ReadStore, ReadValue};
pub use state::{ActionStates, TransactionState, TxAction, TxStatus};

use std::sync::Arc;

use alloy::primitives::U256;
use async_channel::{Receiver, Sender};
use lib_lisk::{format_units, Network, USDC_DECIMALS};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::{LedgerService, Result};
use crate::services::{NotificationCenter, WalletSession};
use crate::trading::tokens;

/// Shared context for one console session.
pub struct Dashboard {
    config: Config,
    pub ledger: Arc<dyn LedgerService>,
    pub reads: Arc<ReadStore>,
    pub wallet: RwLock<WalletSession>,
    pub actions: RwLock<ActionStates>,
    pub notifications: NotificationCenter,
    event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    pub fn new(config: Config, ledger: Arc<dyn LedgerService>) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        let reads = Arc::new(ReadStore::new(ledger.clone()));
        Self {
            config,
            ledger,
            reads,
            wallet: RwLock::new(WalletSession::new()),
            actions: RwLock::new(ActionStates::new()),
            notifications: NotificationCenter::new(),
            event_tx,
            event_rx,
            refresh_task: Mutex::new(None),
        }
    }

    pub fn network(&self) -> Network {
        self.ledger.network()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sender handed to receipt watchers.
    pub(crate) fn event_sender(&self) -> Sender<AppEvent> {
        self.event_tx.clone()
    }

    /// Bring the session up: verify the RPC when a signer is configured,
    /// prime the tracked reads and start the periodic refresher.
    pub async fn connect(&self) -> Result<()> {
        if let Some(address) = self.ledger.signer_address() {
            self.wallet.write().connecting();
            match self.ledger.health_check().await {
                Ok(chain_id) => {
                    self.wallet.write().connect(address);
                    info!(%address, chain_id, "wallet connected");
                }
                Err(e) => {
                    self.wallet.write().fail(e.to_string());
                    return Err(e.into());
                }
            }
        } else {
            info!("no signing key configured; running read-only");
        }

        self.prime_reads().await;

        let handle = ReadStore::spawn_refresh(self.reads.clone(), self.config.read_refresh);
        if let Some(old) = self.refresh_task.lock().replace(handle) {
            old.abort();
        }
        Ok(())
    }

    /// Populate the reads this session will keep tracking.
    async fn prime_reads(&self) {
        let deployment = *self.ledger.deployment();
        let mut keys = vec![ReadKey::PoolTotalDeposits];
        if self.ledger.signer_address().is_some() {
            keys.extend([
                ReadKey::UsdcBalance,
                ReadKey::Allowance {
                    spender: deployment.loan_manager,
                },
                ReadKey::Allowance {
                    spender: deployment.lending_pool,
                },
                ReadKey::LoanInfo,
                ReadKey::PoolBalance,
            ]);
        }
        self.reads.refetch_many(&keys).await;

        // Track the restricted wallet's USDC once a loan has bound one.
        if let Some(wallet) = self.reads.loan().and_then(|l| l.bound_wallet()) {
            self.reads
                .refetch(ReadKey::RestrictedBalance {
                    wallet,
                    token: deployment.usdc,
                })
                .await;
        }
    }

    /// Tear the session down: stop the refresher and drop all session state.
    pub fn disconnect(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
        self.reads.clear();
        self.actions.write().reset_all();
        self.notifications.clear();
        self.wallet.write().disconnect();
        info!("session torn down");
    }

    /// Fold a background outcome into state.
    ///
    /// Confirmations flip the action to Success and refetch the reads the
    /// transaction invalidated; failures record the reason. Both replace the
    /// action's pending notice.
    pub async fn apply(&self, event: AppEvent) {
        match event {
            AppEvent::TxConfirmed {
                action,
                outcome,
                refetch,
            } => {
                self.actions.write().succeeded(action);
                self.notifications.tx_confirmed(action, outcome.hash);
                info!(
                    action = action.label(),
                    hash = %outcome.hash,
                    block = ?outcome.block_number,
                    "transaction confirmed"
                );
                self.reads.refetch_many(&refetch).await;
            }
            AppEvent::TxFailed {
                action,
                hash,
                reason,
            } => {
                self.actions.write().failed(action, reason.clone());
                self.notifications.tx_failed(action, &reason);
                warn!(
                    action = action.label(),
                    hash = ?hash,
                    reason = %reason,
                    "transaction failed"
                );
            }
        }
    }

    /// Serializable dump of the whole session for the `snapshot` command.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let actions = {
            let slots = self.actions.read();
            TxAction::ALL
                .iter()
                .map(|action| {
                    let state = slots.get(*action);
                    ActionSnapshot {
                        action: action.label(),
                        status: state.status.label(),
                        hash: state.hash.map(|h| h.to_string()),
                        error: state.error,
                    }
                })
                .collect()
        };

        let mut reads: Vec<ReadSnapshot> = self
            .reads
            .tracked_keys()
            .into_iter()
            .map(|key| {
                let entry = self.reads.get(key).unwrap_or_default();
                ReadSnapshot {
                    read: key.label(),
                    value: entry.data.as_ref().map(|v| describe_value(key, v)),
                    is_loading: entry.is_loading,
                    error: entry.error,
                    fetched_at: entry.fetched_at.map(|t| t.to_rfc3339()),
                }
            })
            .collect();
        reads.sort_by(|a, b| a.read.cmp(&b.read));

        DashboardSnapshot {
            network: self.network().label().to_string(),
            wallet: self.wallet.read().address().map(|a| a.to_string()),
            loan: self.reads.loan().map(|info| LoanSnapshot {
                position: format_units(info.position_size(), USDC_DECIMALS),
                margin: format_units(info.margin_amount, USDC_DECIMALS),
                pool_funding: format_units(info.pool_funding, USDC_DECIMALS),
                restricted_wallet: info.bound_wallet().map(|w| w.to_string()),
                is_active: info.is_active,
            }),
            actions,
            reads,
        }
    }
}

/// Human-readable rendering of a cached read value.
fn describe_value(key: ReadKey, value: &ReadValue) -> String {
    match (key, value) {
        (ReadKey::RestrictedBalance { token, .. }, ReadValue::Amount(v)) => {
            match tokens::all().iter().find(|t| t.address == token) {
                Some(t) => format!("{} {}", format_units(*v, t.decimals), t.symbol),
                None => v.to_string(),
            }
        }
        (ReadKey::Allowance { .. }, ReadValue::Amount(v)) if *v == U256::MAX => {
            "unlimited".to_string()
        }
        (_, ReadValue::Amount(v)) => format!("{} USDC", format_units(*v, USDC_DECIMALS)),
        (_, ReadValue::Loan(info)) => format!(
            "position {} USDC, margin {} USDC, {}",
            format_units(info.position_size(), USDC_DECIMALS),
            format_units(info.margin_amount, USDC_DECIMALS),
            if info.is_active { "active" } else { "repaid" },
        ),
    }
}

/// Serializable session dump.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub network: String,
    pub wallet: Option<String>,
    pub loan: Option<LoanSnapshot>,
    pub actions: Vec<ActionSnapshot>,
    pub reads: Vec<ReadSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanSnapshot {
    pub position: String,
    pub margin: String,
    pub pool_funding: String,
    pub restricted_wallet: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionSnapshot {
    pub action: &'static str,
    pub status: &'static str,
    pub hash: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadSnapshot {
    pub read: String,
    pub value: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NotificationKind;
    use crate::testing::{dashboard_with, owner, MockLedger, read_only_dashboard};
    use alloy::primitives::B256;
    use lib_lisk::TxOutcome;

    #[tokio::test]
    async fn test_connect_read_only_skips_owner_reads() {
        let dash = read_only_dashboard();
        dash.connect().await.unwrap();

        assert!(!dash.wallet.read().is_connected());
        assert!(dash.reads.get(ReadKey::PoolTotalDeposits).is_some());
        assert!(dash.reads.get(ReadKey::UsdcBalance).is_none());
        assert!(dash.reads.get(ReadKey::LoanInfo).is_none());
    }

    #[tokio::test]
    async fn test_connect_primes_owner_reads() {
        let mock = Arc::new(MockLedger::new());
        mock.set_usdc_balance(owner(), U256::from(1_000_000u64));
        let dash = dashboard_with(mock);

        dash.connect().await.unwrap();

        assert_eq!(dash.wallet.read().address(), Some(owner()));
        assert_eq!(dash.reads.amount(ReadKey::UsdcBalance), Some(U256::from(1_000_000u64)));
        assert!(dash.reads.loan().is_some());
        assert!(dash.reads.get(ReadKey::PoolBalance).is_some());
    }

    #[tokio::test]
    async fn test_connect_fails_on_unhealthy_rpc() {
        let mock = Arc::new(MockLedger::new());
        mock.fail_reads(true);
        let dash = dashboard_with(mock);

        assert!(dash.connect().await.is_err());
        assert!(matches!(
            dash.wallet.read().status(),
            crate::services::WalletStatus::Error(_)
        ));
    }

    #[tokio::test]
    async fn test_apply_confirmation_updates_state_and_reads() {
        let mock = Arc::new(MockLedger::new());
        let dash = dashboard_with(mock.clone());
        let hash = B256::repeat_byte(0x01);

        dash.actions.write().begin(TxAction::Approve).unwrap();
        dash.actions.write().submitted(TxAction::Approve, hash);
        dash.notifications.tx_submitted(TxAction::Approve, hash);

        mock.set_usdc_balance(owner(), U256::from(9u64));
        dash.apply(AppEvent::TxConfirmed {
            action: TxAction::Approve,
            outcome: TxOutcome {
                hash,
                success: true,
                block_number: Some(42),
            },
            refetch: vec![ReadKey::UsdcBalance],
        })
        .await;

        assert!(dash.actions.read().get(TxAction::Approve).is_success());
        assert_eq!(dash.reads.amount(ReadKey::UsdcBalance), Some(U256::from(9u64)));
        let notices = dash.notifications.active();
        assert!(notices.iter().all(|n| n.kind != NotificationKind::Pending));
        assert!(notices.iter().any(|n| n.kind == NotificationKind::Success));
    }

    #[tokio::test]
    async fn test_apply_failure_records_reason() {
        let mock = Arc::new(MockLedger::new());
        let dash = dashboard_with(mock);
        let hash = B256::repeat_byte(0x02);

        dash.actions.write().begin(TxAction::Swap).unwrap();
        dash.apply(AppEvent::TxFailed {
            action: TxAction::Swap,
            hash: Some(hash),
            reason: "transaction reverted".to_string(),
        })
        .await;

        let state = dash.actions.read().get(TxAction::Swap);
        assert_eq!(state.status, TxStatus::Error);
        assert_eq!(state.error.as_deref(), Some("transaction reverted"));
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let mock = Arc::new(MockLedger::new());
        let dash = dashboard_with(mock);
        dash.connect().await.unwrap();
        dash.actions.write().begin(TxAction::Deposit).unwrap();
        dash.notifications.info("hello");

        dash.disconnect();

        assert!(!dash.wallet.read().is_connected());
        assert!(dash.reads.tracked_keys().is_empty());
        assert!(!dash.actions.read().any_pending());
        assert!(dash.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_shape() {
        let mock = Arc::new(MockLedger::new());
        mock.set_active_loan(owner(), U256::from(1_000_000_000u64));
        let dash = dashboard_with(mock);
        dash.connect().await.unwrap();

        let snapshot = dash.snapshot();
        assert_eq!(snapshot.network, "Lisk Sepolia");
        assert!(snapshot.wallet.is_some());
        assert_eq!(snapshot.actions.len(), TxAction::ALL.len());
        assert!(!snapshot.reads.is_empty());
        assert_eq!(snapshot.loan.as_ref().map(|l| l.is_active), Some(true));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["network"], "Lisk Sepolia");
    }
}
