//! # Notifications
//!
//! User-facing notices for transaction progress and general status messages.
//! A submitted transaction raises a sticky Pending notice; its confirmation
//! or failure replaces that notice with the final outcome. Informational
//! notices auto-hide after a few seconds via [`NotificationCenter::prune_expired`].

use alloy::primitives::TxHash;
use chrono::{DateTime, Utc};
use lib_utils::time::now_utc;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::app::state::TxAction;

/// Seconds an auto-hiding notice stays visible.
pub const AUTO_HIDE_SECS: i64 = 5;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
    /// Transaction submitted, receipt outstanding. Never auto-hides.
    Pending,
}

/// One notice shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    /// Set for transaction-progress notices so a later outcome can replace
    /// the pending notice of the same action.
    pub action: Option<TxAction>,
    pub created_at: DateTime<Utc>,
    pub auto_hide: bool,
}

/// Shared list of active notices.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: NotificationKind, message: String, action: Option<TxAction>, auto_hide: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.items.lock().push(Notification {
            id,
            kind,
            message,
            action,
            created_at: now_utc(),
            auto_hide,
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Success, message.into(), None, true)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Error, message.into(), None, true)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Warning, message.into(), None, true)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Info, message.into(), None, true)
    }

    /// Sticky notice for a freshly submitted transaction.
    pub fn tx_submitted(&self, action: TxAction, hash: TxHash) -> Uuid {
        self.push(
            NotificationKind::Pending,
            format!("{} submitted: {}", action.label(), hash),
            Some(action),
            false,
        )
    }

    /// Replace the pending notice for `action` with a success notice.
    pub fn tx_confirmed(&self, action: TxAction, hash: TxHash) -> Uuid {
        self.dismiss_pending(action);
        self.push(
            NotificationKind::Success,
            format!("{} confirmed: {}", action.label(), hash),
            Some(action),
            true,
        )
    }

    /// Replace the pending notice for `action` with an error notice.
    pub fn tx_failed(&self, action: TxAction, reason: &str) -> Uuid {
        self.dismiss_pending(action);
        self.push(
            NotificationKind::Error,
            format!("{} failed: {}", action.label(), reason),
            Some(action),
            true,
        )
    }

    fn dismiss_pending(&self, action: TxAction) {
        self.items
            .lock()
            .retain(|n| !(n.kind == NotificationKind::Pending && n.action == Some(action)));
    }

    /// Remove one notice by id. Returns whether it existed.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut items = self.items.lock();
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }

    /// Drop auto-hiding notices older than [`AUTO_HIDE_SECS`].
    pub fn prune_expired(&self, now: DateTime<Utc>) {
        self.items
            .lock()
            .retain(|n| !n.auto_hide || (now - n.created_at).num_seconds() < AUTO_HIDE_SECS);
    }

    /// Snapshot of every active notice, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn clear(&self) {
        self.items.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;
    use chrono::Duration;

    fn hash() -> TxHash {
        B256::repeat_byte(0xab)
    }

    #[test]
    fn test_kinds_and_auto_hide() {
        let center = NotificationCenter::new();
        center.info("connected");
        center.tx_submitted(TxAction::Approve, hash());

        let items = center.active();
        assert_eq!(items.len(), 2);
        assert!(items[0].auto_hide);
        assert_eq!(items[1].kind, NotificationKind::Pending);
        assert!(!items[1].auto_hide);
    }

    #[test]
    fn test_confirmation_replaces_pending_notice() {
        let center = NotificationCenter::new();
        center.tx_submitted(TxAction::CreateLoan, hash());
        center.tx_submitted(TxAction::Approve, hash());

        center.tx_confirmed(TxAction::CreateLoan, hash());

        let items = center.active();
        // The approve pending notice survives; create-loan's is replaced.
        assert_eq!(items.len(), 2);
        assert!(items
            .iter()
            .any(|n| n.kind == NotificationKind::Pending && n.action == Some(TxAction::Approve)));
        assert!(items
            .iter()
            .any(|n| n.kind == NotificationKind::Success
                && n.action == Some(TxAction::CreateLoan)));
    }

    #[test]
    fn test_failure_replaces_pending_notice() {
        let center = NotificationCenter::new();
        center.tx_submitted(TxAction::Swap, hash());
        center.tx_failed(TxAction::Swap, "transaction reverted");

        let items = center.active();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, NotificationKind::Error);
        assert!(items[0].message.contains("swap failed"));
    }

    #[test]
    fn test_prune_keeps_pending_and_fresh_notices() {
        let center = NotificationCenter::new();
        center.tx_submitted(TxAction::Deposit, hash());
        center.info("fresh");

        let later = now_utc() + Duration::seconds(AUTO_HIDE_SECS + 1);
        center.prune_expired(later);

        // Only the sticky pending notice survives a full expiry window.
        let items = center.active();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, NotificationKind::Pending);
    }

    #[test]
    fn test_dismiss_by_id() {
        let center = NotificationCenter::new();
        let id = center.warning("deadline soon");
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.is_empty());
    }
}
