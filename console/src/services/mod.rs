//! # Services
//!
//! Long-lived collaborators behind the dashboard: the chain ledger adapter,
//! the wallet session and the notification center.

pub mod ledger;
pub mod notifications;
pub mod wallet;

pub use ledger::ChainLedger;
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use wallet::{WalletSession, WalletStatus};
