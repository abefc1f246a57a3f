//! # Wallet Session
//!
//! Tracks the lifecycle of the signing wallet: disconnected, connecting,
//! connected (with its address) or failed. The console runs fine without a
//! signer, in which case the session simply stays disconnected and every
//! write path reports that no signing key is configured.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use lib_utils::time::now_utc;

/// Connection state of the signing wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletStatus {
    /// No signer configured, or the session was torn down.
    Disconnected,
    /// Health check against the RPC is in progress.
    Connecting,
    /// Signer verified against the target chain.
    Connected(Address),
    /// Connecting failed; the message explains why.
    Error(String),
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected(_))
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            WalletStatus::Connected(addr) => Some(*addr),
            _ => None,
        }
    }
}

/// Current wallet session.
#[derive(Debug, Clone)]
pub struct WalletSession {
    status: WalletStatus,
    connected_at: Option<DateTime<Utc>>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self {
            status: WalletStatus::Disconnected,
            connected_at: None,
        }
    }

    pub fn status(&self) -> &WalletStatus {
        &self.status
    }

    pub fn address(&self) -> Option<Address> {
        self.status.address()
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
    }

    /// Mark the session as mid-handshake.
    pub fn connecting(&mut self) {
        self.status = WalletStatus::Connecting;
        self.connected_at = None;
    }

    /// Record a verified signer.
    pub fn connect(&mut self, address: Address) {
        self.status = WalletStatus::Connected(address);
        self.connected_at = Some(now_utc());
    }

    /// Record a failed connection attempt.
    pub fn fail(&mut self, message: String) {
        self.status = WalletStatus::Error(message);
        self.connected_at = None;
    }

    /// Tear the session down.
    pub fn disconnect(&mut self) {
        self.status = WalletStatus::Disconnected;
        self.connected_at = None;
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn test_connect_cycle() {
        let mut session = WalletSession::new();
        assert_eq!(*session.status(), WalletStatus::Disconnected);
        assert!(!session.is_connected());

        session.connecting();
        assert_eq!(*session.status(), WalletStatus::Connecting);
        assert_eq!(session.address(), None);

        session.connect(addr());
        assert!(session.is_connected());
        assert_eq!(session.address(), Some(addr()));
        assert!(session.connected_at().is_some());

        session.disconnect();
        assert!(!session.is_connected());
        assert!(session.connected_at().is_none());
    }

    #[test]
    fn test_failure_clears_address() {
        let mut session = WalletSession::new();
        session.connect(addr());
        session.fail("RPC serves chain 1 but Lisk Sepolia expects 4202".to_string());
        assert!(!session.is_connected());
        assert_eq!(session.address(), None);
        assert!(matches!(session.status(), WalletStatus::Error(_)));
    }
}
