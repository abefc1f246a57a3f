//! # Ledger Reads
//!
//! Cached views of on-chain state, keyed by what is being read and for whom.
//! Each tracked read carries its latest value, a loading flag and the last
//! fetch error; handlers and the status display consume the cache, and
//! confirmed transactions trigger refetches of the keys they invalidated.
//!
//! Reads that are keyed by the connected wallet are disabled while no signing
//! key is configured: they are never fetched, never populate and never report
//! an error. A refetch that fails keeps the previous value visible and records
//! the error alongside it, so a flaky RPC node degrades the display instead of
//! blanking it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use lib_lisk::explorer::short_address;
use lib_lisk::units::format_units;
use lib_lisk::{ChainError, LoanInfo, USDC_DECIMALS};
use lib_utils::time::now_utc;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::core::LedgerService;

/// Identity of one tracked ledger read.
///
/// Two reads with the same key are the same read; quote-style reads carry
/// their input in the key, so quoting a new amount is a new entry rather
/// than an overwrite of the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadKey {
    /// USDC balance of the connected wallet.
    UsdcBalance,
    /// USDC allowance granted by the connected wallet to `spender`.
    Allowance { spender: Address },
    /// Loan record of the connected wallet.
    LoanInfo,
    /// Margin the loan manager quotes for a position of `amount`.
    RequiredMargin { amount: U256 },
    /// Pool funding the loan manager quotes for a position of `amount`.
    PoolFunding { amount: U256 },
    /// Lending-pool share balance of the connected wallet.
    PoolBalance,
    /// Total USDC deposited in the lending pool.
    PoolTotalDeposits,
    /// Balance of `token` held inside a restricted wallet.
    RestrictedBalance { wallet: Address, token: Address },
}

impl ReadKey {
    /// Whether this read is keyed by the connected wallet and therefore
    /// disabled while no signing key is configured.
    pub fn requires_owner(&self) -> bool {
        matches!(
            self,
            ReadKey::UsdcBalance
                | ReadKey::Allowance { .. }
                | ReadKey::LoanInfo
                | ReadKey::PoolBalance
        )
    }

    /// Short description used in logs and the `snapshot` output.
    pub fn label(&self) -> String {
        match self {
            ReadKey::UsdcBalance => "usdc balance".to_string(),
            ReadKey::Allowance { spender } => {
                format!("allowance -> {}", short_address(*spender))
            }
            ReadKey::LoanInfo => "loan info".to_string(),
            ReadKey::RequiredMargin { amount } => {
                format!("required margin ({} USDC)", format_units(*amount, USDC_DECIMALS))
            }
            ReadKey::PoolFunding { amount } => {
                format!("pool funding ({} USDC)", format_units(*amount, USDC_DECIMALS))
            }
            ReadKey::PoolBalance => "pool balance".to_string(),
            ReadKey::PoolTotalDeposits => "pool total deposits".to_string(),
            ReadKey::RestrictedBalance { wallet, token } => {
                format!(
                    "restricted balance {} / {}",
                    short_address(*wallet),
                    short_address(*token)
                )
            }
        }
    }
}

/// Value produced by one read.
#[derive(Debug, Clone)]
pub enum ReadValue {
    Amount(U256),
    Loan(LoanInfo),
}

impl ReadValue {
    pub fn as_amount(&self) -> Option<U256> {
        match self {
            ReadValue::Amount(v) => Some(*v),
            ReadValue::Loan(_) => None,
        }
    }

    pub fn as_loan(&self) -> Option<LoanInfo> {
        match self {
            ReadValue::Loan(info) => Some(*info),
            ReadValue::Amount(_) => None,
        }
    }
}

/// One tracked read: latest value plus fetch status.
#[derive(Debug, Clone, Default)]
pub struct ReadEntry {
    /// Last successfully fetched value, kept across failed refetches.
    pub data: Option<ReadValue>,
    pub is_loading: bool,
    /// Error from the most recent fetch, cleared on the next success.
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Cache of tracked ledger reads backed by a [`LedgerService`].
pub struct ReadStore {
    ledger: Arc<dyn LedgerService>,
    entries: RwLock<HashMap<ReadKey, ReadEntry>>,
}

impl ReadStore {
    pub fn new(ledger: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Current entry for a key, if it is tracked.
    pub fn get(&self, key: ReadKey) -> Option<ReadEntry> {
        self.entries.read().get(&key).cloned()
    }

    /// Latest value for a key, if one has ever been fetched.
    pub fn value(&self, key: ReadKey) -> Option<ReadValue> {
        self.entries.read().get(&key).and_then(|e| e.data.clone())
    }

    /// Latest value for an amount-valued key.
    pub fn amount(&self, key: ReadKey) -> Option<U256> {
        self.value(key).and_then(|v| v.as_amount())
    }

    /// Latest loan record, if the loan-info read has populated.
    pub fn loan(&self) -> Option<LoanInfo> {
        self.value(ReadKey::LoanInfo).and_then(|v| v.as_loan())
    }

    /// Keys currently tracked, in no particular order.
    pub fn tracked_keys(&self) -> Vec<ReadKey> {
        self.entries.read().keys().copied().collect()
    }

    /// Drop every entry. Used on disconnect so a later reconnect starts from
    /// a clean slate instead of another wallet's stale values.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Fetch `key` from the ledger and fold the result into the cache.
    ///
    /// Owner-keyed reads are skipped entirely while no signing key is
    /// configured. On failure the previous value stays in place and the error
    /// is recorded on the entry.
    pub async fn refetch(&self, key: ReadKey) {
        if key.requires_owner() && self.ledger.signer_address().is_none() {
            debug!(read = %key.label(), "skipping owner-keyed read without signer");
            return;
        }

        {
            let mut entries = self.entries.write();
            entries.entry(key).or_default().is_loading = true;
        }

        let result = self.fetch_value(key).await;

        let mut entries = self.entries.write();
        let entry = entries.entry(key).or_default();
        entry.is_loading = false;
        match result {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
                entry.fetched_at = Some(now_utc());
            }
            Err(e) => {
                warn!(read = %key.label(), error = %e, "ledger read failed");
                entry.error = Some(e.to_string());
            }
        }
    }

    /// Refetch several keys back to back.
    pub async fn refetch_many(&self, keys: &[ReadKey]) {
        for key in keys {
            self.refetch(*key).await;
        }
    }

    async fn fetch_value(&self, key: ReadKey) -> lib_lisk::Result<ReadValue> {
        match key {
            ReadKey::UsdcBalance => {
                let owner = self.owner()?;
                Ok(ReadValue::Amount(self.ledger.usdc_balance(owner).await?))
            }
            ReadKey::Allowance { spender } => {
                let owner = self.owner()?;
                Ok(ReadValue::Amount(
                    self.ledger.usdc_allowance(owner, spender).await?,
                ))
            }
            ReadKey::LoanInfo => {
                let owner = self.owner()?;
                Ok(ReadValue::Loan(self.ledger.loan_info(owner).await?))
            }
            ReadKey::RequiredMargin { amount } => {
                Ok(ReadValue::Amount(self.ledger.required_margin(amount).await?))
            }
            ReadKey::PoolFunding { amount } => {
                Ok(ReadValue::Amount(self.ledger.pool_funding(amount).await?))
            }
            ReadKey::PoolBalance => {
                let owner = self.owner()?;
                Ok(ReadValue::Amount(self.ledger.pool_balance(owner).await?))
            }
            ReadKey::PoolTotalDeposits => {
                Ok(ReadValue::Amount(self.ledger.pool_total_deposits().await?))
            }
            ReadKey::RestrictedBalance { wallet, token } => Ok(ReadValue::Amount(
                self.ledger.restricted_balance(wallet, token).await?,
            )),
        }
    }

    fn owner(&self) -> lib_lisk::Result<Address> {
        self.ledger
            .signer_address()
            .ok_or_else(|| ChainError::Wallet("no signing key configured".to_string()))
    }

    /// Periodically refetch every tracked key.
    ///
    /// The returned handle is aborted on disconnect. The first interval tick
    /// fires immediately and is consumed without fetching, since callers prime
    /// the cache before spawning the refresher.
    pub fn spawn_refresh(store: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                for key in store.tracked_keys() {
                    store.refetch(key).await;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{owner, MockLedger};

    #[tokio::test]
    async fn test_refetch_populates_entry() {
        let mock = Arc::new(MockLedger::new());
        mock.set_usdc_balance(owner(), U256::from(5_000_000u64));
        let store = ReadStore::new(mock);

        store.refetch(ReadKey::UsdcBalance).await;

        let entry = store.get(ReadKey::UsdcBalance).unwrap();
        assert!(!entry.is_loading);
        assert_eq!(entry.error, None);
        assert!(entry.fetched_at.is_some());
        assert_eq!(store.amount(ReadKey::UsdcBalance), Some(U256::from(5_000_000u64)));
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_previous_value() {
        let mock = Arc::new(MockLedger::new());
        mock.set_usdc_balance(owner(), U256::from(7u64));
        let store = ReadStore::new(mock.clone());

        store.refetch(ReadKey::UsdcBalance).await;
        assert_eq!(store.amount(ReadKey::UsdcBalance), Some(U256::from(7u64)));

        mock.fail_reads(true);
        store.refetch(ReadKey::UsdcBalance).await;

        let entry = store.get(ReadKey::UsdcBalance).unwrap();
        assert_eq!(entry.data.and_then(|v| v.as_amount()), Some(U256::from(7u64)));
        assert!(entry.error.is_some());

        // Next success clears the recorded error again.
        mock.fail_reads(false);
        store.refetch(ReadKey::UsdcBalance).await;
        assert_eq!(store.get(ReadKey::UsdcBalance).unwrap().error, None);
    }

    #[tokio::test]
    async fn test_owner_keyed_reads_disabled_without_signer() {
        let mock = Arc::new(MockLedger::read_only());
        let store = ReadStore::new(mock);

        store.refetch(ReadKey::UsdcBalance).await;
        store.refetch(ReadKey::LoanInfo).await;
        store.refetch(ReadKey::PoolTotalDeposits).await;

        // Owner-keyed reads never even create an entry; the global read does.
        assert!(store.get(ReadKey::UsdcBalance).is_none());
        assert!(store.get(ReadKey::LoanInfo).is_none());
        assert!(store.get(ReadKey::PoolTotalDeposits).is_some());
        assert_eq!(store.tracked_keys(), vec![ReadKey::PoolTotalDeposits]);
    }

    #[tokio::test]
    async fn test_refetch_is_idempotent() {
        let mock = Arc::new(MockLedger::new());
        mock.set_usdc_balance(owner(), U256::from(42u64));
        let store = ReadStore::new(mock);

        store.refetch(ReadKey::UsdcBalance).await;
        store.refetch(ReadKey::UsdcBalance).await;

        assert_eq!(store.tracked_keys().len(), 1);
        assert_eq!(store.amount(ReadKey::UsdcBalance), Some(U256::from(42u64)));
    }

    #[tokio::test]
    async fn test_quote_reads_are_keyed_by_amount() {
        let mock = Arc::new(MockLedger::new());
        let store = ReadStore::new(mock);

        let small = ReadKey::RequiredMargin { amount: U256::from(1_000_000u64) };
        let large = ReadKey::RequiredMargin { amount: U256::from(5_000_000u64) };
        store.refetch_many(&[small, large]).await;

        // One entry per quoted amount, margin = amount / 5.
        assert_eq!(store.amount(small), Some(U256::from(200_000u64)));
        assert_eq!(store.amount(large), Some(U256::from(1_000_000u64)));
    }

    #[tokio::test]
    async fn test_clear_drops_all_entries() {
        let mock = Arc::new(MockLedger::new());
        let store = ReadStore::new(mock);

        store.refetch(ReadKey::PoolTotalDeposits).await;
        assert!(!store.tracked_keys().is_empty());

        store.clear();
        assert!(store.tracked_keys().is_empty());
        assert!(store.get(ReadKey::PoolTotalDeposits).is_none());
    }
}
