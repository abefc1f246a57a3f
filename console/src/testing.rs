//! In-memory ledger used by the unit tests.
//!
//! [`MockLedger`] implements [`LedgerService`] over hash maps, mutates its
//! own state on writes the way the contracts would (approve sets the
//! allowance, create-loan activates a loan, repay deactivates it) and
//! resolves receipts instantly. Failure modes are toggled per test: failing
//! reads, failing submissions and reverting receipts. Every write is
//! appended to a call log so tests can assert exactly what was submitted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use lib_lisk::{ChainError, Deployment, LoanInfo, Network, SwapParams, TxOutcome};
use lib_utils::time::unix_now;
use parking_lot::Mutex;

use crate::app::Dashboard;
use crate::config::Config;
use crate::core::LedgerService;

/// Signer address every mock write acts as.
pub(crate) fn owner() -> Address {
    Address::repeat_byte(0xaa)
}

/// Restricted wallet bound by the mock's loan records.
pub(crate) fn restricted_wallet() -> Address {
    Address::repeat_byte(0xcc)
}

pub(crate) fn test_config() -> Config {
    Config {
        network: Network::Sepolia,
        rpc_url: None,
        private_key: None,
        receipt_poll: Duration::from_millis(1),
        receipt_timeout: Duration::from_secs(1),
        // Long enough that the background refresher never fires mid-test.
        read_refresh: Duration::from_secs(3600),
        log_dir: PathBuf::from("logs"),
    }
}

pub(crate) fn dashboard_with(ledger: Arc<MockLedger>) -> Dashboard {
    Dashboard::new(test_config(), ledger)
}

pub(crate) fn read_only_dashboard() -> Dashboard {
    dashboard_with(Arc::new(MockLedger::read_only()))
}

pub(crate) struct MockLedger {
    deployment: Deployment,
    signer: Option<Address>,
    usdc_balances: Mutex<HashMap<Address, U256>>,
    allowances: Mutex<HashMap<(Address, Address), U256>>,
    loans: Mutex<HashMap<Address, LoanInfo>>,
    pool_balances: Mutex<HashMap<Address, U256>>,
    pool_total: Mutex<U256>,
    restricted: Mutex<HashMap<(Address, Address), U256>>,
    whitelist: Mutex<HashMap<(Address, Address), bool>>,
    targets: Mutex<HashMap<(Address, Address), bool>>,
    selectors: Mutex<HashMap<(Address, [u8; 4]), bool>>,
    calls: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_submissions: AtomicBool,
    revert_receipts: AtomicBool,
    next_hash: AtomicU64,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::with_signer(Some(owner()))
    }

    pub fn read_only() -> Self {
        Self::with_signer(None)
    }

    fn with_signer(signer: Option<Address>) -> Self {
        Self {
            deployment: Deployment::lisk_sepolia(),
            signer,
            usdc_balances: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            loans: Mutex::new(HashMap::new()),
            pool_balances: Mutex::new(HashMap::new()),
            pool_total: Mutex::new(U256::ZERO),
            restricted: Mutex::new(HashMap::new()),
            whitelist: Mutex::new(HashMap::new()),
            targets: Mutex::new(HashMap::new()),
            selectors: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_submissions: AtomicBool::new(false),
            revert_receipts: AtomicBool::new(false),
            next_hash: AtomicU64::new(0),
        }
    }

    // -- Seeding

    pub fn set_usdc_balance(&self, owner: Address, amount: U256) {
        self.usdc_balances.lock().insert(owner, amount);
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.allowances.lock().insert((owner, spender), amount);
    }

    pub fn set_pool_balance(&self, owner: Address, amount: U256) {
        self.pool_balances.lock().insert(owner, amount);
    }

    pub fn set_restricted_balance(&self, wallet: Address, token: Address, amount: U256) {
        self.restricted.lock().insert((wallet, token), amount);
    }

    pub fn set_whitelisted(&self, wallet: Address, token: Address, allowed: bool) {
        self.whitelist.lock().insert((wallet, token), allowed);
    }

    pub fn set_target_approved(&self, wallet: Address, target: Address, allowed: bool) {
        self.targets.lock().insert((wallet, target), allowed);
    }

    pub fn set_selector_approved(&self, wallet: Address, selector: [u8; 4], allowed: bool) {
        self.selectors.lock().insert((wallet, selector), allowed);
    }

    /// Record an open loan with a bound restricted wallet, 20% margin.
    pub fn set_active_loan(&self, user: Address, amount: U256) {
        let margin = amount / U256::from(5);
        self.loans.lock().insert(
            user,
            LoanInfo {
                loan_amount: amount,
                margin_amount: margin,
                pool_funding: amount - margin,
                start_time: unix_now(),
                restricted_wallet: restricted_wallet(),
                is_active: true,
            },
        );
    }

    /// Record a settled loan that left its restricted wallet behind.
    pub fn set_repaid_loan(&self, user: Address) {
        self.set_active_loan(user, U256::from(1_000_000_000u64));
        if let Some(loan) = self.loans.lock().get_mut(&user) {
            loan.is_active = false;
        }
    }

    // -- Failure toggles

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_submissions(&self, on: bool) {
        self.fail_submissions.store(on, Ordering::SeqCst);
    }

    pub fn revert_receipts(&self, on: bool) {
        self.revert_receipts.store(on, Ordering::SeqCst);
    }

    // -- Assertions

    /// Whether any recorded write contains `pattern`.
    pub fn called(&self, pattern: &str) -> bool {
        self.calls.lock().iter().any(|c| c.contains(pattern))
    }

    // -- Internals

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn check_read(&self) -> lib_lisk::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn check_submit(&self) -> lib_lisk::Result<Address> {
        let owner = self
            .signer
            .ok_or_else(|| ChainError::Wallet("no signing key configured".to_string()))?;
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ChainError::Contract("simulated submission failure".to_string()));
        }
        Ok(owner)
    }

    fn fresh_hash(&self) -> TxHash {
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        B256::from(bytes)
    }

    fn empty_loan() -> LoanInfo {
        LoanInfo {
            loan_amount: U256::ZERO,
            margin_amount: U256::ZERO,
            pool_funding: U256::ZERO,
            start_time: 0,
            restricted_wallet: Address::ZERO,
            is_active: false,
        }
    }
}

#[async_trait]
impl LedgerService for MockLedger {
    fn network(&self) -> Network {
        Network::Sepolia
    }

    fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    async fn health_check(&self) -> lib_lisk::Result<u64> {
        self.check_read()?;
        Ok(Network::Sepolia.chain_id())
    }

    async fn usdc_balance(&self, owner: Address) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(self.usdc_balances.lock().get(&owner).copied().unwrap_or_default())
    }

    async fn usdc_allowance(&self, owner: Address, spender: Address) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(self
            .allowances
            .lock()
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn loan_info(&self, user: Address) -> lib_lisk::Result<LoanInfo> {
        self.check_read()?;
        Ok(self
            .loans
            .lock()
            .get(&user)
            .copied()
            .unwrap_or_else(Self::empty_loan))
    }

    async fn required_margin(&self, amount: U256) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(amount / U256::from(5))
    }

    async fn pool_funding(&self, amount: U256) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(amount - amount / U256::from(5))
    }

    async fn pool_balance(&self, owner: Address) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(self.pool_balances.lock().get(&owner).copied().unwrap_or_default())
    }

    async fn pool_total_deposits(&self) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(*self.pool_total.lock())
    }

    async fn restricted_balance(&self, wallet: Address, token: Address) -> lib_lisk::Result<U256> {
        self.check_read()?;
        Ok(self
            .restricted
            .lock()
            .get(&(wallet, token))
            .copied()
            .unwrap_or_default())
    }

    async fn is_target_approved(&self, wallet: Address, target: Address) -> lib_lisk::Result<bool> {
        self.check_read()?;
        Ok(self
            .targets
            .lock()
            .get(&(wallet, target))
            .copied()
            .unwrap_or(true))
    }

    async fn is_selector_approved(
        &self,
        wallet: Address,
        selector: [u8; 4],
    ) -> lib_lisk::Result<bool> {
        self.check_read()?;
        Ok(self
            .selectors
            .lock()
            .get(&(wallet, selector))
            .copied()
            .unwrap_or(true))
    }

    async fn is_token_whitelisted(&self, wallet: Address, token: Address) -> lib_lisk::Result<bool> {
        self.check_read()?;
        Ok(self
            .whitelist
            .lock()
            .get(&(wallet, token))
            .copied()
            .unwrap_or(true))
    }

    async fn approve_usdc(&self, spender: Address, amount: U256) -> lib_lisk::Result<TxHash> {
        let owner = self.check_submit()?;
        self.record(format!("approve_usdc({}, {})", spender, amount));
        self.allowances.lock().insert((owner, spender), amount);
        Ok(self.fresh_hash())
    }

    async fn create_loan(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        let owner = self.check_submit()?;
        self.record(format!("create_loan({})", amount));
        self.set_active_loan(owner, amount);
        Ok(self.fresh_hash())
    }

    async fn repay_loan(&self) -> lib_lisk::Result<TxHash> {
        let owner = self.check_submit()?;
        self.record("repay_loan()".to_string());
        if let Some(loan) = self.loans.lock().get_mut(&owner) {
            loan.is_active = false;
        }
        Ok(self.fresh_hash())
    }

    async fn pool_deposit(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        let owner = self.check_submit()?;
        self.record(format!("pool_deposit({})", amount));
        {
            let mut balances = self.usdc_balances.lock();
            let held = balances.entry(owner).or_default();
            *held = held.saturating_sub(amount);
        }
        *self.pool_balances.lock().entry(owner).or_default() += amount;
        *self.pool_total.lock() += amount;
        Ok(self.fresh_hash())
    }

    async fn pool_withdraw(&self, amount: U256) -> lib_lisk::Result<TxHash> {
        let owner = self.check_submit()?;
        self.record(format!("pool_withdraw({})", amount));
        {
            let mut balances = self.pool_balances.lock();
            let held = balances.entry(owner).or_default();
            *held = held.saturating_sub(amount);
        }
        {
            let mut total = self.pool_total.lock();
            *total = total.saturating_sub(amount);
        }
        *self.usdc_balances.lock().entry(owner).or_default() += amount;
        Ok(self.fresh_hash())
    }

    async fn restricted_execute(
        &self,
        wallet: Address,
        target: Address,
        data: Bytes,
    ) -> lib_lisk::Result<TxHash> {
        self.check_submit()?;
        self.record(format!(
            "restricted_execute({}, {}, 0x{})",
            wallet,
            target,
            alloy::hex::encode(&data)
        ));
        Ok(self.fresh_hash())
    }

    async fn restricted_withdraw(
        &self,
        wallet: Address,
        token: Address,
        amount: U256,
    ) -> lib_lisk::Result<TxHash> {
        self.check_submit()?;
        self.record(format!("restricted_withdraw({}, {}, {})", wallet, token, amount));
        let mut held = self.restricted.lock();
        let balance = held.entry((wallet, token)).or_default();
        *balance = balance.saturating_sub(amount);
        Ok(self.fresh_hash())
    }

    async fn restricted_withdraw_all(
        &self,
        wallet: Address,
        token: Address,
    ) -> lib_lisk::Result<TxHash> {
        self.check_submit()?;
        self.record(format!("restricted_withdraw_all({}, {})", wallet, token));
        self.restricted.lock().insert((wallet, token), U256::ZERO);
        Ok(self.fresh_hash())
    }

    async fn swap_exact_input(
        &self,
        wallet: Address,
        params: SwapParams,
    ) -> lib_lisk::Result<TxHash> {
        self.check_submit()?;
        self.record(format!(
            "swap_exact_input({}, {}->{}, fee={}, in={}, min_out={}, deadline={})",
            wallet,
            params.token_in,
            params.token_out,
            params.fee,
            params.amount_in,
            params.amount_out_minimum,
            params.deadline
        ));
        {
            let mut held = self.restricted.lock();
            let balance = held.entry((wallet, params.token_in)).or_default();
            *balance = balance.saturating_sub(params.amount_in);
            *held.entry((wallet, params.token_out)).or_default() += params.amount_out_minimum;
        }
        Ok(self.fresh_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> lib_lisk::Result<TxOutcome> {
        Ok(TxOutcome {
            hash,
            success: !self.revert_receipts.load(Ordering::SeqCst),
            block_number: Some(42),
        })
    }
}
