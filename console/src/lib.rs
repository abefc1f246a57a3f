//! # Invalend Console - Library Root
//!
//! An interactive console for the Invalend leverage protocol on **Lisk
//! Sepolia**. This library crate contains all modules used by the binary
//! crate (`main.rs`).
//!
//! ## Features
//!
//! - **Leveraged Positions**: Open 5x positions with 20% margin, funded by
//!   the lending pool
//! - **Lending**: Deposit and withdraw pool USDC
//! - **Restricted Wallets**: Withdraw, swap and proxy-call through the
//!   per-loan contract wallet once the loan is repaid
//! - **Approve-then-Act**: ERC-20 allowances are checked locally and the
//!   approval step is sequenced before every spending write
//! - **Live Reads**: Tracked ledger reads with refetch-on-confirmation and
//!   periodic background refresh
//!
//! ## Architecture
//!
//! ### Technology Stack
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              console (this crate)                      │
//! ├────────────────────────────────────────────────────────┤
//! │  tokio          - Async runtime                        │
//! │  alloy          - EVM types, RPC provider, signing     │
//! │  rust_decimal   - Exact display-side arithmetic        │
//! │  async-channel  - Background task to main loop events  │
//! │  tracing        - Structured JSON logging              │
//! └────────────────────────────────────────────────────────┘
//!          │
//!          │ JSON-RPC (via lib-lisk)
//!          ▼
//! ┌─────────────────────────────────────────┐
//! │   Lisk Sepolia                          │
//! │   USDC / LendingPool / LoanManager /    │
//! │   RestrictedWallet contracts            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: Session orchestration
//!   - `Dashboard`: shared context (ledger, reads, actions, wallet, notices)
//!   - `handlers`: one module per command group, local gating before submit
//!   - `reads`: keyed read cache with loading and error tracking
//!   - `state`: per-action Idle → Pending → Success | Error machine
//!
//! - **trading**: Pure derived state
//!   - `calc`: margin, slippage, validation and formatting rules
//!   - `tokens`: the tradeable token registry and fee tiers
//!
//! - **services**: Long-lived collaborators
//!   - `ledger`: live [`core::LedgerService`] implementation over lib-lisk
//!   - `wallet`: wallet session lifecycle
//!   - `notifications`: transaction-progress and status notices
//!
//! - **core**: The [`core::LedgerService`] trait and the error register
//!
//! - **config**: `INVALEND_*` environment configuration
//!
//! ## Core Concepts
//!
//! ### Event-Driven Confirmation
//!
//! Writes are two-phase. A handler validates, submits and marks its action
//! Pending; a spawned watcher polls for the receipt and reports back over an
//! **async channel**. The main loop folds the outcome into state via
//! `Dashboard::apply`, which also refetches the reads the transaction
//! invalidated. Handlers never mutate reads directly, so the display always
//! reflects what the ledger reports.
//!
//! ### State Management
//!
//! Shared state lives behind `parking_lot` locks held only for short
//! synchronous sections; nothing holds a lock across an await. Background
//! tasks get their own `Arc` clones of the ledger and the read store.
//!
//! ### Read-Only Mode
//!
//! Without `INVALEND_PRIVATE_KEY` the console still serves every read
//! command; owner-keyed reads stay disabled and write commands fail fast
//! with a wallet error.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin console
//! ```
//!
//! Then at the prompt: `help`, `status`, `preview 1000`, `approve loan`,
//! `borrow 1000`, `repay`, `deposit 500`, `swap USDC LSK 100`, `snapshot`.
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib
//! ```
//!
//! Unit tests run against an in-memory mock ledger with instant receipts;
//! no network access is required.

// All modules are public to enable library usage and testing
pub mod app;
pub mod config;
pub mod core;
pub mod services;
pub mod trading;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the types nearly every consumer touches
pub use app::{AppEvent, Dashboard};
pub use config::Config;
pub use core::{AppError, Result};
