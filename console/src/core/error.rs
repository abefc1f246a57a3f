//! # Common Error Types
//!
//! Consolidated error handling for the console application.
//!
//! This module provides a centralized error type [`AppError`] that covers all
//! error scenarios in the console application.
//!
//! ## Error Categories
//!
//! Errors fall into three groups by how they are produced:
//!
//! - **Local pre-checks**: `Validation`, `InsufficientBalance`,
//!   `InsufficientRestrictedBalance`, `NoActiveLoan`, `LoanStillActive`,
//!   `ApprovalRequired`, `InFlight` — computed before any transaction is
//!   submitted; they block the action without contacting the ledger.
//! - **Submission failures**: `ApprovalFailed`, `TransactionFailed` — a write
//!   was rejected or reverted; the message is also stored on the action's
//!   transaction state and shown as a dismissible notification. Never
//!   auto-retried.
//! - **Infrastructure**: `Wallet` (no signing key / bad key material),
//!   `Ledger` (RPC or contract-call errors on the read side).
//!
//! ## Usage Pattern
//!
//! ```rust
//! use console::core::error::{AppError, Result};
//!
//! fn validate_amount(amount: f64) -> Result<f64> {
//!     if amount <= 0.0 {
//!         return Err(AppError::Validation("Amount must be positive".to_string()));
//!     }
//!     Ok(amount)
//! }
//! ```
//!
//! ## Error Conversion
//!
//! Common error types automatically convert to `AppError`:
//!
//! - `lib_lisk::ChainError` → `Wallet` / `Validation` / `Ledger` by variant
//! - `crate::trading::calc::AmountError` → `Validation`
//! - `String` → `AppError::Ledger`

use thiserror::Error;

use crate::trading::calc::AmountError;
use lib_lisk::ChainError;

/// Application-wide error type covering all error scenarios in the console.
///
/// Message-carrying variants include a descriptive `String` for context. The
/// `#[error]` attribute from `thiserror` provides the `Display` and `Error`
/// implementations.
///
/// # Example
///
/// ```rust
/// use console::core::error::AppError;
///
/// let err = AppError::Validation("Amount must be positive".to_string());
/// assert_eq!(err.to_string(), "Validation error: Amount must be positive");
/// assert_eq!(AppError::NoActiveLoan.to_string(), "No active loan for this wallet");
/// ```
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Input validation failure: out-of-bounds amount, not a number, unknown
    /// token symbol, malformed address. Recovered locally; the ledger is
    /// never contacted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An approve transaction was rejected by the wallet or reverted on
    /// chain.
    #[error("Approval failed: {0}")]
    ApprovalFailed(String),

    /// A spending transaction was rejected by the wallet or reverted on
    /// chain.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The signer's token balance does not cover the requested amount.
    /// Computed locally before submission.
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// The restricted wallet does not hold enough of the requested token.
    /// Computed locally before submission.
    #[error("Insufficient restricted-wallet balance: {0}")]
    InsufficientRestrictedBalance(String),

    /// The action requires an open loan (repay) and the ledger reports none.
    #[error("No active loan for this wallet")]
    NoActiveLoan,

    /// The action requires the loan to be repaid first (restricted-wallet
    /// swap / withdraw / execute while the loan is still open).
    #[error("Loan is still active; repay before moving restricted-wallet funds")]
    LoanStillActive,

    /// A spending action was attempted while the current allowance does not
    /// cover it; an approve transaction must succeed first.
    #[error("Approval required: {0}")]
    ApprovalRequired(String),

    /// A submission for this action is already pending; duplicate
    /// submissions are rejected locally instead of producing a second
    /// on-chain transaction.
    #[error("Already pending: {0}")]
    InFlight(String),

    /// Wallet/signing problem: no key configured (read-only mode) or the key
    /// material could not be used.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// RPC or contract-call failure outside the submission path (reads,
    /// health checks).
    #[error("Ledger error: {0}")]
    Ledger(String),
}

/// Convenience type alias for `Result<T, AppError>`.
///
/// Use this throughout the console crate for consistent error handling:
///
/// ```rust
/// use console::core::error::Result;
///
/// fn operation() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Wallet(msg) => AppError::Wallet(msg),
            ChainError::InvalidAmount(msg) => AppError::Validation(msg),
            other => AppError::Ledger(other.to_string()),
        }
    }
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Ledger(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Ledger(msg.to_string())
    }
}
