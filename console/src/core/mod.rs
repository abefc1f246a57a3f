//! # Core Abstractions
//!
//! Error types and the service seam the rest of the console builds on.
//!
//! - **[`error`]**: Application error types (`AppError`, `Result<T>`)
//! - **[`service`]**: The ledger-service trait behind which every on-chain
//!   read and write sits; production code talks to an RPC-backed
//!   implementation, tests talk to an in-memory mock.
//!
//! Fallible application code returns the crate-wide [`Result`]:
//!
//! ```rust
//! use console::core::{AppError, Result};
//! use rust_decimal::Decimal;
//!
//! fn parse_slippage(input: &str) -> Result<Decimal> {
//!     input
//!         .parse()
//!         .map_err(|_| AppError::Validation(format!("not a number: {input}")))
//! }
//! ```

pub mod error;
pub mod service;

pub use error::{AppError, Result};
pub use service::LedgerService;
