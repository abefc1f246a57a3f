//! # Lisk Library
//!
//! Lisk chain integration for the Invalend protocol: RPC client, typed
//! contract bindings, unit conversion and explorer links.

// Declare all modules
pub mod client;
pub mod contracts;
pub mod error;
pub mod explorer;
pub mod units;

// Re-export commonly used types from root for convenience
pub use client::{LiskClient, LiskClientBuilder, Network, TxOutcome};
pub use client::{DEFAULT_RECEIPT_POLL, DEFAULT_RECEIPT_TIMEOUT};
pub use contracts::{Deployment, LoanInfo, SwapParams, USDC_DECIMALS};
pub use error::{ChainError, Result};
pub use units::{decimal_to_units, format_units, parse_units, units_to_decimal};
