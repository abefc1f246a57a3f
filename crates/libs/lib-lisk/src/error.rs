//! # Chain Error Types
//!
//! Error handling for RPC transport, contract calls and wallet/signer issues.
//! Variants carry human-readable strings so upper layers can surface them
//! directly in notifications.

use thiserror::Error;

/// Errors produced by the chain access layer.
#[derive(Error, Debug, Clone)]
pub enum ChainError {
    /// RPC transport failure (connection, timeout, bad response)
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract call rejected or reverted
    #[error("Contract error: {0}")]
    Contract(String),

    /// Signer missing or key material invalid
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Bad client configuration (URL, network)
    #[error("Config error: {0}")]
    Config(String),

    /// Amount string could not be converted to/from base units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Convenience result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
