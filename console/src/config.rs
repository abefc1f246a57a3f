//! # Configuration
//!
//! Runtime settings, all sourced from `INVALEND_*` environment variables
//! (main loads a `.env` file first). Everything has a default except the
//! signing key; without one the console runs read-only.

use std::path::PathBuf;
use std::time::Duration;

use lib_lisk::{Network, DEFAULT_RECEIPT_POLL, DEFAULT_RECEIPT_TIMEOUT};
use lib_utils::envs::{get_env_opt, get_env_or, get_env_parse_or};

use crate::core::{AppError, Result};

/// Default seconds between background refreshes of the tracked reads.
const DEFAULT_READ_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Target network (`INVALEND_NETWORK`, default sepolia).
    pub network: Network,
    /// Custom RPC endpoint (`INVALEND_RPC_URL`); network default when unset.
    pub rpc_url: Option<String>,
    /// Hex signing key (`INVALEND_PRIVATE_KEY`); read-only mode when unset.
    pub private_key: Option<String>,
    /// Interval between receipt polls (`INVALEND_RECEIPT_POLL_MS`).
    pub receipt_poll: Duration,
    /// How long a submitted transaction is watched (`INVALEND_RECEIPT_TIMEOUT_SECS`).
    pub receipt_timeout: Duration,
    /// Background refresh interval for tracked reads (`INVALEND_READ_REFRESH_SECS`).
    pub read_refresh: Duration,
    /// Directory for the rolling JSON log (`INVALEND_LOG_DIR`, default `logs`).
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let network = match get_env_opt("INVALEND_NETWORK") {
            Some(raw) => raw
                .parse::<Network>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
            None => Network::Sepolia,
        };

        let receipt_poll_ms: u64 = get_env_parse_or(
            "INVALEND_RECEIPT_POLL_MS",
            DEFAULT_RECEIPT_POLL.as_millis() as u64,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;
        let receipt_timeout_secs: u64 = get_env_parse_or(
            "INVALEND_RECEIPT_TIMEOUT_SECS",
            DEFAULT_RECEIPT_TIMEOUT.as_secs(),
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;
        let read_refresh_secs: u64 =
            get_env_parse_or("INVALEND_READ_REFRESH_SECS", DEFAULT_READ_REFRESH_SECS)
                .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(Self {
            network,
            rpc_url: get_env_opt("INVALEND_RPC_URL"),
            private_key: get_env_opt("INVALEND_PRIVATE_KEY"),
            receipt_poll: Duration::from_millis(receipt_poll_ms),
            receipt_timeout: Duration::from_secs(receipt_timeout_secs),
            read_refresh: Duration::from_secs(read_refresh_secs),
            log_dir: PathBuf::from(get_env_or("INVALEND_LOG_DIR", "logs")),
        })
    }

    /// Whether the session will run without a signer.
    pub fn is_read_only(&self) -> bool {
        self.private_key.is_none()
    }
}
