//! # Lisk RPC Client
//!
//! Provides a high-level wrapper around an alloy HTTP provider with network
//! management and optional local signing.
//!
//! ## Features
//!
//! - **Network Selection**: Easy switching between Lisk Mainnet and Lisk Sepolia
//! - **Local Signing**: Optional private-key signer for write transactions
//! - **Read-Only Mode**: A client built without a key can still serve view calls
//! - **Receipt Polling**: Await transaction confirmation with interval + timeout
//! - **Health Checks**: Verify RPC connectivity and chain-id agreement
//!
//! ## RPC Endpoints
//!
//! - Mainnet: `https://rpc.api.lisk.com` (chain id 1135)
//! - Sepolia: `https://rpc.sepolia-api.lisk.com` (chain id 4202)
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_lisk::client::{LiskClient, Network};
//!
//! # fn main() -> lib_lisk::Result<()> {
//! // Read-only client against the test network
//! let client = LiskClient::builder()
//!     .network(Network::Sepolia)
//!     .build()?;
//!
//! // Signing client with a custom endpoint
//! let signing = LiskClient::builder()
//!     .network(Network::Sepolia)
//!     .rpc_url("https://my-node.example.com".to_string())
//!     .private_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string())
//!     .build()?;
//! # let _ = (client, signing);
//! # Ok(())
//! # }
//! ```

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ChainError, Result};

/// Default interval between receipt polls.
pub const DEFAULT_RECEIPT_POLL: Duration = Duration::from_secs(2);

/// Default ceiling on how long a submitted transaction is watched.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Lisk network selection.
///
/// Determines which chain the client connects to:
///
/// - **Mainnet**: Production network with real economic value
/// - **Sepolia**: Test network where the protocol's current deployment lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Lisk mainnet (production network)
    Mainnet,
    /// Lisk Sepolia testnet
    Sepolia,
}

impl Network {
    /// EVM chain id for this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1135,
            Network::Sepolia => 4202,
        }
    }

    /// Default public RPC endpoint.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://rpc.api.lisk.com",
            Network::Sepolia => "https://rpc.sepolia-api.lisk.com",
        }
    }

    /// Blockscout explorer base URL (no trailing slash).
    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://blockscout.lisk.com",
            Network::Sepolia => "https://sepolia-blockscout.lisk.com",
        }
    }

    /// Human-readable network label.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Mainnet => "Lisk",
            Network::Sepolia => "Lisk Sepolia",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "lisk" => Ok(Network::Mainnet),
            "sepolia" | "lisk-sepolia" | "testnet" => Ok(Network::Sepolia),
            other => Err(ChainError::Config(format!("unknown network: {}", other))),
        }
    }
}

/// Outcome of a confirmed transaction.
#[derive(Debug, Clone, Copy)]
pub struct TxOutcome {
    pub hash: TxHash,
    /// True when the receipt reports success, false on revert.
    pub success: bool,
    pub block_number: Option<u64>,
}

/// High-level Lisk RPC client.
///
/// Wraps an erased alloy provider so the rest of the workspace never deals
/// with the concrete filler/transport type soup. When built with a private
/// key the provider signs and submits transactions locally; without one the
/// client is read-only and write paths fail fast with a wallet error.
pub struct LiskClient {
    provider: DynProvider,
    network: Network,
    signer_address: Option<Address>,
}

/// Builder for configuring a [`LiskClient`].
#[derive(Debug, Clone, Default)]
pub struct LiskClientBuilder {
    network: Option<Network>,
    rpc_url: Option<String>,
    private_key: Option<String>,
}

impl LiskClientBuilder {
    /// Set the target network.
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Set a custom RPC URL (overrides the network default).
    pub fn rpc_url(mut self, url: String) -> Self {
        self.rpc_url = Some(url);
        self
    }

    /// Set the hex-encoded private key used for signing writes.
    pub fn private_key(mut self, key: String) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Build the client with the configured settings.
    pub fn build(self) -> Result<LiskClient> {
        let network = self.network.unwrap_or(Network::Sepolia);
        let rpc_url = self
            .rpc_url
            .unwrap_or_else(|| network.rpc_url().to_string());
        let url: Url = rpc_url
            .parse()
            .map_err(|e| ChainError::Config(format!("invalid RPC URL {}: {}", rpc_url, e)))?;

        info!("🔗 Connecting to Lisk RPC: {} ({})", rpc_url, network.label());

        let (provider, signer_address) = match self.private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .trim()
                    .parse()
                    .map_err(|e| ChainError::Wallet(format!("invalid private key: {}", e)))?;
                let address = signer.address();
                let wallet = EthereumWallet::from(signer);
                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_http(url)
                    .erased();
                (provider, Some(address))
            }
            None => {
                let provider = ProviderBuilder::new().connect_http(url).erased();
                (provider, None)
            }
        };

        Ok(LiskClient {
            provider,
            network,
            signer_address,
        })
    }
}

impl LiskClient {
    /// Create a new client using a builder for configuration.
    pub fn builder() -> LiskClientBuilder {
        LiskClientBuilder::default()
    }

    /// The erased provider, for contract bindings.
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    /// The network this client targets.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Address of the configured signer, if any.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    /// Signer address, or a wallet error when the client is read-only.
    pub fn require_signer(&self) -> Result<Address> {
        self.signer_address
            .ok_or_else(|| ChainError::Wallet("no signing key configured".to_string()))
    }

    /// Verify RPC connectivity and that the endpoint serves the expected chain.
    ///
    /// Returns the reported chain id on success.
    pub async fn health_check(&self) -> Result<u64> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Rpc(format!("chain id query failed: {}", e)))?;

        if chain_id != self.network.chain_id() {
            return Err(ChainError::Config(format!(
                "RPC serves chain {} but {} expects {}",
                chain_id,
                self.network.label(),
                self.network.chain_id()
            )));
        }

        debug!("RPC health check ok, chain id {}", chain_id);
        Ok(chain_id)
    }

    /// Poll for a transaction receipt until it lands or `timeout` elapses.
    ///
    /// Transient RPC failures during polling are logged and retried; only the
    /// timeout produces an error. Once submitted, a transaction cannot be
    /// cancelled from here, so callers decide how long they care to watch.
    pub async fn wait_for_receipt(
        &self,
        hash: TxHash,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<TxOutcome> {
        let started = Instant::now();
        debug!("watching receipt for {}", hash);

        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let success = receipt.status();
                    debug!(
                        "receipt for {} in block {:?}: {}",
                        hash,
                        receipt.block_number,
                        if success { "success" } else { "reverted" }
                    );
                    return Ok(TxOutcome {
                        hash,
                        success,
                        block_number: receipt.block_number,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!("receipt poll for {} failed: {}", hash, e),
            }

            if started.elapsed() >= timeout {
                return Err(ChainError::Rpc(format!(
                    "timed out after {}s waiting for receipt of {}",
                    timeout.as_secs(),
                    hash
                )));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
