//! # Block Explorer Links
//!
//! URL builders for the per-network Blockscout instance, plus short address
//! display formatting.

use alloy::primitives::{Address, TxHash};

use crate::client::Network;

/// Explorer URL for a transaction.
///
/// # Example
///
/// ```rust
/// use lib_lisk::{explorer, Network};
/// use alloy::primitives::TxHash;
///
/// let url = explorer::tx_url(Network::Sepolia, TxHash::ZERO);
/// assert!(url.starts_with("https://sepolia-blockscout.lisk.com/tx/0x"));
/// ```
pub fn tx_url(network: Network, hash: TxHash) -> String {
    format!("{}/tx/{}", network.explorer_url(), hash)
}

/// Explorer URL for an account.
pub fn address_url(network: Network, address: Address) -> String {
    format!("{}/address/{}", network.explorer_url(), address)
}

/// Explorer URL for a token contract.
pub fn token_url(network: Network, token: Address) -> String {
    format!("{}/token/{}", network.explorer_url(), token)
}

/// Shorten an address for display: first four and last four hex digits,
/// checksum casing preserved.
///
/// # Example
///
/// ```rust
/// use lib_lisk::explorer::short_address;
/// use alloy::primitives::address;
///
/// let addr = address!("e61995e2728bd2d2b1abd9e089213b542db7916a");
/// let short = short_address(addr);
/// assert!(short.starts_with("0x"));
/// assert_eq!(short.len(), 13);
/// ```
pub fn short_address(address: Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_urls() {
        let token = address!("e61995e2728bd2d2b1abd9e089213b542db7916a");
        assert_eq!(
            token_url(Network::Sepolia, token),
            format!("https://sepolia-blockscout.lisk.com/token/{}", token)
        );
        assert!(address_url(Network::Mainnet, token).starts_with("https://blockscout.lisk.com/address/0x"));
        assert!(tx_url(Network::Sepolia, TxHash::ZERO).contains("/tx/0x"));
    }

    #[test]
    fn test_short_address() {
        let addr = address!("a7e82b23460233c71e8553387b2d870003a34a50");
        let short = short_address(addr);
        assert!(short.starts_with("0x"));
        assert_eq!(short.len(), 13);
        assert!(short.contains("..."));
    }
}
