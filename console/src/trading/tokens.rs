//! Token registry for the Lisk Sepolia deployment.
//!
//! Reference USD prices are display strings (thousands separators included)
//! exactly as the marketing site shows them; [`Token::price`] parses them
//! tolerantly for the calculator.

use alloy::primitives::{address, Address};
use rust_decimal::Decimal;

use crate::trading::calc::parse_decimal;

/// A swappable token known to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: Address,
    pub decimals: u8,
    /// Reference USD price as displayed, e.g. `"43,250.75"`.
    pub usd_price: &'static str,
}

impl Token {
    /// Reference price parsed for arithmetic; `None` if the display string is
    /// malformed.
    pub fn price(&self) -> Option<Decimal> {
        parse_decimal(self.usd_price)
    }
}

/// Uniswap-v3 style pool fee tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeTier {
    /// 0.05%, stable-to-stable pairs.
    Low,
    /// 0.3%, the default tier.
    Medium,
    /// 1%, volatile pairs.
    High,
}

impl FeeTier {
    /// Fee in hundredths of a bip, the unit the router expects.
    pub fn value(&self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    /// Human-readable tier label.
    pub fn label(&self) -> &'static str {
        match self {
            FeeTier::Low => "0.05%",
            FeeTier::Medium => "0.3%",
            FeeTier::High => "1%",
        }
    }
}

/// Tokens tradable through the restricted wallet on Lisk Sepolia.
pub const TOKENS: [Token; 5] = [
    Token {
        symbol: "ETH",
        name: "Ethereum",
        // OP-stack WETH predeploy
        address: address!("4200000000000000000000000000000000000006"),
        decimals: 18,
        usd_price: "2,456.78",
    },
    Token {
        symbol: "USDC",
        name: "USD Coin",
        address: address!("e61995e2728bd2d2b1abd9e089213b542db7916a"),
        decimals: 6,
        usd_price: "1.00",
    },
    Token {
        symbol: "WBTC",
        name: "Wrapped Bitcoin",
        address: address!("7d9c3f2b85e04c1a6f08b22b7a9e5d413c6a9b18"),
        decimals: 8,
        usd_price: "43,250.75",
    },
    Token {
        symbol: "LSK",
        name: "Lisk",
        address: address!("8a21cf9ba08ae709d64cb25afaa951183ec9ff6d"),
        decimals: 18,
        usd_price: "1.25",
    },
    Token {
        symbol: "UNI",
        name: "Uniswap",
        address: address!("41e94eb019c0762f9bfcf9fb1e58725bfb0e7582"),
        decimals: 18,
        usd_price: "12.40",
    },
];

/// All registered tokens.
pub fn all() -> &'static [Token] {
    &TOKENS
}

/// Look a token up by symbol, case-insensitively.
pub fn find(symbol: &str) -> Option<&'static Token> {
    TOKENS.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// The settlement asset.
pub fn usdc() -> &'static Token {
    find("USDC").expect("USDC is always registered")
}

/// Fee tier to quote for a pair. LSK pools are thin on testnet, so anything
/// touching LSK gets the 1% tier; every other pair defaults to 0.3%.
pub fn recommended_fee_tier(token_in: &Token, token_out: &Token) -> FeeTier {
    if token_in.symbol == "LSK" || token_out.symbol == "LSK" {
        FeeTier::High
    } else {
        FeeTier::Medium
    }
}
