//! # Protocol Contract Bindings
//!
//! `sol!`-generated typed bindings for the protocol surface this client
//! consumes, plus the per-network deployment registry. Only the functions the
//! client actually calls are declared; the on-chain contracts carry more.
//!
//! ## Contracts
//!
//! - **USDC** (mock, 6 decimals): the single settlement asset
//! - **LendingPool**: depositor side, funds 80% of every position
//! - **LoanManager**: loan lifecycle (create, repay, per-user loan record)
//! - **RestrictedWallet**: per-loan contract account with target/selector/token
//!   allowlists, created by the factory when a loan activates

use alloy::primitives::{address, Address};
use alloy::sol;

use crate::client::Network;

pub mod erc20;
pub mod lending_pool;
pub mod loan_manager;
pub mod restricted_wallet;

pub use loan_manager::LoanInfo;
pub use restricted_wallet::SwapParams;

/// Decimals of the protocol's settlement asset.
pub const USDC_DECIMALS: u8 = 6;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface ILoanManager {
        function getLoanInfo(address user) external view returns (
            uint256 loanAmount,
            uint256 marginAmount,
            uint256 poolFunding,
            uint256 startTime,
            address restrictedWallet,
            bool isActive
        );
        function getRequiredMargin(uint256 amount) external view returns (uint256);
        function getPoolFunding(uint256 amount) external view returns (uint256);
        function createLoan(uint256 amount) external;
        function repayLoan() external;
    }

    #[sol(rpc)]
    interface ILendingPool {
        function deposit(uint256 amount) external;
        function withdraw(uint256 amount) external;
        function balanceOf(address owner) external view returns (uint256);
        function totalDeposits() external view returns (uint256);
    }

    #[sol(rpc)]
    interface IRestrictedWallet {
        function execute(address target, bytes calldata data) external;
        function withdraw(address token, uint256 amount) external;
        function withdrawAll(address token) external;
        function getBalance(address token) external view returns (uint256);
        function isTargetApproved(address target) external view returns (bool);
        function isSelectorApproved(bytes4 selector) external view returns (bool);
        function isTokenWhitelisted(address token) external view returns (bool);
        function swapExactInputSingle(
            address router,
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint256 amountOutMinimum,
            uint256 deadline
        ) external returns (uint256 amountOut);
    }
}

/// Addresses of one protocol deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub usdc: Address,
    pub lending_pool: Address,
    pub collateral_manager: Address,
    pub loan_manager: Address,
    pub restricted_wallet_factory: Address,
    pub swap_router: Address,
}

impl Deployment {
    /// The current testnet deployment.
    pub fn lisk_sepolia() -> Self {
        Self {
            usdc: address!("e61995e2728bd2d2b1abd9e089213b542db7916a"),
            lending_pool: address!("30426d33a78afdb8788597d2bfbd097a33d9c482"),
            collateral_manager: address!("a5e7c9cb25502a9557e8a1f36b5fa8712f00d2e5"),
            loan_manager: address!("568c3ff5d4cba7ab4ab5d00b1f37ba64b0ba3b25"),
            restricted_wallet_factory: address!("3f2a1cf0ae6f4b8d0ee3bd442b6d7f44c52b9e7c"),
            swap_router: address!("1b3f5a9d7e24c08b6f0d2a44a1e9c35b8d472f60"),
        }
    }

    /// Deployment for a network, if the protocol is live there.
    pub fn for_network(network: Network) -> Option<Self> {
        match network {
            Network::Sepolia => Some(Self::lisk_sepolia()),
            // No mainnet deployment yet
            Network::Mainnet => None,
        }
    }
}
