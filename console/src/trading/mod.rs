//! # Trading Math
//!
//! The pure derived-state layer: position/margin arithmetic, swap bounds,
//! validation, display formatting, and the token registry. Nothing in this
//! module performs I/O; the orchestration layer feeds it ledger values and
//! user input and renders what comes back.

pub mod calc;
pub mod tokens;

pub use calc::{AmountError, ApprovalPhase};
pub use tokens::{FeeTier, Token};
