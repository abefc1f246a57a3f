//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, and validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_opt, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{format_relative, format_time, from_unix, now_utc, unix_now};
pub use validation::{validate_address, validate_decimal, validate_not_empty};
