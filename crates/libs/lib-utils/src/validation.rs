//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string parses as a non-negative decimal number.
pub fn validate_decimal(value: &str, field_name: &str) -> Result<(), String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
        _ => Err(format!("{} must be a non-negative number", field_name)),
    }
}

/// Validate that a hex string looks like a 20-byte EVM address.
pub fn validate_address(value: &str) -> Result<(), String> {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err("Invalid address format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("amount", "field").is_ok());
        assert!(validate_not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_decimal() {
        assert!(validate_decimal("100.5", "amount").is_ok());
        assert!(validate_decimal("0", "amount").is_ok());
        assert!(validate_decimal("-1", "amount").is_err());
        assert!(validate_decimal("abc", "amount").is_err());
        assert!(validate_decimal("NaN", "amount").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("0xe61995e2728bd2d2b1abd9e089213b542db7916a").is_ok());
        assert!(validate_address("e61995e2728bd2d2b1abd9e089213b542db7916a").is_ok());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xZZ1995e2728bd2d2b1abd9e089213b542db7916a").is_err());
    }
}
