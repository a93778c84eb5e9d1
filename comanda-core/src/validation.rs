//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! order service and the catalog.

use shared::error::{CoreError, CoreResult};

/// Entity names: menu items, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions (order note, item note, menu description)
pub const MAX_NOTE_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> CoreResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a positive, non-zero monetary amount.
pub fn validate_price(value: f64, field: &str) -> CoreResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_fails() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Tacos", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn oversized_note_fails() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(validate_optional_text(&Some(long), "note", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
    }

    #[test]
    fn negative_price_fails() {
        assert!(validate_price(-1.0, "price").is_err());
        assert!(validate_price(f64::NAN, "price").is_err());
        assert!(validate_price(0.0, "price").is_ok());
    }
}
