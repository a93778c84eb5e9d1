//! Customer phone normalization (MX numbers)
//!
//! The legacy clients accept a 10-digit local number and prefix the country
//! code automatically; a number that already carries the prefix is respected.
//! Anything else is rejected before an order is created.

use crate::error::{CoreError, CoreResult};

/// Country code prepended to 10-digit local numbers
pub const DEFAULT_COUNTRY_CODE: &str = "52";

/// Digits in a local number, without country code
const LOCAL_DIGITS: usize = 10;

/// Strip every non-digit character
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a raw phone input to `country_code + 10 digits`.
///
/// - exactly 10 digits: the country code is prefixed
/// - country code followed by 10 digits: accepted as-is
/// - anything else: `Validation` error, no order is created
pub fn normalize(raw: &str, country_code: &str) -> CoreResult<String> {
    let digits = clean(raw);
    let full_len = country_code.len() + LOCAL_DIGITS;

    if digits.len() == LOCAL_DIGITS {
        return Ok(format!("{}{}", country_code, digits));
    }
    if digits.len() == full_len && digits.starts_with(country_code) {
        return Ok(digits);
    }
    Err(CoreError::validation(format!(
        "Invalid phone number: expected {} digits (or {}-prefixed {} digits), got {}",
        LOCAL_DIGITS,
        country_code,
        full_len,
        digits.len()
    )))
}
