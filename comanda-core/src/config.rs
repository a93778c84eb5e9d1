//! Runtime configuration
//!
//! Loaded once at startup from environment variables with sensible defaults,
//! then passed explicitly into the services that need it.

use chrono::NaiveDate;
use chrono_tz::Tz;

/// Default country code prefixed to 10-digit customer phones
const DEFAULT_COUNTRY_CODE: &str = "52";

/// Default bounded retries on optimistic-concurrency conflicts
const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// Default change-feed broadcast capacity
const DEFAULT_FEED_CAPACITY: usize = 1024;

/// Default business timezone (the restaurant's local zone)
const DEFAULT_TIMEZONE: &str = "America/Hermosillo";

#[derive(Debug, Clone)]
pub struct Config {
    /// Country code for phone normalization
    pub country_code: String,
    /// How many times a transition is retried after `ConflictError`
    /// before surfacing to the user
    pub conflict_retry_limit: u32,
    /// Capacity of the change-feed broadcast channel
    pub feed_channel_capacity: usize,
    /// Business timezone, used to stamp `business_date` on sales records
    pub business_timezone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            conflict_retry_limit: DEFAULT_CONFLICT_RETRIES,
            feed_channel_capacity: DEFAULT_FEED_CAPACITY,
            business_timezone: DEFAULT_TIMEZONE.parse().unwrap_or(chrono_tz::UTC),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults. `.env` files are honored when present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let country_code = std::env::var("COMANDA_COUNTRY_CODE")
            .ok()
            .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(defaults.country_code);

        let conflict_retry_limit = std::env::var("COMANDA_CONFLICT_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.conflict_retry_limit);

        let feed_channel_capacity = std::env::var("COMANDA_FEED_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.feed_channel_capacity);

        let business_timezone = std::env::var("COMANDA_TIMEZONE")
            .ok()
            .and_then(|v| v.parse::<Tz>().ok())
            .unwrap_or(defaults.business_timezone);

        Self {
            country_code,
            conflict_retry_limit,
            feed_channel_capacity,
            business_timezone,
        }
    }

    /// Today's business date in the restaurant's timezone
    pub fn business_date(&self) -> NaiveDate {
        chrono::Utc::now()
            .with_timezone(&self.business_timezone)
            .date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.country_code, "52");
        assert_eq!(cfg.conflict_retry_limit, 3);
        assert_eq!(cfg.business_timezone.name(), "America/Hermosillo");
    }
}
