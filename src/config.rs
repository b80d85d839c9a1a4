// Configuration injected into the checker, reconciler and notifier at construction

use std::env;

use crate::availability::BookingPolicy;
use crate::error::{BookingError, BookingResult};

// Payment gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chapa.co/v1".to_string(),
            secret_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> BookingResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(BookingError::Config(format!(
                "gateway base url must be http(s): {}",
                self.base_url
            )));
        }
        if self.secret_key.is_empty() {
            return Err(BookingError::Config("gateway secret key is empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(BookingError::Config("gateway timeout must be non-zero".into()));
        }
        Ok(())
    }
}

// How the amount charged for a booking is derived from the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPolicy {
    // One night's price regardless of stay length
    NightlyRate,
    FullStay,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        AmountPolicy::NightlyRate
    }
}

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub currency: String,
    // Payer lands on {return_url_base}/{payment_id}/ after checkout
    pub return_url_base: String,
    pub customization_title: String,
    pub amount_policy: AmountPolicy,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            currency: "ETB".to_string(),
            return_url_base: "https://yourdomain.com/payment/success".to_string(),
            customization_title: "Booking Payment".to_string(),
            amount_policy: AmountPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub from_address: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 256,
            from_address: "bookings@example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub reconciler: ReconcilerConfig,
    pub notifier: NotifierConfig,
    pub booking_policy: BookingPolicy,
}

impl AppConfig {
    // Unset variables fall back to the defaults
    pub fn from_env() -> BookingResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> BookingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(url) = lookup("CHAPA_BASE_URL") {
            config.gateway.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = lookup("CHAPA_SECRET_KEY") {
            config.gateway.secret_key = key;
        }
        if let Some(ms) = lookup("CHAPA_TIMEOUT_MS") {
            config.gateway.timeout_ms = parse_number("CHAPA_TIMEOUT_MS", &ms)?;
        }

        if let Some(currency) = lookup("PAYMENT_CURRENCY") {
            config.reconciler.currency = currency.to_uppercase();
        }
        if let Some(url) = lookup("PAYMENT_RETURN_URL") {
            config.reconciler.return_url_base = url.trim_end_matches('/').to_string();
        }
        if let Some(policy) = lookup("PAYMENT_AMOUNT_POLICY") {
            config.reconciler.amount_policy = match policy.as_str() {
                "nightly" => AmountPolicy::NightlyRate,
                "full_stay" => AmountPolicy::FullStay,
                other => {
                    return Err(BookingError::Config(format!(
                        "PAYMENT_AMOUNT_POLICY must be nightly or full_stay, got {}",
                        other
                    )))
                }
            };
        }

        if let Some(workers) = lookup("NOTIFIER_WORKERS") {
            config.notifier.workers = parse_number("NOTIFIER_WORKERS", &workers)?;
        }
        if let Some(capacity) = lookup("NOTIFIER_QUEUE_CAPACITY") {
            config.notifier.queue_capacity = parse_number("NOTIFIER_QUEUE_CAPACITY", &capacity)?;
        }
        if let Some(from) = lookup("NOTIFIER_FROM_ADDRESS") {
            config.notifier.from_address = from;
        }

        if let Some(policy) = lookup("BOOKING_POLICY") {
            config.booking_policy = match policy.as_str() {
                "auto_confirm" => BookingPolicy::AutoConfirm,
                "require_confirmation" => BookingPolicy::RequireConfirmation,
                other => {
                    return Err(BookingError::Config(format!(
                        "BOOKING_POLICY must be auto_confirm or require_confirmation, got {}",
                        other
                    )))
                }
            };
        }

        if config.notifier.workers == 0 || config.notifier.queue_capacity == 0 {
            return Err(BookingError::Config(
                "notifier needs at least one worker and a non-empty queue".into(),
            ));
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> BookingResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| BookingError::Config(format!("{} is not a valid number: {}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.gateway.base_url, "https://api.chapa.co/v1");
        assert_eq!(config.reconciler.currency, "ETB");
        assert_eq!(config.reconciler.amount_policy, AmountPolicy::NightlyRate);
        assert_eq!(config.booking_policy, BookingPolicy::AutoConfirm);
        // no secret key yet
        assert!(config.gateway.validate().is_err());
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHAPA_BASE_URL", "http://localhost:9000/v1/"),
            ("CHAPA_SECRET_KEY", "CHASECK_TEST-abc"),
            ("CHAPA_TIMEOUT_MS", "2500"),
            ("PAYMENT_CURRENCY", "usd"),
            ("PAYMENT_AMOUNT_POLICY", "full_stay"),
            ("NOTIFIER_WORKERS", "4"),
            ("BOOKING_POLICY", "require_confirmation"),
        ]))
        .unwrap();

        assert_eq!(config.gateway.base_url, "http://localhost:9000/v1");
        assert_eq!(config.gateway.timeout_ms, 2500);
        assert!(config.gateway.validate().is_ok());
        assert_eq!(config.reconciler.currency, "USD");
        assert_eq!(config.reconciler.amount_policy, AmountPolicy::FullStay);
        assert_eq!(config.notifier.workers, 4);
        assert_eq!(config.booking_policy, BookingPolicy::RequireConfirmation);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_number = AppConfig::from_lookup(lookup(&[("CHAPA_TIMEOUT_MS", "soon")]));
        assert!(matches!(bad_number, Err(BookingError::Config(_))));

        let bad_policy = AppConfig::from_lookup(lookup(&[("BOOKING_POLICY", "maybe")]));
        assert!(matches!(bad_policy, Err(BookingError::Config(_))));

        let no_workers = AppConfig::from_lookup(lookup(&[("NOTIFIER_WORKERS", "0")]));
        assert!(no_workers.is_err());
    }
}
