//! Generator configuration.
//!
//! Nothing tenant- or offering-specific lives here; those are call parameters.

use std::env;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

pub const TIMEZONE_VAR: &str = "SLOTS_TIMEZONE";
pub const FETCH_TIMEOUT_VAR: &str = "SLOTS_FETCH_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Zone whose local midnight anchors every window offset.
    pub timezone: Tz,
    /// Deadline for the joined window + booking fetch. Expiry is a cancellation.
    pub fetch_timeout: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            fetch_timeout: None,
        }
    }
}

impl GeneratorConfig {
    /// Read `SLOTS_TIMEZONE` and `SLOTS_FETCH_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their default;
    /// unparseable ones keep it too, with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEZONE_VAR) {
            match raw.parse::<Tz>() {
                Ok(tz) => config.timezone = tz,
                Err(_) => {
                    warn!("{} '{}' is not an IANA timezone, using UTC", TIMEZONE_VAR, raw)
                }
            }
        }

        if let Some(raw) = lookup(FETCH_TIMEOUT_VAR) {
            match raw.parse::<u64>() {
                Ok(0) => config.fetch_timeout = None,
                Ok(ms) => config.fetch_timeout = Some(Duration::from_millis(ms)),
                Err(_) => warn!(
                    "{} '{}' is not a number of milliseconds, ignoring",
                    FETCH_TIMEOUT_VAR, raw
                ),
            }
        }

        config
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Option<Duration>) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = GeneratorConfig::from_lookup(|_| None);
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.timezone, Tz::UTC);
        assert!(config.fetch_timeout.is_none());
    }

    #[test]
    fn reads_timezone_and_timeout() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            (TIMEZONE_VAR, "America/Sao_Paulo"),
            (FETCH_TIMEOUT_VAR, "250"),
        ]));
        assert_eq!(config.timezone, chrono_tz::America::Sao_Paulo);
        assert_eq!(config.fetch_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            (TIMEZONE_VAR, "Mars/Olympus_Mons"),
            (FETCH_TIMEOUT_VAR, "soon"),
        ]));
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[(FETCH_TIMEOUT_VAR, "0")]));
        assert!(config.fetch_timeout.is_none());
    }
}
