use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use stockroom_core::management_number::{GenrePrefixes, DEFAULT_PAD_WIDTH};

/// Default deadline for one ledger operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(10);

/// Widest id segment accepted for management numbers.
const MAX_PAD_WIDTH: usize = 12;

/// Default offset of the registration date embedded in management numbers
/// (Asia/Tokyo, which observes no DST).
const DEFAULT_REGISTRATION_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("GENRE_PREFIXES is invalid: {0}")]
    GenrePrefixes(String),
}

/// Ledger engine configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Upper bound on the duration of any single operation, including
    /// waiting for a pooled connection and for row locks.
    pub op_timeout: Duration,
    /// Zero-padding width of the id segment of management numbers.
    pub pad_width: usize,
    /// Genre id to management number prefix table.
    pub genre_prefixes: GenrePrefixes,
    /// UTC offset whose calendar date goes into new management numbers.
    pub registration_offset: FixedOffset,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            op_timeout: DEFAULT_OP_TIMEOUT,
            pad_width: DEFAULT_PAD_WIDTH,
            genre_prefixes: GenrePrefixes::default(),
            registration_offset: FixedOffset::east_opt(DEFAULT_REGISTRATION_OFFSET_SECS)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                           |
    /// |-------------------------------|-----------------------------------|
    /// | `LEDGER_OP_TIMEOUT_SECS`      | `10`                              |
    /// | `MANAGEMENT_NUMBER_PAD_WIDTH` | `4`                               |
    /// | `GENRE_PREFIXES`              | `1=IND,2=OFS,3=FAC,4=EMB,5=ADV`   |
    /// | `MANAGEMENT_NUMBER_UTC_OFFSET`| `+09:00` (`Z` or `UTC` for zero)  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`LedgerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("LEDGER_OP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid {
                    name: "LEDGER_OP_TIMEOUT_SECS",
                    value: raw.clone(),
                    expected: "a positive number of seconds",
                })?;
            config.op_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("MANAGEMENT_NUMBER_PAD_WIDTH") {
            config.pad_width = raw
                .trim()
                .parse()
                .ok()
                .filter(|w| (1..=MAX_PAD_WIDTH).contains(w))
                .ok_or(ConfigError::Invalid {
                    name: "MANAGEMENT_NUMBER_PAD_WIDTH",
                    value: raw.clone(),
                    expected: "an integer between 1 and 12",
                })?;
        }

        if let Some(raw) = lookup("GENRE_PREFIXES") {
            config.genre_prefixes = GenrePrefixes::parse(&raw)
                .map_err(|e| ConfigError::GenrePrefixes(e.message()))?;
        }

        if let Some(raw) = lookup("MANAGEMENT_NUMBER_UTC_OFFSET") {
            config.registration_offset =
                parse_utc_offset(&raw).ok_or(ConfigError::Invalid {
                    name: "MANAGEMENT_NUMBER_UTC_OFFSET",
                    value: raw.clone(),
                    expected: "an offset like +09:00, -05:30 or UTC",
                })?;
        }

        Ok(config)
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `Z` or `UTC`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.op_timeout, Duration::from_secs(10));
        assert_eq!(config.pad_width, 4);
        assert_eq!(config.genre_prefixes.prefix_for(4), Some("EMB"));
        assert_eq!(config.registration_offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn overrides_are_applied() {
        let config = LedgerConfig::from_lookup(lookup(&[
            ("LEDGER_OP_TIMEOUT_SECS", "3"),
            ("MANAGEMENT_NUMBER_PAD_WIDTH", "6"),
            ("GENRE_PREFIXES", "1=LAB"),
            ("MANAGEMENT_NUMBER_UTC_OFFSET", "-05:30"),
        ]))
        .unwrap();
        assert_eq!(config.op_timeout, Duration::from_secs(3));
        assert_eq!(config.pad_width, 6);
        assert_eq!(config.genre_prefixes.prefix_for(1), Some("LAB"));
        assert_eq!(config.genre_prefixes.prefix_for(4), None);
        assert_eq!(config.registration_offset.local_minus_utc(), -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn utc_offset_forms() {
        assert_eq!(parse_utc_offset("UTC").map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(parse_utc_offset(" z ").map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(parse_utc_offset("+09:00").map(|o| o.local_minus_utc()), Some(32_400));
        assert_eq!(parse_utc_offset("+9:00"), None);
        assert_eq!(parse_utc_offset("09:00"), None);
        assert_eq!(parse_utc_offset("+15:00"), None);
        assert_eq!(parse_utc_offset("+09:60"), None);
        assert_eq!(parse_utc_offset("Asia/Tokyo"), None);
    }

    #[test]
    fn invalid_values_fail_fast() {
        assert_matches!(
            LedgerConfig::from_lookup(lookup(&[("LEDGER_OP_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Invalid { name: "LEDGER_OP_TIMEOUT_SECS", .. })
        );
        assert_matches!(
            LedgerConfig::from_lookup(lookup(&[("MANAGEMENT_NUMBER_PAD_WIDTH", "wide")])),
            Err(ConfigError::Invalid { .. })
        );
        assert_matches!(
            LedgerConfig::from_lookup(lookup(&[("GENRE_PREFIXES", "4")])),
            Err(ConfigError::GenrePrefixes(_))
        );
        assert_matches!(
            LedgerConfig::from_lookup(lookup(&[("MANAGEMENT_NUMBER_UTC_OFFSET", "JST")])),
            Err(ConfigError::Invalid { name: "MANAGEMENT_NUMBER_UTC_OFFSET", .. })
        );
    }
}
