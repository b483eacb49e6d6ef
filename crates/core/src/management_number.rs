//! Management number allocation rules.
//!
//! A management number is `<GenrePrefix>-<YYYYMMDD>-<zero-padded id>`. The id
//! part is the master's primary key, which only exists after insertion, so
//! allocation happens in two phases: reserve the row under a [`placeholder`]
//! token, then [`format_management_number`] and finalize it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Prefix marking a row whose management number is not finalized yet.
pub const PLACEHOLDER_PREFIX: &str = "TMP-";

/// Default zero-padding width of the id segment.
pub const DEFAULT_PAD_WIDTH: usize = 4;

/// Genre id to management number prefix table.
///
/// Passed into the catalog explicitly; there is no global lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenrePrefixes {
    prefixes: BTreeMap<i16, String>,
}

impl Default for GenrePrefixes {
    /// Seed genres shipped with the initial migration.
    fn default() -> Self {
        Self::from_pairs([(1, "IND"), (2, "OFS"), (3, "FAC"), (4, "EMB"), (5, "ADV")])
    }
}

impl GenrePrefixes {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (i16, &'a str)>) -> Self {
        Self {
            prefixes: pairs
                .into_iter()
                .map(|(id, prefix)| (id, prefix.to_string()))
                .collect(),
        }
    }

    /// Parse `"1=IND,2=OFS"` style configuration.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut prefixes = BTreeMap::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (id, prefix) = entry.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!("Genre prefix entry '{entry}' must be <id>=<PREFIX>"))
            })?;
            let id: i16 = id.trim().parse().map_err(|_| {
                CoreError::Validation(format!("Genre id '{}' is not a number", id.trim()))
            })?;
            let prefix = prefix.trim();
            validate_prefix(prefix)?;
            if prefixes.insert(id, prefix.to_string()).is_some() {
                return Err(CoreError::Validation(format!(
                    "Genre id {id} is configured twice"
                )));
            }
        }
        if prefixes.is_empty() {
            return Err(CoreError::Validation(
                "At least one genre prefix must be configured".to_string(),
            ));
        }
        Ok(Self { prefixes })
    }

    pub fn prefix_for(&self, genre_id: i16) -> Option<&str> {
        self.prefixes.get(&genre_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

fn validate_prefix(prefix: &str) -> Result<(), CoreError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::Validation(format!(
            "Genre prefix '{prefix}' must be non-empty ASCII alphanumerics"
        )));
    }
    if prefix.starts_with(PLACEHOLDER_PREFIX.trim_end_matches('-')) {
        return Err(CoreError::Validation(format!(
            "Genre prefix '{prefix}' collides with the placeholder marker"
        )));
    }
    Ok(())
}

/// Build the final management number.
///
/// Ids wider than `pad_width` digits are written in full rather than
/// truncated, so uniqueness of the primary key carries over.
pub fn format_management_number(
    prefix: &str,
    registered_on: NaiveDate,
    id: DbId,
    pad_width: usize,
) -> String {
    format!(
        "{prefix}-{}-{id:0width$}",
        registered_on.format("%Y%m%d"),
        width = pad_width
    )
}

/// Temporary unique token used during the reservation phase.
pub fn placeholder(token: Uuid) -> String {
    format!("{PLACEHOLDER_PREFIX}{}", token.simple())
}

pub fn is_placeholder(management_number: &str) -> bool {
    management_number.starts_with(PLACEHOLDER_PREFIX)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn formats_with_padded_key() {
        assert_eq!(
            format_management_number("EMB", jan_15(), 42, DEFAULT_PAD_WIDTH),
            "EMB-20250115-0042"
        );
    }

    #[test]
    fn wide_ids_are_not_truncated() {
        assert_eq!(
            format_management_number("IND", jan_15(), 123_456, 4),
            "IND-20250115-123456"
        );
    }

    #[test]
    fn custom_pad_width() {
        assert_eq!(
            format_management_number("FAC", jan_15(), 7, 5),
            "FAC-20250115-00007"
        );
    }

    #[test]
    fn default_table_covers_seed_genres() {
        let prefixes = GenrePrefixes::default();
        assert_eq!(prefixes.prefix_for(4), Some("EMB"));
        assert_eq!(prefixes.prefix_for(1), Some("IND"));
        assert_eq!(prefixes.prefix_for(9), None);
        assert_eq!(prefixes.len(), 5);
    }

    #[test]
    fn parses_configuration_string() {
        let prefixes = GenrePrefixes::parse(" 1=IND, 4=EMB ,").unwrap();
        assert_eq!(prefixes.prefix_for(1), Some("IND"));
        assert_eq!(prefixes.prefix_for(4), Some("EMB"));
        assert_eq!(prefixes.len(), 2);
    }

    #[test]
    fn rejects_malformed_configuration() {
        assert_matches!(GenrePrefixes::parse("1:IND"), Err(CoreError::Validation(_)));
        assert_matches!(GenrePrefixes::parse("x=IND"), Err(CoreError::Validation(_)));
        assert_matches!(GenrePrefixes::parse("1=I-D"), Err(CoreError::Validation(_)));
        assert_matches!(GenrePrefixes::parse("1=A,1=B"), Err(CoreError::Validation(_)));
        assert_matches!(GenrePrefixes::parse(""), Err(CoreError::Validation(_)));
        assert_matches!(GenrePrefixes::parse("1=TMP"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn placeholder_is_recognizable_and_unique() {
        let a = placeholder(Uuid::new_v4());
        let b = placeholder(Uuid::new_v4());
        assert!(is_placeholder(&a));
        assert_ne!(a, b);
        assert!(!is_placeholder("EMB-20250115-0042"));
    }
}
