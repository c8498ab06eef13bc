//! Recency filters for the analysis view
//!
//! Translates a "recently added" window of N days into a predicate the query
//! executor understands. Two encodings exist and are not interchangeable:
//!
//! - **Absolute** (`added:>1/1/24`): the cutoff is resolved to a calendar date
//!   when the filter is built. Re-applying it later keeps the old snapshot.
//! - **Relative** (`added:>-7d`): the cutoff is resolved by the executor each
//!   time the query runs, so it always means "N days before now".
//!
//! The empty predicate means no recency constraint.

mod date_format;

pub use date_format::{format_date, parse_date, DateFormat};

use crate::error::{Result, SiftError};
use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};

/// Field prefix shared by both textual forms
pub const ADDED_PREFIX: &str = "added:>";

/// A recency constraint on the date a track was added
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterPredicate {
    /// No constraint, every record matches
    #[default]
    Empty,
    /// Added on or after a fixed calendar date
    AddedSince { date: NaiveDate, format: DateFormat },
    /// Added within the last `days` days of the evaluation instant
    AddedWithinDays { days: u32 },
}

/// Build an absolute filter against the current wall-clock time
pub fn build_absolute_filter(days: u32, format: DateFormat) -> FilterPredicate {
    build_absolute_filter_at(days, Utc::now(), format)
}

/// Build an absolute filter for `reference - days`
///
/// `days == 0` yields the reference date itself. Windows reaching past the
/// representable calendar saturate to the earliest date.
pub fn build_absolute_filter_at(
    days: u32,
    reference: DateTime<Utc>,
    format: DateFormat,
) -> FilterPredicate {
    let date = reference
        .date_naive()
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    FilterPredicate::AddedSince { date, format }
}

/// Build a relative filter that the executor resolves at query time
pub fn build_relative_filter(days: u32) -> FilterPredicate {
    FilterPredicate::AddedWithinDays { days }
}

/// The predicate without a recency constraint
pub fn empty_filter() -> FilterPredicate {
    FilterPredicate::Empty
}

impl FilterPredicate {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterPredicate::Empty)
    }

    /// Parse the textual form of a predicate
    ///
    /// `format` is the date format used to read absolute literals. Blank text
    /// is the empty predicate.
    pub fn parse(text: &str, format: DateFormat) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(FilterPredicate::Empty);
        }

        let literal = text
            .strip_prefix(ADDED_PREFIX)
            .ok_or_else(|| SiftError::InvalidPredicate(text.to_string()))?;

        if let Some(offset) = literal.strip_suffix('d') {
            let offset: i64 = offset
                .parse()
                .map_err(|_| SiftError::InvalidPredicate(text.to_string()))?;
            if offset > 0 {
                return Err(SiftError::InvalidPredicate(text.to_string()));
            }
            let days = u32::try_from(offset.unsigned_abs())
                .map_err(|_| SiftError::InvalidPredicate(text.to_string()))?;
            return Ok(FilterPredicate::AddedWithinDays { days });
        }

        parse_date(literal, format)
            .map(|date| FilterPredicate::AddedSince { date, format })
            .ok_or_else(|| SiftError::InvalidPredicate(text.to_string()))
    }

    /// Whether a track added at `added_at` passes this filter when evaluated at `now`
    pub fn matches(&self, added_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            FilterPredicate::Empty => true,
            FilterPredicate::AddedSince { date, .. } => added_at.date_naive() >= *date,
            FilterPredicate::AddedWithinDays { days } => {
                let cutoff = now
                    .checked_sub_signed(TimeDelta::days(i64::from(*days)))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                added_at >= cutoff
            }
        }
    }
}

impl std::fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterPredicate::Empty => Ok(()),
            FilterPredicate::AddedSince { date, format } => {
                write!(f, "{}{}", ADDED_PREFIX, format_date(*date, *format))
            }
            FilterPredicate::AddedWithinDays { days } => {
                write!(f, "{}-{}d", ADDED_PREFIX, days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_absolute_filter_seven_days() {
        let filter = build_absolute_filter_at(7, instant(2024, 1, 8), DateFormat::Native);
        assert_eq!(
            filter,
            FilterPredicate::AddedSince {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                format: DateFormat::Native,
            }
        );
        assert_eq!(filter.to_string(), "added:>1/1/24");
    }

    #[test]
    fn test_absolute_filter_zero_days_is_reference_date() {
        let filter = build_absolute_filter_at(0, instant(2024, 1, 8), DateFormat::Iso8601);
        assert_eq!(filter.to_string(), "added:>2024-01-08");
    }

    #[test]
    fn test_relative_filter_text() {
        assert_eq!(build_relative_filter(7).to_string(), "added:>-7d");
        assert_eq!(build_relative_filter(0).to_string(), "added:>-0d");
    }

    #[test]
    fn test_empty_filter_renders_nothing() {
        assert_eq!(empty_filter().to_string(), "");
        assert!(empty_filter().is_empty());
    }

    #[test]
    fn test_every_window_contains_prefix() {
        let reference = instant(2024, 6, 15);
        for days in [0, 1, 7, 365, 3650, 100_000, u32::MAX] {
            let absolute =
                build_absolute_filter_at(days, reference, DateFormat::Native).to_string();
            let relative = build_relative_filter(days).to_string();
            assert!(absolute.starts_with(ADDED_PREFIX), "{}", absolute);
            assert!(absolute.len() > ADDED_PREFIX.len());
            assert!(relative.starts_with(ADDED_PREFIX), "{}", relative);
            assert!(relative.ends_with('d'));
        }
    }

    #[test]
    fn test_parse_textual_forms() {
        assert_eq!(
            FilterPredicate::parse("added:>-30d", DateFormat::Native).unwrap(),
            build_relative_filter(30)
        );
        assert_eq!(
            FilterPredicate::parse("added:>1/1/24", DateFormat::Native).unwrap(),
            build_absolute_filter_at(7, instant(2024, 1, 8), DateFormat::Native)
        );
        assert_eq!(
            FilterPredicate::parse("   ", DateFormat::Native).unwrap(),
            FilterPredicate::Empty
        );
    }

    #[test]
    fn test_absolute_text_reads_back_across_configured_range() {
        let reference = instant(2024, 6, 15);
        for format in [DateFormat::Native, DateFormat::Iso8601, DateFormat::DayMonthYear] {
            for days in [0, 1, 7, 30, 365, 1000, crate::config::MAX_RECENT_DAYS] {
                let filter = build_absolute_filter_at(days, reference, format);
                let parsed = FilterPredicate::parse(&filter.to_string(), format).unwrap();
                assert_eq!(parsed, filter, "{} days as {:?}", days, format);
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["artist:foo", "added:>", "added:>7d", "added:>-xd", "added:>soon"] {
            assert!(
                FilterPredicate::parse(text, DateFormat::Native).is_err(),
                "{} should not parse",
                text
            );
        }
    }

    #[test]
    fn test_relative_matches_against_evaluation_time() {
        let filter = build_relative_filter(7);
        let now = instant(2024, 1, 8);
        assert!(filter.matches(instant(2024, 1, 1), now));
        assert!(filter.matches(instant(2024, 1, 5), now));
        assert!(!filter.matches(instant(2023, 12, 31), now));

        // Same filter re-evaluated a week later drops the old tracks
        assert!(!filter.matches(instant(2024, 1, 5), instant(2024, 1, 15)));
    }

    #[test]
    fn test_absolute_matches_snapshot_date() {
        let filter = build_absolute_filter_at(7, instant(2024, 1, 8), DateFormat::Native);
        assert!(filter.matches(instant(2024, 1, 1), instant(2024, 3, 1)));
        assert!(!filter.matches(instant(2023, 12, 31), instant(2024, 1, 8)));
    }

    #[test]
    fn test_huge_windows_match_everything() {
        let now = instant(2024, 1, 8);
        let ancient = instant(1900, 1, 1);
        assert!(build_relative_filter(u32::MAX).matches(ancient, now));
        assert!(build_absolute_filter_at(u32::MAX, now, DateFormat::Iso8601).matches(ancient, now));
        assert!(empty_filter().matches(ancient, now));
    }
}
