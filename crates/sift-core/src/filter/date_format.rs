//! Calendar date rendering for absolute recency predicates
//!
//! The query executor reads the date literal back with the same format it
//! was written in, so every variant here must round-trip through
//! [`parse_date`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format options for absolute date literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// Short native form without padding (e.g. 1/1/24)
    ///
    /// The two-digit year reads back within 1970..=2069, so literals outside
    /// that range do not survive [`parse_date`]. The configured window tops
    /// out at ten years, which keeps current dates well inside it.
    #[default]
    Native,
    /// YYYY-MM-DD
    Iso8601,
    /// DD/MM/YYYY
    DayMonthYear,
    /// MM/DD/YYYY
    MonthDayYear,
    /// YYYY/MM/DD
    YearMonthDay,
}

impl DateFormat {
    fn render_pattern(&self) -> &'static str {
        match self {
            DateFormat::Native => "%-m/%-d/%y",
            DateFormat::Iso8601 => "%Y-%m-%d",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::YearMonthDay => "%Y/%m/%d",
        }
    }

    // chrono accepts unpadded fields for numeric specifiers when parsing
    fn parse_pattern(&self) -> &'static str {
        match self {
            DateFormat::Native => "%m/%d/%y",
            other => other.render_pattern(),
        }
    }
}

/// Format a calendar date according to `format`
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.render_pattern()).to_string()
}

/// Parse a calendar date previously written by [`format_date`]
pub fn parse_date(text: &str, format: DateFormat) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), format.parse_pattern()).ok()
}
