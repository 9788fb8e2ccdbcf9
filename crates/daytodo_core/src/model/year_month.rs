//! Calendar month key for record views.
//!
//! # Invariants
//! - `month` is always within `1..=12`.
//! - Ordering is chronological (year first, then month).

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static ISO_YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid year-month regex"));
static LABEL_YEAR_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\s*년\s*(\d{1,2})\s*월$").expect("valid year-month label regex")
});

/// A calendar year and month, e.g. `2026-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Parse failure for year-month text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearMonthParseError {
    /// Text matches neither `YYYY-MM` nor `YYYY년 M월`.
    Malformed(String),
    /// Month component outside `1..=12`.
    MonthOutOfRange(u32),
}

impl Display for YearMonthParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed year-month: `{value}`"),
            Self::MonthOutOfRange(month) => write!(f, "month out of range: {month}"),
        }
    }
}

impl Error for YearMonthParseError {}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthParseError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn of(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, day: NaiveDate) -> bool {
        day.year() == self.year && day.month() == self.month
    }

    /// Localized picker label, e.g. `2026년 10월`.
    pub fn label(self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    /// Accepts `2026-10` and the picker label form `2026년 10월`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = ISO_YEAR_MONTH_RE
            .captures(trimmed)
            .or_else(|| LABEL_YEAR_MONTH_RE.captures(trimmed))
            .ok_or_else(|| YearMonthParseError::Malformed(trimmed.to_string()))?;

        let year = captures[1]
            .parse::<i32>()
            .map_err(|_| YearMonthParseError::Malformed(trimmed.to_string()))?;
        let month = captures[2]
            .parse::<u32>()
            .map_err(|_| YearMonthParseError::Malformed(trimmed.to_string()))?;
        Self::new(year, month)
    }
}
