//! Browse filter derived from request query parameters

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})$").expect("month pattern is valid")
});

/// Ordering of list results
///
/// All three modes currently order chronologically by start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Soonest,
    Curated,
    Nearest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Soonest => "soonest",
            SortMode::Curated => "curated",
            SortMode::Nearest => "nearest",
        }
    }
}

impl FromStr for SortMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soonest" => Ok(SortMode::Soonest),
            "curated" => Ok(SortMode::Curated),
            "nearest" => Ok(SortMode::Nearest),
            _ => Err(()),
        }
    }
}

/// A calendar month identifier (`yyyy-mm`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthId {
    year: i32,
    month: u32,
}

impl MonthId {
    /// Build from parts; `None` unless `month` is 1..=12 and the year is representable
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in the constructors
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last calendar day of the month
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = MONTH_RE.captures(s.trim()).ok_or(())?;
        let year: i32 = caps[1].parse().map_err(|_| ())?;
        let month: u32 = caps[2].parse().map_err(|_| ())?;
        MonthId::new(year, month).ok_or(())
    }
}

impl Serialize for MonthId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured browse constraints
///
/// Every field is optional; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Filter {
    /// Cities, any of which may match
    pub cities: Option<Vec<String>>,
    /// Regions, any of which may match
    pub regions: Option<Vec<String>>,
    /// Category tags, any of which may match
    pub categories: Option<Vec<String>>,
    /// Inclusive lower bound of the date window
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound of the date window
    pub to: Option<NaiveDate>,
    /// Only free (`true`) or only paid (`false`) festivals
    pub free: Option<bool>,
    pub sort: Option<SortMode>,
    /// Target month of the calendar view
    #[schema(value_type = Option<String>, example = "2026-06")]
    pub month: Option<MonthId>,
}

impl Filter {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self == &Filter::default()
    }

    /// Sort mode with the chronological default applied
    pub fn sort_mode(&self) -> SortMode {
        self.sort.unwrap_or_default()
    }
}

/// Highest page number accepted from clients
pub const MAX_PAGE: i64 = 100_000;

/// Pagination parameters, kept apart from the filter
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number (1-based, at most 100000)
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<i64>,
    /// Items per page
    #[validate(range(min = 1))]
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Resolve to `(page, per_page)` with defaults and the page size ceiling applied
    pub fn resolve(&self, default_size: u32, max_size: u32) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self
            .per_page
            .unwrap_or(default_size as i64)
            .clamp(1, max_size.max(1) as i64);
        (page, per_page)
    }
}
