//! Date-range bucketing for the calendar view
//!
//! Each festival is placed on every day it runs, clipped to the requested
//! window. Undated festivals never appear.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{festival::Festival, filter::MonthId};

/// Day -> festivals running that day, in input order
pub type DayBuckets<'a> = BTreeMap<NaiveDate, Vec<&'a Festival>>;

/// Index `festivals` by every day of `[window_start, window_end]` they cover.
///
/// The span of each festival is clipped to the window before iterating, so the
/// number of buckets never exceeds the window length. An inverted window yields
/// an empty map.
pub fn bucket<'a, I>(festivals: I, window_start: NaiveDate, window_end: NaiveDate) -> DayBuckets<'a>
where
    I: IntoIterator<Item = &'a Festival>,
{
    let mut buckets = DayBuckets::new();
    if window_end < window_start {
        return buckets;
    }

    for festival in festivals {
        let Some((start, end)) = festival.date_range() else {
            continue;
        };
        if end < window_start || start > window_end {
            continue;
        }

        let last = end.min(window_end);
        for day in start.max(window_start).iter_days().take_while(|d| *d <= last) {
            buckets.entry(day).or_default().push(festival);
        }
    }

    buckets
}

/// First and last day of a month, the bucketing window of a calendar page
pub fn month_window(month: MonthId) -> (NaiveDate, NaiveDate) {
    (month.first_day(), month.last_day())
}

/// Render bucket keys as ISO dates (`YYYY-MM-DD`)
pub fn iso_keys<'a, T, F>(buckets: &DayBuckets<'a>, mut map: F) -> BTreeMap<String, Vec<T>>
where
    F: FnMut(&'a Festival) -> T,
{
    buckets
        .iter()
        .map(|(day, festivals)| {
            (
                day.format("%Y-%m-%d").to_string(),
                festivals.iter().map(|f| map(*f)).collect(),
            )
        })
        .collect()
}
