//! Calendar month view

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    browse::{self, calendar},
    config::CalendarConfig,
    error::AppResult,
    models::{
        festival::Festival,
        filter::{Filter, MonthId},
    },
    repository::FestivalStore,
};

/// Compact festival entry shown inside a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarEntry {
    pub slug: String,
    pub title: String,
    pub city: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_free: Option<bool>,
}

impl From<&Festival> for CalendarEntry {
    fn from(f: &Festival) -> Self {
        Self {
            slug: f.slug.clone(),
            title: f.title.clone(),
            city: f.city.clone(),
            category: f.category.clone(),
            start_date: f.start_date,
            end_date: f.end_date,
            is_free: f.is_free,
        }
    }
}

/// One month of the calendar
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarMonth {
    /// `yyyy-mm`
    pub month: String,
    pub prev_month: String,
    pub next_month: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Festivals overlapping the month
    pub total: usize,
    /// ISO day -> festivals running that day
    pub days: BTreeMap<String, Vec<CalendarEntry>>,
    /// Canonical query string of the filter
    pub query: String,
}

#[derive(Clone)]
pub struct CalendarService {
    store: Arc<dyn FestivalStore>,
    config: CalendarConfig,
}

impl CalendarService {
    pub fn new(store: Arc<dyn FestivalStore>, config: CalendarConfig) -> Self {
        Self { store, config }
    }

    /// Festivals of `month` indexed per day.
    ///
    /// The store is asked for the month window intersected with any date
    /// bounds in `filter`; days outside the month never appear.
    pub async fn month(&self, filter: Filter, month: MonthId) -> AppResult<CalendarMonth> {
        let filter = browse::with_default_filters(Filter {
            month: Some(month),
            ..filter
        });
        let (window_start, window_end) = calendar::month_window(month);

        let from = filter.from.map_or(window_start, |f| f.max(window_start));
        let to = filter.to.map_or(window_end, |t| t.min(window_end));

        let festivals = if from <= to {
            let store_filter = Filter {
                from: Some(from),
                to: Some(to),
                ..filter.clone()
            };
            self.store
                .list_all(&store_filter, self.config.max_events as i64)
                .await?
        } else {
            Vec::new()
        };

        let buckets = calendar::bucket(&festivals, from, to);
        let total = festivals.iter().filter(|f| f.date_range().is_some()).count();
        tracing::debug!(month = %month, total, days = buckets.len(), "built calendar month");

        Ok(CalendarMonth {
            month: month.to_string(),
            prev_month: month.prev().to_string(),
            next_month: month.next().to_string(),
            window_start,
            window_end,
            total,
            days: calendar::iso_keys(&buckets, CalendarEntry::from),
            query: browse::encode(&filter),
        })
    }
}
