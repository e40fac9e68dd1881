//! Facet counts over a festival result set

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::slug::normalize_key;
use crate::models::{festival::Festival, filter::MonthId};

/// A facet label with its festival count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FacetCount {
    pub label: String,
    pub count: usize,
}

impl FacetCount {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Group labels case-insensitively, keeping the first-seen spelling.
/// Sorted by descending count; ties keep first-seen order.
fn count_labels<'a, I>(labels: I) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: IndexMap<String, FacetCount> = IndexMap::new();
    for label in labels {
        let key = normalize_key(label);
        if key.is_empty() {
            continue;
        }
        groups
            .entry(key)
            .or_insert_with(|| FacetCount::new(label.trim(), 0))
            .count += 1;
    }

    let mut counts: Vec<FacetCount> = groups.into_values().collect();
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Category frequencies, most common first
pub fn aggregate_categories<'a, I>(festivals: I) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a Festival>,
{
    count_labels(festivals.into_iter().filter_map(|f| f.category.as_deref()))
}

/// City frequencies, most common first
pub fn aggregate_cities<'a, I>(festivals: I) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a Festival>,
{
    count_labels(festivals.into_iter().filter_map(|f| f.city.as_deref()))
}

/// Festivals starting on or after `today`, counted per `yyyy-mm`, in
/// chronological order, truncated to `limit` months.
pub fn aggregate_upcoming_months<'a, I>(festivals: I, today: NaiveDate, limit: usize) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a Festival>,
{
    let mut months: IndexMap<MonthId, usize> = IndexMap::new();
    for start in festivals.into_iter().filter_map(|f| f.start_date) {
        if start >= today {
            *months.entry(MonthId::of(start)).or_insert(0) += 1;
        }
    }

    months.sort_keys();
    months
        .into_iter()
        .take(limit)
        .map(|(month, count)| FacetCount::new(month.to_string(), count))
        .collect()
}
