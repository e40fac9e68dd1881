//! Browse logic shared by the list, map and calendar views
//!
//! Everything here is a pure function over festivals already fetched from the
//! store: the query-string filter codec, day bucketing, facet counts, slug
//! normalization and the ICS export.

pub mod aggregate;
pub mod calendar;
pub mod ics;
pub mod query;
pub mod slug;

pub use aggregate::{aggregate_categories, aggregate_cities, aggregate_upcoming_months, FacetCount};
pub use calendar::{bucket, month_window, DayBuckets};
pub use query::{decode, decode_query_string, encode, with_default_filters};
pub use slug::{canonical_slug, is_valid_slug, normalize_key, slugify};
