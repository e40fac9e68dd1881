//! Filter codec: query-string parameters <-> [`Filter`]
//!
//! Wire format:
//!
//! | param    | value                                   |
//! |----------|-----------------------------------------|
//! | `city`   | comma-joined list                       |
//! | `region` | comma-joined list                       |
//! | `cat`    | comma-joined list                       |
//! | `from`   | `YYYY-MM-DD`                            |
//! | `to`     | `YYYY-MM-DD`                            |
//! | `free`   | `1` / `0` (`true` is accepted too)      |
//! | `sort`   | `soonest` / `curated` / `nearest`       |
//! | `month`  | `yyyy-mm`                               |
//!
//! Unknown parameters are ignored. Values that do not parse leave the field unset.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::models::filter::{Filter, MonthId};

pub const PARAM_CITY: &str = "city";
pub const PARAM_REGION: &str = "region";
pub const PARAM_CATEGORY: &str = "cat";
pub const PARAM_FROM: &str = "from";
pub const PARAM_TO: &str = "to";
pub const PARAM_FREE: &str = "free";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_MONTH: &str = "month";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode already percent-decoded `(key, value)` pairs into a [`Filter`].
///
/// A key may repeat; list values are concatenated in order, scalar fields
/// keep the first occurrence.
pub fn decode<I, K, V>(params: I) -> Filter
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    decode_with(params, |raw| Cow::Borrowed(raw))
}

/// Decode a raw query string (`a=1&b=2`, leading `?` allowed).
///
/// List values are split on the literal `,` before percent-decoding, so a
/// member containing an encoded comma (`%2C`) stays whole.
pub fn decode_query_string(query: &str) -> Filter {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), value)
        });
    decode_with(pairs, |raw| Cow::Owned(percent_decode(raw)))
}

fn decode_with<I, K, V, D>(params: I, unescape: D) -> Filter
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    D: Fn(&str) -> Cow<'_, str>,
{
    let mut filter = Filter::default();
    let mut cities = Vec::new();
    let mut regions = Vec::new();
    let mut categories = Vec::new();
    let mut free_raw: Option<String> = None;

    for (key, value) in params {
        let raw = value.as_ref();
        match key.as_ref() {
            PARAM_CITY => push_list(&mut cities, raw, &unescape),
            PARAM_REGION => push_list(&mut regions, raw, &unescape),
            PARAM_CATEGORY => push_list(&mut categories, raw, &unescape),
            PARAM_FROM if filter.from.is_none() => filter.from = parse_date(&unescape(raw)),
            PARAM_TO if filter.to.is_none() => filter.to = parse_date(&unescape(raw)),
            PARAM_FREE if free_raw.is_none() => free_raw = Some(unescape(raw).trim().to_string()),
            PARAM_SORT if filter.sort.is_none() => filter.sort = unescape(raw).trim().parse().ok(),
            PARAM_MONTH if filter.month.is_none() => filter.month = unescape(raw).parse().ok(),
            _ => {}
        }
    }

    filter.cities = non_empty(cities);
    filter.regions = non_empty(regions);
    filter.categories = non_empty(categories);
    filter.free = free_raw.as_deref().and_then(parse_free);
    filter
}

/// Encode a [`Filter`] into a query string without the leading `?`.
///
/// Unset fields are omitted; an empty filter encodes to `""`.
pub fn encode(filter: &Filter) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut push = |key: &str, value: String| {
        if !value.is_empty() {
            parts.push(format!("{}={}", key, value));
        }
    };

    if let Some(cities) = &filter.cities {
        push(PARAM_CITY, encode_list(cities));
    }
    if let Some(regions) = &filter.regions {
        push(PARAM_REGION, encode_list(regions));
    }
    if let Some(categories) = &filter.categories {
        push(PARAM_CATEGORY, encode_list(categories));
    }
    if let Some(from) = filter.from {
        push(PARAM_FROM, from.format(DATE_FORMAT).to_string());
    }
    if let Some(to) = filter.to {
        push(PARAM_TO, to.format(DATE_FORMAT).to_string());
    }
    if let Some(free) = filter.free {
        push(PARAM_FREE, if free { "1" } else { "0" }.to_string());
    }
    if let Some(sort) = filter.sort {
        push(PARAM_SORT, sort.as_str().to_string());
    }
    if let Some(month) = filter.month {
        push(PARAM_MONTH, month.to_string());
    }

    parts.join("&")
}

/// Fill `free = true` when the caller left `free` unset.
///
/// An explicit `free=0` is never overridden.
pub fn with_default_filters(filter: Filter) -> Filter {
    Filter {
        free: Some(filter.free.unwrap_or(true)),
        ..filter
    }
}

fn push_list<D>(target: &mut Vec<String>, raw: &str, unescape: &D)
where
    D: Fn(&str) -> Cow<'_, str>,
{
    for segment in raw.split(',') {
        let segment = unescape(segment);
        let segment = segment.trim();
        if !segment.is_empty() {
            target.push(segment.to_string());
        }
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_free(raw: &str) -> Option<bool> {
    if raw.is_empty() {
        return None;
    }
    Some(matches!(raw, "1" | "true"))
}

fn encode_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| urlencoding::encode(v).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn percent_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => spaced,
    }
}

/// Parse a month identifier, ignoring malformed values
pub fn parse_month(raw: &str) -> Option<MonthId> {
    raw.parse().ok()
}
