//! Single-event iCalendar export (all-day VEVENT)

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::festival::Festival;

pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

const PRODID: &str = "-//festivals-server//BG Festivals//EN";
const CRLF: &str = "\r\n";
const DATE_FORMAT: &str = "%Y%m%d";
/// Content lines longer than this many octets are folded
const MAX_LINE_OCTETS: usize = 75;

/// Escape a free-text value for a TEXT property.
///
/// Order matters: backslashes first, then commas, semicolons and newlines, so
/// that no inserted backslash is escaped a second time.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

/// Stable UID: the same slug always yields the same UID
pub fn uid(slug: &str, domain: &str) -> String {
    format!("{}@{}", slug, domain)
}

/// Serialize one festival as a calendar file.
///
/// `stamp` is the DTSTAMP and, when the festival has no start date, its date
/// is used as DTSTART. An end before the start is clamped to the start. DTEND
/// is exclusive: the day after the last festival day.
pub fn serialize(festival: &Festival, stamp: DateTime<Utc>, uid_domain: &str) -> String {
    let start = festival.start_date.unwrap_or_else(|| stamp.date_naive());
    let end = festival.end_date.unwrap_or(start).max(start);
    let end_exclusive = end
        .checked_add_signed(Duration::days(1))
        .unwrap_or(end);

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
        "BEGIN:VEVENT".into(),
        format!("UID:{}", uid(&festival.slug, uid_domain)),
        format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART;VALUE=DATE:{}", format_date(start)),
        format!("DTEND;VALUE=DATE:{}", format_date(end_exclusive)),
        format!("SUMMARY:{}", escape_text(&festival.title)),
    ];

    if let Some(location) = festival.location_label() {
        lines.push(format!("LOCATION:{}", escape_text(&location)));
    }
    if let Some(description) = festival.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }
    if let Some(url) = festival.website_url.as_deref().filter(|u| !u.trim().is_empty()) {
        lines.push(format!("URL:{}", url.trim()));
    }
    if let Some(category) = festival.category.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!("CATEGORIES:{}", escape_text(category)));
    }

    lines.push("TRANSP:TRANSPARENT".into());
    lines.push("END:VEVENT".into());
    lines.push("END:VCALENDAR".into());

    let mut body = String::new();
    for line in &lines {
        body.push_str(&fold_line(line));
        body.push_str(CRLF);
    }
    body
}

/// Fold a content line at 75 octets: CRLF plus one space starts each
/// continuation. Multi-byte characters are never split.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > MAX_LINE_OCTETS {
            folded.push_str(CRLF);
            folded.push(' ');
            used = 1;
        }
        folded.push(c);
        used += c.len_utf8();
    }
    folded
}

/// `Content-Disposition` header value for a festival's calendar file
pub fn content_disposition(slug: &str) -> String {
    format!("inline; filename=\"{}.ics\"", slug)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
