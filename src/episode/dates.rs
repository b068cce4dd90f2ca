//! Publication dates, Dutch month names and special-episode titles
//!
//! The feed writes dates in a fixed UTC+1 offset but labels them `GMT`.
//! That mislabel is what existing subscribers have always received, so it
//! is reproduced exactly.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use regex::Regex;
use std::sync::OnceLock;

/// Wire format of `<pubDate>` and of the stored `pub_date` column
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Offset every date is rendered in, in seconds east of UTC
const BROADCAST_OFFSET_SECS: i32 = 3600;

/// Capitalized Dutch month names, January first
pub const DUTCH_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maart",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Augustus",
    "September",
    "Oktober",
    "November",
    "December",
];

static DATED_TITLE: OnceLock<Option<Regex>> = OnceLock::new();

fn dated_title_pattern() -> Option<&'static Regex> {
    DATED_TITLE
        .get_or_init(|| Regex::new(r"\((\d{1,2})\s+([A-Za-z]+)\s+(\d{4})\)").ok())
        .as_ref()
}

/// The fixed UTC+1 offset
pub fn broadcast_offset() -> FixedOffset {
    FixedOffset::east_opt(BROADCAST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current time in the broadcast offset
pub fn broadcast_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&broadcast_offset())
}

/// Formats a timestamp for `<pubDate>`
pub fn format_pub_date(dt: &DateTime<FixedOffset>) -> String {
    dt.format(PUB_DATE_FORMAT).to_string()
}

/// Spells a date out as `3 Juli 2023`
pub fn human_date<D: Datelike>(date: &D) -> String {
    let month = DUTCH_MONTHS[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Spells out a stored publication date, or returns it unchanged if it does
/// not follow [`PUB_DATE_FORMAT`]
pub fn human_date_from_pub_date(pub_date: &str) -> String {
    match NaiveDateTime::parse_from_str(pub_date, PUB_DATE_FORMAT) {
        Ok(dt) => human_date(&dt),
        Err(_) => pub_date.to_string(),
    }
}

/// Title of the daily episode published on `date`
pub fn daily_title<D: Datelike>(date: &D) -> String {
    format!("Podcast Aflevering {}", human_date(date))
}

/// Month number (1-based) for a Dutch month name, any letter case
fn month_from_dutch(name: &str) -> Option<u32> {
    DUTCH_MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

/// Title and publication date derived from the text above a special broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTitle {
    pub title: String,
    pub pub_date: String,
}

/// Splits `"Weerpraatje (3 juli 2023)"` into a title and a publication date
///
/// A parenthesized `(D[D] <maand> YYYY)` becomes the publication date at
/// midnight in the broadcast offset and is cut from the title, unless
/// nothing would be left of it. Without a date, or when it names an
/// impossible day, the title is kept as-is (trimmed) and `now` is the
/// publication date.
pub fn parse_special_title(raw: &str, now: &DateTime<FixedOffset>) -> SpecialTitle {
    if let Some((range, date)) = find_title_date(raw) {
        let mut title = String::with_capacity(raw.len());
        title.push_str(&raw[..range.start]);
        title.push_str(&raw[range.end..]);

        let midnight = date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| broadcast_offset().from_local_datetime(&naive).single());
        if let Some(dt) = midnight {
            let mut title = collapse_whitespace(&title);
            if title.is_empty() {
                title = raw.trim().to_string();
            }
            return SpecialTitle {
                title,
                pub_date: format_pub_date(&dt),
            };
        }
    }

    SpecialTitle {
        title: raw.trim().to_string(),
        pub_date: format_pub_date(now),
    }
}

/// Locates the first valid parenthesized Dutch date in `text`
fn find_title_date(text: &str) -> Option<(std::ops::Range<usize>, NaiveDate)> {
    let pattern = dated_title_pattern()?;

    pattern.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_dutch(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some((whole.range(), date))
    })
}

/// Trims and folds the double space left where a parenthetical was cut out
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
