use crate::imports::*;

pub fn now_pacific() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_timezone(timezones::db::america::LOS_ANGELES)
}

pub fn to_pacific(instant: OffsetDateTime) -> OffsetDateTime {
    instant.to_timezone(timezones::db::america::LOS_ANGELES)
}

/// Formats a photo timestamp as `M/D/YY H:MM`.
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    instant
        .format(format_description!(
            "[month padding:none]/[day padding:none]/[year repr:last_two] [hour padding:none]:[minute]"
        ))
        .expect("timestamp to format")
}

/// Formats a calendar date as `M/D/YY`.
pub fn format_date(date: Date) -> String {
    date.format(format_description!(
        "[month padding:none]/[day padding:none]/[year repr:last_two]"
    ))
    .expect("date to format")
}

/// Formats an instant as an HTTP date, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
pub fn format_http_date(instant: OffsetDateTime) -> Result<String> {
    Ok(instant.format(format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    ))?)
}

pub fn unix_millis(instant: OffsetDateTime) -> i64 {
    (instant.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Escapes bare ampersands for HTML output without double-escaping.
pub fn escape_ampersands(text: &str) -> String {
    text.replace("&amp;", "&").replace('&', "&amp;")
}

/// Returns the text following the first occurrence of `needle`.
pub fn split_after<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    text.find(needle).map(|index| &text[index + needle.len()..])
}
