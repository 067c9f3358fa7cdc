use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const NEVER: &str = "Never";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Renders a `last_checked` value as e.g. `Jan 5, 02:03:04 PM`.
///
/// Empty values and the exact `Never` marker render as `Never`; anything that does
/// not parse as a date-time is returned unchanged.
pub fn format_date_time(raw: Option<&str>, tz: Tz) -> String {
    let raw = match raw {
        None | Some("") | Some(NEVER) => return NEVER.to_string(),
        Some(value) => value,
    };

    match parse_date_time(raw, tz) {
        Some(parsed) => parsed
            .with_timezone(&tz)
            .format("%b %-d, %I:%M:%S %p")
            .to_string(),
        None => raw.to_string(),
    }
}

/// Time-of-day shown in the "last updated" slot, e.g. `2:03:04 PM`.
pub fn format_time_of_day(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%-I:%M:%S %p").to_string()
}

/// Formats a number the way the browser prints it: `75`, `66.7`.
pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{value}")
}

fn parse_date_time(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Naive date-times are local wall-clock times.
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    // Bare dates are midnight UTC.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
