//! Delivery date normalization

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Display format of a normalized delivery date
pub const DELIVERY_DATE_FORMAT: &str = "%d-%m-%Y";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", DELIVERY_DATE_FORMAT];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// chrono's `%Y` takes one to four digits; anything shorter is not a full year
const YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Parse a user-entered date.
///
/// Already normalized `DD-MM-YYYY` values parse back to the same date so that
/// formatting twice is a no-op. Two-digit years such as `07-03-25` are not
/// guessed at.
pub fn parse_delivery_date(raw: &str) -> Option<NaiveDate> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .filter(|date| YEARS.contains(&date.year()))
}

/// Reformat `raw` as `DD-MM-YYYY` when it is a calendar date, otherwise return it unchanged
pub fn format_delivery_date(raw: &str) -> String {
    match parse_delivery_date(raw) {
        Some(date) => date.format(DELIVERY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_is_reformatted() {
        assert_eq!(format_delivery_date("2025-03-07"), "07-03-2025");
        assert_eq!(format_delivery_date(" 2025/12/31 "), "31-12-2025");
        assert_eq!(format_delivery_date("2025-03-07T10:30"), "07-03-2025");
        assert_eq!(format_delivery_date("2025-03-07T23:30:00+05:30"), "07-03-2025");
    }

    #[test]
    fn test_unparseable_input_passes_through() {
        assert_eq!(format_delivery_date("not-a-date"), "not-a-date");
        assert_eq!(format_delivery_date("next week"), "next week");
        assert_eq!(format_delivery_date(""), "");
    }

    #[test]
    fn test_invalid_calendar_dates_pass_through() {
        assert_eq!(format_delivery_date("2025-02-30"), "2025-02-30");
        assert_eq!(format_delivery_date("2025-13-01"), "2025-13-01");
    }

    #[test]
    fn test_short_years_pass_through() {
        assert_eq!(format_delivery_date("07-03-25"), "07-03-25");
        assert_eq!(format_delivery_date("25-12-31"), "25-12-31");
        assert_eq!(format_delivery_date("7/3/25"), "7/3/25");
        assert_eq!(parse_delivery_date("0025-12-31"), None);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let once = format_delivery_date("2024-02-29");
        assert_eq!(once, "29-02-2024");
        assert_eq!(format_delivery_date(&once), once);
    }
}
