//! Date parsing helpers for operator input.

use chrono::{Local, NaiveDate};

/// Parse a `year month day` date typed with `-`, `/`, `.` or spaces between
/// the parts, e.g. "2026-1-5", "2026/01/05", "2026 1 5".
pub fn parse_flexible_date(input: &str) -> Result<NaiveDate, String> {
    let invalid = || format!("invalid date '{input}' (expected YYYY-MM-DD)");

    let mut parts = input.split(['-', '/', ' ', '.']).filter(|part| !part.is_empty());
    let (Some(year), Some(month), Some(day), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let day = day.parse::<u32>().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Today's date from the local wall clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
