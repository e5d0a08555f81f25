//! Statutory date parsing.

use chrono::NaiveDate;

/// Parses a `dd/mm/YYYY` date.
///
/// Day and month may be one or two digits, the year must be exactly four.
/// Impossible calendar dates (`31/02/2020`) and two-digit years (`01/01/19`)
/// return `None`.
///
/// ```
/// use lac_common::parse_uk_date;
///
/// assert!(parse_uk_date("29/02/2020").is_some());
/// assert!(parse_uk_date("31/02/2020").is_none());
/// assert!(parse_uk_date("01/01/19").is_none());
/// ```
pub fn parse_uk_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if !is_digits(day, 1..=2) || !is_digits(month, 1..=2) || !is_digits(year, 4..=4) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}
