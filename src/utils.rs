use crate::error::{Result, TrackerError};
use chrono::{Datelike, Local, NaiveDate};

/// Parses a `YYYY-MM` month key into `(year, month)`.
///
/// Only the zero-padded form is accepted, since every range filter in the
/// crate compares month keys as plain strings.
pub fn parse_month_key(key: &str) -> Result<(i32, u32)> {
    let bytes = key.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);

    if !well_formed {
        return Err(TrackerError::InvalidMonth(key.to_string()));
    }

    let year: i32 = key[..4]
        .parse()
        .map_err(|_| TrackerError::InvalidMonth(key.to_string()))?;
    let month: u32 = key[5..]
        .parse()
        .map_err(|_| TrackerError::InvalidMonth(key.to_string()))?;

    if !(1..=12).contains(&month) {
        return Err(TrackerError::InvalidMonth(key.to_string()));
    }

    Ok((year, month))
}

pub fn validate_month_key(key: &str) -> Result<()> {
    parse_month_key(key).map(|_| ())
}

pub fn is_month_key(key: &str) -> bool {
    parse_month_key(key).is_ok()
}

pub fn format_month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn month_key_of(date: NaiveDate) -> String {
    format_month_key(date.year(), date.month())
}

pub fn current_month() -> String {
    month_key_of(Local::now().date_naive())
}

pub fn next_month(key: &str) -> Result<String> {
    let (year, month) = parse_month_key(key)?;
    Ok(if month == 12 {
        format_month_key(year + 1, 1)
    } else {
        format_month_key(year, month + 1)
    })
}

pub fn months_between(start: &str, end: &str) -> Result<i32> {
    let (start_year, start_month) = parse_month_key(start)?;
    let (end_year, end_month) = parse_month_key(end)?;
    Ok((end_year - start_year) * 12 + end_month as i32 - start_month as i32)
}

/// First and last month key of a year range, for inclusive string filters.
pub fn year_bounds(from_year: Option<i32>, to_year: Option<i32>) -> (Option<String>, Option<String>) {
    (
        from_year.map(|y| format_month_key(y, 1)),
        to_year.map(|y| format_month_key(y, 12)),
    )
}

pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Percentage change from `previous` to `current`, `None` when `previous` is zero.
pub fn percentage_change(current: f64, previous: f64, precision: u32) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some(round_to((current - previous) / previous * 100.0, precision))
}

/// Parses a number written with either a decimal comma or a decimal point.
pub fn parse_flexible_number(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidNumber(input.to_string()));
    }

    let normalized = trimmed.replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| TrackerError::InvalidNumber(input.to_string()))?;

    if !value.is_finite() {
        return Err(TrackerError::InvalidNumber(input.to_string()));
    }
    Ok(value)
}

/// Parses a comma separated id list such as `"1, 2,3"`. Empty input yields `None`.
pub fn parse_id_list(input: &str) -> Result<Option<Vec<i64>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| TrackerError::Validation(format!("Invalid id '{}'", part)))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
