//! Calendar conversions for the `Date32`/`Timestamp64`/`Time32`/`Time64`
//! vector variants, which store plain integers (days/micros-since-epoch)
//! with no calendar awareness of their own. Kept as a thin seam over
//! `chrono` so the integer storage never has to special-case leap years,
//! month lengths, or calendar arithmetic itself.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Error, Result};

/// Encode a calendar date as the `Date32` representation: days since the
/// Unix epoch (1970-01-01), matching Arrow's `Date32` convention.
pub fn date32_from_ymd(year: i32, month: u32, day: u32) -> Result<i32> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::TypeMismatch(format!("no such date: {year}-{month:02}-{day:02}")))?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    Ok((date - epoch).num_days() as i32)
}

/// Decode a `Date32` value back to a calendar date.
pub fn date32_to_ymd(days: i32) -> (i32, u32, u32) {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let date = epoch + chrono::Duration::days(days as i64);
    (date.year(), date.month(), date.day())
}

/// Encode a timestamp as the `Timestamp64` representation: microseconds
/// since the Unix epoch, matching Arrow's microsecond-resolution convention.
pub fn timestamp64_from_ymd_hms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> Result<i64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::TypeMismatch(format!("no such date: {year}-{month:02}-{day:02}")))?;
    let time = NaiveTime::from_hms_opt(hour, min, sec)
        .ok_or_else(|| Error::TypeMismatch(format!("no such time: {hour:02}:{min:02}:{sec:02}")))?;
    let dt = NaiveDateTime::new(date, time);
    let epoch = NaiveDateTime::new(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(), NaiveTime::MIN);
    Ok((dt - epoch).num_microseconds().unwrap_or(i64::MAX))
}

/// Decode a `Timestamp64` value back to a broken-down UTC date/time.
pub fn timestamp64_to_ymd_hms(micros: i64) -> (i32, u32, u32, u32, u32, u32) {
    let epoch = NaiveDateTime::new(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(), NaiveTime::MIN);
    let dt = epoch + chrono::Duration::microseconds(micros);
    (
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    )
}

/// Encode a time-of-day as the `Time32` representation: milliseconds since
/// midnight.
pub fn time32_from_hms(hour: u32, min: u32, sec: u32) -> Result<i32> {
    let time = NaiveTime::from_hms_opt(hour, min, sec)
        .ok_or_else(|| Error::TypeMismatch(format!("no such time: {hour:02}:{min:02}:{sec:02}")))?;
    Ok((time.num_seconds_from_midnight() as i32) * 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date32_epoch_roundtrips_to_zero() {
        assert_eq!(date32_from_ymd(1970, 1, 1).unwrap(), 0);
        assert_eq!(date32_to_ymd(0), (1970, 1, 1));
    }

    #[test]
    fn date32_roundtrips_arbitrary_date() {
        let days = date32_from_ymd(2024, 3, 17).unwrap();
        assert_eq!(date32_to_ymd(days), (2024, 3, 17));
    }

    #[test]
    fn date32_rejects_invalid_calendar_date() {
        assert!(date32_from_ymd(2023, 2, 29).is_err());
    }

    #[test]
    fn timestamp64_roundtrips_through_microseconds() {
        let micros = timestamp64_from_ymd_hms(2024, 3, 17, 13, 45, 30).unwrap();
        assert_eq!(timestamp64_to_ymd_hms(micros), (2024, 3, 17, 13, 45, 30));
    }

    #[test]
    fn time32_midnight_is_zero() {
        assert_eq!(time32_from_hms(0, 0, 0).unwrap(), 0);
        assert_eq!(time32_from_hms(1, 0, 0).unwrap(), 3_600_000);
    }
}
