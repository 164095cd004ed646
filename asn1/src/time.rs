//! Calendar conversions and UTCTime / GeneralizedTime content.
//!
//! Every conversion here is restricted to the years 0000 through 9999, both
//! before and after any adjustment.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

const UTC_TIME_MIN_YEAR: i32 = 1950;
const UTC_TIME_MAX_YEAR: i32 = 2049;
const SECONDS_PER_DAY: i64 = 86_400;

fn check_range(tm: NaiveDateTime) -> Result<NaiveDateTime> {
    if (MIN_YEAR..=MAX_YEAR).contains(&tm.year()) {
        Ok(tm)
    } else {
        Err(Error::TimeOutOfRange(MIN_YEAR, MAX_YEAR))
    }
}

/// Converts seconds since the Unix epoch into a broken-out UTC time.
pub fn gmtime(time: i64) -> Result<NaiveDateTime> {
    let tm = DateTime::from_timestamp(time, 0)
        .ok_or(Error::TimeOutOfRange(MIN_YEAR, MAX_YEAR))?
        .naive_utc();
    check_range(tm)
}

/// Adds `offset_day` days and `offset_sec` seconds to `tm`.
pub fn gmtime_adj(tm: &NaiveDateTime, offset_day: i32, offset_sec: i64) -> Result<NaiveDateTime> {
    check_range(*tm)?;
    let delta = TimeDelta::try_days(i64::from(offset_day))
        .zip(TimeDelta::try_seconds(offset_sec))
        .and_then(|(days, secs)| days.checked_add(&secs))
        .ok_or(Error::TimeOutOfRange(MIN_YEAR, MAX_YEAR))?;
    let adjusted = tm
        .checked_add_signed(delta)
        .ok_or(Error::TimeOutOfRange(MIN_YEAR, MAX_YEAR))?;
    check_range(adjusted)
}

/// Difference `to - from` as whole days plus remaining seconds. Both parts
/// carry the same sign.
pub fn gmtime_diff(from: &NaiveDateTime, to: &NaiveDateTime) -> Result<(i32, i32)> {
    check_range(*from)?;
    check_range(*to)?;
    let total = (*to - *from).num_seconds();
    let days = i32::try_from(total / SECONDS_PER_DAY)
        .map_err(|_| Error::TimeOutOfRange(MIN_YEAR, MAX_YEAR))?;
    // |remainder| < 86400 always fits.
    let secs = (total % SECONDS_PER_DAY) as i32;
    Ok((days, secs))
}

fn digits(data: &[u8]) -> Option<u32> {
    data.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

fn assemble(year: i32, fields: &[u8]) -> Option<NaiveDateTime> {
    let month = digits(&fields[0..2])?;
    let day = digits(&fields[2..4])?;
    let hour = digits(&fields[4..6])?;
    let minute = digits(&fields[6..8])?;
    let second = digits(&fields[8..10])?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Parses `YYMMDDHHMMSSZ`. Two-digit years 50-99 are 19xx, 00-49 are 20xx.
pub fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime> {
    let [fields @ .., b'Z'] = data else {
        return Err(Error::UtcTimeInvalidFormat);
    };
    if fields.len() != 12 {
        return Err(Error::UtcTimeInvalidFormat);
    }
    let yy = digits(&fields[0..2]).ok_or(Error::UtcTimeInvalidFormat)? as i32;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    assemble(year, &fields[2..]).ok_or(Error::UtcTimeInvalidFormat)
}

/// Parses `YYYYMMDDHHMMSSZ`.
pub fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime> {
    let [fields @ .., b'Z'] = data else {
        return Err(Error::GeneralizedTimeInvalidFormat);
    };
    if fields.len() != 14 {
        return Err(Error::GeneralizedTimeInvalidFormat);
    }
    let year = digits(&fields[0..4]).ok_or(Error::GeneralizedTimeInvalidFormat)? as i32;
    assemble(year, &fields[4..]).ok_or(Error::GeneralizedTimeInvalidFormat)
}

pub fn format_utc_time(tm: &NaiveDateTime) -> Result<Vec<u8>> {
    if !(UTC_TIME_MIN_YEAR..=UTC_TIME_MAX_YEAR).contains(&tm.year()) {
        return Err(Error::TimeOutOfRange(UTC_TIME_MIN_YEAR, UTC_TIME_MAX_YEAR));
    }
    Ok(tm.format("%y%m%d%H%M%SZ").to_string().into_bytes())
}

pub fn format_generalized_time(tm: &NaiveDateTime) -> Result<Vec<u8>> {
    check_range(*tm)?;
    Ok(tm.format("%Y%m%d%H%M%SZ").to_string().into_bytes())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rstest::rstest;

    use super::*;

    fn tm(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[rstest(input, expected,
        case(0, "1970-01-01 00:00:00"),
        case(1_700_000_000, "2023-11-14 22:13:20"),
        case(-62_167_219_200, "0000-01-01 00:00:00"),
        case(253_402_300_799, "9999-12-31 23:59:59"),
    )]
    fn test_gmtime(input: i64, expected: &str) {
        assert_eq!(tm(expected), gmtime(input).unwrap());
    }

    #[rstest(input, case(-62_167_219_201), case(253_402_300_800), case(i64::MAX))]
    fn test_gmtime_out_of_range(input: i64) {
        assert_eq!(Error::TimeOutOfRange(0, 9999), gmtime(input).unwrap_err());
    }

    #[rstest(start, days, secs, expected,
        case("2024-02-28 12:00:00", 1, 0, Some("2024-02-29 12:00:00")),
        case("2024-02-28 12:00:00", 0, 43_200, Some("2024-02-29 00:00:00")),
        case("2024-01-01 00:00:00", -1, -1, Some("2023-12-30 23:59:59")),
        case("9999-12-31 00:00:00", 1, 0, None),
    )]
    fn test_gmtime_adj(start: &str, days: i32, secs: i64, expected: Option<&str>) {
        let actual = gmtime_adj(&tm(start), days, secs).ok();
        assert_eq!(expected.map(tm), actual);
    }

    #[rstest(from, to, expected,
        case("2024-01-01 00:00:00", "2024-01-02 00:00:01", (1, 1)),
        case("2024-01-02 00:00:01", "2024-01-01 00:00:00", (-1, -1)),
        case("2024-01-01 00:00:00", "2024-01-01 10:00:00", (0, 36_000)),
    )]
    fn test_gmtime_diff(from: &str, to: &str, expected: (i32, i32)) {
        assert_eq!(expected, gmtime_diff(&tm(from), &tm(to)).unwrap());
    }

    #[rstest(input, expected,
        case(b"191215190210Z".as_slice(), "2019-12-15 19:02:10"),
        case(b"500101000000Z".as_slice(), "1950-01-01 00:00:00"),
        case(b"491231235959Z".as_slice(), "2049-12-31 23:59:59"),
    )]
    fn test_utc_time(input: &[u8], expected: &str) {
        let actual = parse_utc_time(input).unwrap();
        assert_eq!(tm(expected), actual);
        assert_eq!(input, format_utc_time(&actual).unwrap().as_slice());
    }

    #[rstest(input,
        case(b"191215190210".as_slice()),
        case(b"1912151902Z".as_slice()),
        case(b"191315190210Z".as_slice()),
        case(b"191215190210-0800".as_slice()),
        case(b"19121519021aZ".as_slice()),
    )]
    fn test_utc_time_invalid(input: &[u8]) {
        assert_eq!(Error::UtcTimeInvalidFormat, parse_utc_time(input).unwrap_err());
    }

    #[rstest(input, expected,
        case(b"20191216030210Z".as_slice(), "2019-12-16 03:02:10"),
        case(b"00010101000000Z".as_slice(), "0001-01-01 00:00:00"),
    )]
    fn test_generalized_time(input: &[u8], expected: &str) {
        let actual = parse_generalized_time(input).unwrap();
        assert_eq!(tm(expected), actual);
        assert_eq!(input, format_generalized_time(&actual).unwrap().as_slice());
    }

    #[test]
    fn test_format_utc_time_out_of_range() {
        assert_eq!(
            Error::TimeOutOfRange(1950, 2049),
            format_utc_time(&tm("2050-01-01 00:00:00")).unwrap_err()
        );
    }
}
