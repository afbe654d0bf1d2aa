//! S7 DTL (date and time long): 12 bytes
//!
//! ```text
//! bytes 0..2   year (u16 BE, 1970..=2262)
//! byte  2      month        byte 3  day
//! byte  4      weekday (1 = Sunday)
//! byte  5      hour         byte 6  minute       byte 7  second
//! bytes 8..12  nanoseconds (u32 BE)
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::ValueError;

/// Encoded width in bytes
pub const SIZE: usize = 12;

/// Lowest representable value
pub const MIN_TEXT: &str = "1970-01-01 00:00:00";

/// Highest representable value
pub const MAX_TEXT: &str = "2262-04-11 23:47:16.854775807";

const MIN: (i32, u32, u32, u32, u32, u32, u32) = (1970, 1, 1, 0, 0, 0, 0);
const MAX: (i32, u32, u32, u32, u32, u32, u32) = (2262, 4, 11, 23, 47, 16, 854_775_807);

fn in_range(component: &'static str, value: u32, min: u32, max: u32) -> Result<u32, ValueError> {
    if value < min || value > max {
        return Err(ValueError::ComponentOutOfRange {
            component,
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        });
    }
    Ok(value)
}

/// Decode 12 bytes of DTL.
pub fn from_bytes(bytes: &[u8]) -> Result<NaiveDateTime, ValueError> {
    let bytes = super::number::fixed::<SIZE>(bytes)?;

    let year = in_range(
        "year",
        u32::from(u16::from_be_bytes([bytes[0], bytes[1]])),
        1970,
        2262,
    )?;
    let month = in_range("month", u32::from(bytes[2]), 1, 12)?;
    let day = in_range("day", u32::from(bytes[3]), 1, 31)?;
    in_range("weekday", u32::from(bytes[4]), 1, 7)?;
    let hour = in_range("hour", u32::from(bytes[5]), 0, 23)?;
    let minute = in_range("minute", u32::from(bytes[6]), 0, 59)?;
    let second = in_range("second", u32::from(bytes[7]), 0, 59)?;
    let nanos = in_range(
        "nanosecond",
        u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        0,
        999_999_999,
    )?;

    #[allow(clippy::cast_possible_wrap)]
    let year = year as i32;
    let value = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanos))
        .ok_or_else(|| {
            ValueError::InvalidCalendar(format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{nanos:09}"
            ))
        })?;
    if (year, month, day, hour, minute, second, nanos) > MAX {
        return Err(ValueError::DateTimeOutOfRange {
            value: value.to_string(),
            min: MIN_TEXT,
            max: MAX_TEXT,
        });
    }
    Ok(value)
}

/// Encode a timestamp as DTL with nanosecond precision.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_bytes(value: &NaiveDateTime) -> Result<[u8; SIZE], ValueError> {
    // Leap seconds carry nanoseconds >= 1e9; DTL has no slot for them.
    let nanos = value.nanosecond().min(999_999_999);
    let key = (
        value.year(),
        value.month(),
        value.day(),
        value.hour(),
        value.minute(),
        value.second(),
        nanos,
    );
    if key < MIN || key > MAX {
        return Err(ValueError::DateTimeOutOfRange {
            value: value.to_string(),
            min: MIN_TEXT,
            max: MAX_TEXT,
        });
    }

    let mut bytes = [0u8; SIZE];
    bytes[0..2].copy_from_slice(&(value.year() as u16).to_be_bytes());
    bytes[2] = value.month() as u8;
    bytes[3] = value.day() as u8;
    bytes[4] = (value.weekday().num_days_from_sunday() + 1) as u8;
    bytes[5] = value.hour() as u8;
    bytes[6] = value.minute() as u8;
    bytes[7] = value.second() as u8;
    bytes[8..12].copy_from_slice(&nanos.to_be_bytes());
    Ok(bytes)
}
