//! S7 DATE_AND_TIME: 8 bytes of binary-coded decimal
//!
//! ```text
//! byte 0  year (BCD, 90..99 = 1990..1999, 00..89 = 2000..2089)
//! byte 1  month     byte 2  day      byte 3  hour
//! byte 4  minute    byte 5  second
//! byte 6  milliseconds / 10 (BCD)
//! byte 7  high nibble: milliseconds % 10, low nibble: weekday (1 = Sunday)
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::ValueError;

/// Encoded width in bytes
pub const SIZE: usize = 8;

/// Lowest representable value
pub const MIN_TEXT: &str = "1990-01-01 00:00:00";

/// Highest representable value
pub const MAX_TEXT: &str = "2089-12-31 23:59:59.999";

const MIN_YEAR: i32 = 1990;
const MAX_YEAR: i32 = 2089;

fn decode_bcd(byte: u8) -> Result<u8, ValueError> {
    let (high, low) = (byte >> 4, byte & 0x0F);
    if high > 9 || low > 9 {
        return Err(ValueError::InvalidBcd { byte });
    }
    Ok(high * 10 + low)
}

const fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

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

/// Decode 8 bytes of DATE_AND_TIME.
///
/// The weekday nibble is validated but otherwise ignored; the weekday is
/// implied by the date.
pub fn from_bytes(bytes: &[u8]) -> Result<NaiveDateTime, ValueError> {
    let bytes = super::number::fixed::<SIZE>(bytes)?;

    let short_year = i32::from(decode_bcd(bytes[0])?);
    let year = if short_year < 90 {
        2000 + short_year
    } else {
        1900 + short_year
    };
    let month = in_range("month", u32::from(decode_bcd(bytes[1])?), 1, 12)?;
    let day = in_range("day", u32::from(decode_bcd(bytes[2])?), 1, 31)?;
    let hour = in_range("hour", u32::from(decode_bcd(bytes[3])?), 0, 23)?;
    let minute = in_range("minute", u32::from(decode_bcd(bytes[4])?), 0, 59)?;
    let second = in_range("second", u32::from(decode_bcd(bytes[5])?), 0, 59)?;

    let ms_low = bytes[7] >> 4;
    if ms_low > 9 {
        return Err(ValueError::InvalidBcd { byte: bytes[7] });
    }
    let millis = u32::from(decode_bcd(bytes[6])?) * 10 + u32::from(ms_low);
    in_range("weekday", u32::from(bytes[7] & 0x0F), 1, 7)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millis))
        .ok_or_else(|| {
            ValueError::InvalidCalendar(format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{millis:03}"
            ))
        })
}

/// Encode a timestamp as DATE_AND_TIME, truncating to milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_bytes(value: &NaiveDateTime) -> Result<[u8; SIZE], ValueError> {
    let year = value.year();
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ValueError::DateTimeOutOfRange {
            value: value.to_string(),
            min: MIN_TEXT,
            max: MAX_TEXT,
        });
    }

    // Leap seconds carry nanoseconds >= 1e9; fold them into the last millisecond.
    let millis = (value.nanosecond() / 1_000_000).min(999);
    let short_year = if year < 2000 { year - 1900 } else { year - 2000 };
    let weekday = value.weekday().num_days_from_sunday() + 1;

    // Every component below is < 100 after the range check above.
    Ok([
        encode_bcd(short_year as u8),
        encode_bcd(value.month() as u8),
        encode_bcd(value.day() as u8),
        encode_bcd(value.hour() as u8),
        encode_bcd(value.minute() as u8),
        encode_bcd(value.second() as u8),
        encode_bcd((millis / 10) as u8),
        (((millis % 10) as u8) << 4) | weekday as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    #[test]
    fn test_known_encoding() {
        // 2024-03-15 was a Friday (weekday 6 when Sunday is 1).
        let bytes = to_bytes(&at(2024, 3, 15, 13, 45, 59, 123)).unwrap();
        assert_eq!(bytes, [0x24, 0x03, 0x15, 0x13, 0x45, 0x59, 0x12, 0x36]);
        assert_eq!(from_bytes(&bytes).unwrap(), at(2024, 3, 15, 13, 45, 59, 123));
    }

    #[test]
    fn test_nineties_map_to_last_century() {
        let bytes = [0x95, 0x12, 0x31, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(from_bytes(&bytes).unwrap(), at(1995, 12, 31, 0, 0, 0, 0));
    }

    #[test]
    fn test_out_of_range_year_rejected() {
        assert!(matches!(
            to_bytes(&at(1989, 12, 31, 23, 59, 59, 0)),
            Err(ValueError::DateTimeOutOfRange { .. })
        ));
        assert!(to_bytes(&at(2089, 12, 31, 23, 59, 59, 999)).is_ok());
        assert!(to_bytes(&at(2090, 1, 1, 0, 0, 0, 0)).is_err());
    }

    #[test]
    fn test_malformed_input_rejected() {
        let bad_month = [0x24, 0x13, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            from_bytes(&bad_month),
            Err(ValueError::ComponentOutOfRange {
                component: "month",
                ..
            })
        ));

        let bad_bcd = [0x2A, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(from_bytes(&bad_bcd), Err(ValueError::InvalidBcd { byte: 0x2A }));

        let february_30 = [0x24, 0x02, 0x30, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            from_bytes(&february_30),
            Err(ValueError::InvalidCalendar(_))
        ));
    }
}
