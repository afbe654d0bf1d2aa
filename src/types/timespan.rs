//! S7 TIME: signed milliseconds as i32 big-endian

use chrono::TimeDelta;

use super::ValueError;

/// Encoded width in bytes
pub const SIZE: usize = 4;

/// Decode 4 bytes of TIME.
pub fn from_bytes(bytes: &[u8]) -> Result<TimeDelta, ValueError> {
    let millis = i32::from_be_bytes(super::number::fixed::<SIZE>(bytes)?);
    Ok(TimeDelta::milliseconds(i64::from(millis)))
}

/// Encode a duration as TIME, truncating to whole milliseconds.
pub fn to_bytes(value: &TimeDelta) -> Result<[u8; SIZE], ValueError> {
    let millis = value.num_milliseconds();
    i32::try_from(millis)
        .map(i32::to_be_bytes)
        .map_err(|_| ValueError::TimeSpanOutOfRange { millis })
}
