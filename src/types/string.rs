//! S7 STRING: `[max length: u8][actual length: u8][ASCII bytes; max length]`

use super::ValueError;

/// Header bytes preceding the characters
pub const HEADER_SIZE: usize = 2;

/// Largest capacity an S7 STRING can declare
pub const MAX_CAPACITY: usize = 254;

/// Bytes reserved in the data block for a string of `capacity` characters.
#[must_use]
pub const fn reserved_size(capacity: usize) -> usize {
    capacity + HEADER_SIZE
}

/// Decode an S7 STRING from its full reserved area.
pub fn from_bytes(bytes: &[u8]) -> Result<String, ValueError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ValueError::WrongLength {
            expected: HEADER_SIZE,
            got: bytes.len(),
        });
    }

    let max = usize::from(bytes[0]);
    let len = usize::from(bytes[1]);
    if len > max {
        return Err(ValueError::MalformedHeader { len, max });
    }
    let data = &bytes[HEADER_SIZE..];
    if data.len() < len {
        return Err(ValueError::WrongLength {
            expected: HEADER_SIZE + len,
            got: bytes.len(),
        });
    }

    data[..len]
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                Ok(char::from(b))
            } else {
                Err(ValueError::UnsupportedCharacter { ch: char::from(b) })
            }
        })
        .collect()
}

/// Encode `value` into a buffer of [`reserved_size`]`(capacity)` bytes.
pub fn to_bytes(value: &str, capacity: usize) -> Result<Vec<u8>, ValueError> {
    if capacity > MAX_CAPACITY {
        return Err(ValueError::CapacityTooLarge {
            capacity,
            max: MAX_CAPACITY,
        });
    }
    if let Some(ch) = value.chars().find(|c| !c.is_ascii()) {
        return Err(ValueError::UnsupportedCharacter { ch });
    }
    let len = value.len();
    if len > capacity {
        return Err(ValueError::StringTooLong { len, capacity });
    }

    // Both fit in a byte: capacity <= 254 and len <= capacity.
    #[allow(clippy::cast_possible_truncation)]
    let header = [capacity as u8, len as u8];
    let mut bytes = vec![0u8; reserved_size(capacity)];
    bytes[..HEADER_SIZE].copy_from_slice(&header);
    bytes[HEADER_SIZE..HEADER_SIZE + len].copy_from_slice(value.as_bytes());
    Ok(bytes)
}
