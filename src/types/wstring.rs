//! S7 WSTRING: `[max length: u16 BE][actual length: u16 BE][UTF-16 BE units; max length]`

use super::ValueError;

/// Header bytes preceding the characters
pub const HEADER_SIZE: usize = 4;

/// Largest capacity an S7 WSTRING can declare
pub const MAX_CAPACITY: usize = 16_382;

/// Bytes reserved in the data block for a string of `capacity` UTF-16 units.
#[must_use]
pub const fn reserved_size(capacity: usize) -> usize {
    capacity * 2 + HEADER_SIZE
}

/// Decode an S7 WSTRING from its full reserved area.
pub fn from_bytes(bytes: &[u8]) -> Result<String, ValueError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ValueError::WrongLength {
            expected: HEADER_SIZE,
            got: bytes.len(),
        });
    }

    let max = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    let len = usize::from(u16::from_be_bytes([bytes[2], bytes[3]]));
    if len > max {
        return Err(ValueError::MalformedHeader { len, max });
    }
    let data = &bytes[HEADER_SIZE..];
    if data.len() < len * 2 {
        return Err(ValueError::WrongLength {
            expected: HEADER_SIZE + len * 2,
            got: bytes.len(),
        });
    }

    let units = data[..len * 2]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| ValueError::InvalidUtf16)
}

/// Encode `value` into a buffer of [`reserved_size`]`(capacity)` bytes.
///
/// Capacity counts UTF-16 code units, so characters outside the basic
/// multilingual plane use two.
pub fn to_bytes(value: &str, capacity: usize) -> Result<Vec<u8>, ValueError> {
    if capacity > MAX_CAPACITY {
        return Err(ValueError::CapacityTooLarge {
            capacity,
            max: MAX_CAPACITY,
        });
    }
    let units: Vec<u16> = value.encode_utf16().collect();
    let len = units.len();
    if len > capacity {
        return Err(ValueError::StringTooLong { len, capacity });
    }

    let mut bytes = Vec::with_capacity(reserved_size(capacity));
    // Both fit in a u16: capacity <= 16382 and len <= capacity.
    #[allow(clippy::cast_possible_truncation)]
    let header = [capacity as u16, len as u16];
    for word in header {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    for unit in units {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes.resize(reserved_size(capacity), 0);
    Ok(bytes)
}
