//! Scalar codec errors

use thiserror::Error;

/// Errors raised by the fixed-width scalar codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Input slice does not have the codec's fixed width
    #[error("wrong length: expected {expected} bytes, got {got}")]
    WrongLength {
        /// Width the codec requires
        expected: usize,
        /// Width that was supplied
        got: usize,
    },

    /// A byte is not valid binary-coded decimal
    #[error("invalid BCD byte {byte:#04x}")]
    InvalidBcd {
        /// Offending byte
        byte: u8,
    },

    /// A date/time component is outside its allowed range
    #[error("{component} {value} outside {min}..={max}")]
    ComponentOutOfRange {
        /// Component name (month, day, ...)
        component: &'static str,
        /// Decoded value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// Components form no valid calendar date/time (e.g. 31 February)
    #[error("invalid calendar date/time {0}")]
    InvalidCalendar(String),

    /// Date/time cannot be represented by the target encoding
    #[error("date/time {value} outside supported range {min}..={max}")]
    DateTimeOutOfRange {
        /// Rejected value
        value: String,
        /// Lowest representable value
        min: &'static str,
        /// Highest representable value
        max: &'static str,
    },

    /// Duration does not fit into an S7 TIME
    #[error("time span of {millis} ms outside the S7 TIME range")]
    TimeSpanOutOfRange {
        /// Rejected duration in milliseconds
        millis: i64,
    },

    /// Declared capacity exceeds what the string encoding allows
    #[error("string capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// Declared capacity
        capacity: usize,
        /// Encoding limit
        max: usize,
    },

    /// Value holds more characters than the reserved capacity
    #[error("string of {len} characters exceeds capacity {capacity}")]
    StringTooLong {
        /// Character count of the value
        len: usize,
        /// Reserved capacity
        capacity: usize,
    },

    /// Stored actual length is larger than the stored maximum length
    #[error("malformed string header: length {len} exceeds maximum {max}")]
    MalformedHeader {
        /// Stored actual length
        len: usize,
        /// Stored maximum length
        max: usize,
    },

    /// Character cannot be represented by the string encoding
    #[error("character {ch:?} is not representable")]
    UnsupportedCharacter {
        /// Offending character
        ch: char,
    },

    /// Stored UTF-16 data is not valid
    #[error("invalid UTF-16 string data")]
    InvalidUtf16,
}
