//! Per-field variant configuration and its resolution

use std::fmt;
use std::str::FromStr;

use super::{CpuModel, Error, Result};
use crate::types::{date_time, date_time_long, string, wstring};

/// Binary representation of a date/time field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateTimeRepr {
    /// DATE_AND_TIME, 8 bytes BCD, millisecond precision
    DateAndTime,
    /// DTL, 12 bytes, nanosecond precision
    DateTimeLong,
}

impl DateTimeRepr {
    /// Width in bytes
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::DateAndTime => date_time::SIZE,
            Self::DateTimeLong => date_time_long::SIZE,
        }
    }
}

impl fmt::Display for DateTimeRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateAndTime => f.write_str("DATE_AND_TIME"),
            Self::DateTimeLong => f.write_str("DTL"),
        }
    }
}

impl FromStr for DateTimeRepr {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace(['_', ' '], "").as_str() {
            "DT" | "DATEANDTIME" | "SHORT" => Ok(Self::DateAndTime),
            "DTL" | "DATETIMELONG" | "LONG" => Ok(Self::DateTimeLong),
            _ => Err(UnknownVariant::new(s, "DATE_AND_TIME or DTL")),
        }
    }
}

/// Character encoding of a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringEncoding {
    /// STRING: one ASCII byte per character, 2-byte header
    S7String,
    /// WSTRING: one UTF-16 unit per character, 4-byte header
    S7WString,
}

impl StringEncoding {
    /// Largest declarable capacity
    #[must_use]
    pub const fn max_capacity(self) -> usize {
        match self {
            Self::S7String => string::MAX_CAPACITY,
            Self::S7WString => wstring::MAX_CAPACITY,
        }
    }

    /// Bytes reserved for a field of `capacity` characters, header included
    #[must_use]
    pub const fn reserved_size(self, capacity: usize) -> usize {
        match self {
            Self::S7String => string::reserved_size(capacity),
            Self::S7WString => wstring::reserved_size(capacity),
        }
    }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S7String => f.write_str("STRING"),
            Self::S7WString => f.write_str("WSTRING"),
        }
    }
}

impl FromStr for StringEncoding {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace(['_', ' '], "").as_str() {
            "STRING" | "S7STRING" | "SINGLEBYTE" => Ok(Self::S7String),
            "WSTRING" | "S7WSTRING" | "DOUBLEBYTE" => Ok(Self::S7WString),
            _ => Err(UnknownVariant::new(s, "STRING or WSTRING")),
        }
    }
}

/// Error returned when a representation or encoding name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{name}`, expected {expected}")]
pub struct UnknownVariant {
    /// The rejected name
    pub name: String,
    /// The accepted names
    pub expected: &'static str,
}

impl UnknownVariant {
    fn new(name: &str, expected: &'static str) -> Self {
        Self {
            name: name.to_owned(),
            expected,
        }
    }

    /// Attach the field the name was read for.
    #[must_use]
    pub fn for_field(self, record: impl Into<String>, field: impl Into<String>) -> Error {
        Error::InvalidVariant {
            record: record.into(),
            field: field.into(),
            reason: self.to_string(),
        }
    }
}

/// Declarative metadata selecting among a field's binary encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum VariantConfig {
    /// Date/time representation
    DateTime {
        /// Chosen representation
        representation: DateTimeRepr,
    },
    /// String encoding and reserved capacity in characters
    String {
        /// Chosen encoding
        encoding: StringEncoding,
        /// Maximum number of characters
        capacity: usize,
    },
}

impl VariantConfig {
    /// Date/time variant
    #[must_use]
    pub const fn date_time(representation: DateTimeRepr) -> Self {
        Self::DateTime { representation }
    }

    /// String variant
    #[must_use]
    pub const fn string(encoding: StringEncoding, capacity: usize) -> Self {
        Self::String { encoding, capacity }
    }

    pub(crate) const fn kind_name(&self) -> &'static str {
        match self {
            Self::DateTime { .. } => "date-time",
            Self::String { .. } => "string",
        }
    }
}

/// Resolve the representation of a date/time field: explicit first, then
/// the controller default.
pub(crate) fn resolve_date_time(
    explicit: Option<&VariantConfig>,
    cpu: CpuModel,
    record: &str,
    field: &str,
) -> Result<DateTimeRepr> {
    match explicit {
        Some(VariantConfig::DateTime { representation }) => Ok(*representation),
        Some(other) => Err(Error::InvalidVariant {
            record: record.to_owned(),
            field: field.to_owned(),
            reason: format!("{} variant on a date-time field", other.kind_name()),
        }),
        None => cpu
            .date_time_default()
            .ok_or_else(|| Error::ConfigurationMissing {
                record: record.to_owned(),
                field: field.to_owned(),
                required: "date-time representation",
            }),
    }
}

/// Resolve the encoding of a string field. There is no default.
pub(crate) fn resolve_string(
    explicit: Option<&VariantConfig>,
    record: &str,
    field: &str,
) -> Result<(StringEncoding, usize)> {
    match explicit {
        Some(VariantConfig::String { encoding, capacity }) => Ok((*encoding, *capacity)),
        Some(other) => Err(Error::InvalidVariant {
            record: record.to_owned(),
            field: field.to_owned(),
            reason: format!("{} variant on a string field", other.kind_name()),
        }),
        None => Err(Error::ConfigurationMissing {
            record: record.to_owned(),
            field: field.to_owned(),
            required: "string encoding and capacity",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_reserved_sizes() {
        assert_eq!(StringEncoding::S7String.reserved_size(10), 12);
        assert_eq!(StringEncoding::S7WString.reserved_size(10), 24);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "dtl".parse::<DateTimeRepr>().unwrap(),
            DateTimeRepr::DateTimeLong
        );
        assert_eq!(
            "Date_And_Time".parse::<DateTimeRepr>().unwrap(),
            DateTimeRepr::DateAndTime
        );
        assert_eq!(
            "wstring".parse::<StringEncoding>().unwrap(),
            StringEncoding::S7WString
        );
        let err = "utf8".parse::<StringEncoding>().unwrap_err();
        assert_eq!(
            err,
            UnknownVariant {
                name: "utf8".into(),
                expected: "STRING or WSTRING",
            }
        );
        assert_eq!(
            err.for_field("Recipe", "name"),
            Error::InvalidVariant {
                record: "Recipe".into(),
                field: "name".into(),
                reason: "unknown variant `utf8`, expected STRING or WSTRING".into(),
            }
        );
        assert_eq!(
            "iso".parse::<DateTimeRepr>().unwrap_err().to_string(),
            "unknown variant `iso`, expected DATE_AND_TIME or DTL"
        );
    }

    #[test]
    fn test_date_resolution_order() {
        let explicit = VariantConfig::date_time(DateTimeRepr::DateAndTime);
        assert_eq!(
            resolve_date_time(Some(&explicit), CpuModel::S71500, "R", "f").unwrap(),
            DateTimeRepr::DateAndTime
        );
        assert_eq!(
            resolve_date_time(None, CpuModel::S71200, "R", "f").unwrap(),
            DateTimeRepr::DateTimeLong
        );
        assert!(matches!(
            resolve_date_time(None, CpuModel::Logo0BA8, "R", "f"),
            Err(Error::ConfigurationMissing { .. })
        ));
    }

    #[test]
    fn test_string_never_defaults() {
        let err = resolve_string(None, "Recipe", "name").unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationMissing {
                record: "Recipe".into(),
                field: "name".into(),
                required: "string encoding and capacity",
            }
        );
    }
}
