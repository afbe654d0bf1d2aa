//! Controller models

use std::fmt;
use std::str::FromStr;

use super::DateTimeRepr;

/// S7 controller family members with distinct data block conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CpuModel {
    /// S7-200
    S7200 = 0,
    /// LOGO! 0BA8
    Logo0BA8 = 1,
    /// S7-200 SMART
    S7200Smart = 2,
    /// S7-300
    S7300 = 10,
    /// S7-400
    S7400 = 20,
    /// S7-1200
    S71200 = 30,
    /// S7-1500
    S71500 = 40,
}

impl CpuModel {
    /// All known models
    pub const ALL: [Self; 7] = [
        Self::S7200,
        Self::Logo0BA8,
        Self::S7200Smart,
        Self::S7300,
        Self::S7400,
        Self::S71200,
        Self::S71500,
    ];

    /// Date/time representation used when a field declares none.
    ///
    /// Classic S7-300/400 blocks use DATE_AND_TIME, S7-1200/1500 use DTL.
    /// The small controllers have no date/time type in data blocks, so the
    /// field has to declare one explicitly.
    #[must_use]
    pub const fn date_time_default(self) -> Option<DateTimeRepr> {
        match self {
            Self::S7300 | Self::S7400 => Some(DateTimeRepr::DateAndTime),
            Self::S71200 | Self::S71500 => Some(DateTimeRepr::DateTimeLong),
            Self::S7200 | Self::Logo0BA8 | Self::S7200Smart => None,
        }
    }

    /// Canonical model name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::S7200 => "S7-200",
            Self::Logo0BA8 => "LOGO 0BA8",
            Self::S7200Smart => "S7-200 SMART",
            Self::S7300 => "S7-300",
            Self::S7400 => "S7-400",
            Self::S71200 => "S7-1200",
            Self::S71500 => "S7-1500",
        }
    }
}

impl fmt::Display for CpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a model name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CPU model `{0}`")]
pub struct UnknownCpuModel(pub String);

impl FromStr for CpuModel {
    type Err = UnknownCpuModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|model| {
                let name: String = model
                    .name()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                name == key
            })
            .ok_or_else(|| UnknownCpuModel(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time_defaults() {
        assert_eq!(
            CpuModel::S7300.date_time_default(),
            Some(DateTimeRepr::DateAndTime)
        );
        assert_eq!(
            CpuModel::S71500.date_time_default(),
            Some(DateTimeRepr::DateTimeLong)
        );
        assert_eq!(CpuModel::S7200.date_time_default(), None);
    }

    #[test]
    fn test_parse_loose_names() {
        assert_eq!("S7-1500".parse::<CpuModel>().unwrap(), CpuModel::S71500);
        assert_eq!("s7300".parse::<CpuModel>().unwrap(), CpuModel::S7300);
        assert_eq!(
            "logo 0ba8".parse::<CpuModel>().unwrap(),
            CpuModel::Logo0BA8
        );
        assert!("S7-1600".parse::<CpuModel>().is_err());

        for model in CpuModel::ALL {
            assert_eq!(model.to_string().parse::<CpuModel>().unwrap(), model);
        }
    }
}
