//! Bar bucket width definitions.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

/// Fixed duration of one bar, in whole seconds.
///
/// A width is fixed for the lifetime of a bar sequence. Switching widths
/// means re-seeding the sequence, never re-bucketing existing bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BucketWidth(NonZeroU32);

impl BucketWidth {
    /// One-minute buckets.
    pub const MINUTE: Self = Self(NonZeroU32::MIN.saturating_add(59));
    /// One-hour buckets (intraday charts).
    pub const HOUR: Self = Self(NonZeroU32::MIN.saturating_add(3_599));
    /// One-day buckets (multi-day charts).
    pub const DAY: Self = Self(NonZeroU32::MIN.saturating_add(86_399));

    /// Creates a width from a number of seconds, or `None` for zero.
    #[must_use]
    pub const fn from_secs(seconds: u32) -> Option<Self> {
        match NonZeroU32::new(seconds) {
            Some(s) => Some(Self(s)),
            None => None,
        }
    }

    /// Returns the width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.0.get()
    }

    /// Returns the width in seconds as a signed value for time arithmetic.
    #[must_use]
    pub const fn seconds_i64(&self) -> i64 {
        self.0.get() as i64
    }

    /// Returns the short label used on the command line and in seed files.
    #[must_use]
    pub fn label(&self) -> String {
        let s = self.seconds();
        if s % 86_400 == 0 {
            format!("{}d", s / 86_400)
        } else if s % 3_600 == 0 {
            format!("{}h", s / 3_600)
        } else if s % 60 == 0 {
            format!("{}m", s / 60)
        } else {
            format!("{s}s")
        }
    }

    /// Returns the named widths offered for selection.
    #[must_use]
    pub const fn presets() -> &'static [Self] {
        &[Self::MINUTE, Self::HOUR, Self::DAY]
    }
}

impl From<ChartMode> for BucketWidth {
    fn from(mode: ChartMode) -> Self {
        mode.bucket_width()
    }
}

impl From<BucketWidth> for u32 {
    fn from(width: BucketWidth) -> Self {
        width.seconds()
    }
}

impl TryFrom<u32> for BucketWidth {
    type Error = BucketWidthParseError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::from_secs(seconds).ok_or(BucketWidthParseError::Zero)
    }
}

impl std::fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BucketWidth {
    type Err = BucketWidthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Ok(mode) = lower.parse::<ChartMode>() {
            return Ok(mode.bucket_width());
        }

        // Accept both "4h" and "h4" spellings.
        let (digits, unit) = match lower.find(|c: char| !c.is_ascii_digit()) {
            Some(0) => {
                let split = lower
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(|| BucketWidthParseError::Invalid(s.to_string()))?;
                let (unit, digits) = lower.split_at(split);
                (digits.to_string(), unit.to_string())
            }
            Some(i) => {
                let (digits, unit) = lower.split_at(i);
                (digits.to_string(), unit.to_string())
            }
            None => (lower.clone(), "s".to_string()),
        };

        let count: u32 = digits
            .parse()
            .map_err(|_| BucketWidthParseError::Invalid(s.to_string()))?;
        let multiplier = match unit.as_str() {
            "s" => 1,
            "m" => 60,
            "h" => 3_600,
            "d" => 86_400,
            _ => return Err(BucketWidthParseError::Invalid(s.to_string())),
        };
        let seconds = count
            .checked_mul(multiplier)
            .ok_or_else(|| BucketWidthParseError::Invalid(s.to_string()))?;
        Self::from_secs(seconds).ok_or(BucketWidthParseError::Zero)
    }
}

/// User-facing chart mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChartMode {
    /// Hourly bars.
    #[default]
    Intraday,
    /// Daily bars.
    MultiDay,
}

impl ChartMode {
    /// Returns the bucket width this mode charts with.
    #[must_use]
    pub const fn bucket_width(&self) -> BucketWidth {
        match self {
            Self::Intraday => BucketWidth::HOUR,
            Self::MultiDay => BucketWidth::DAY,
        }
    }

    /// Returns the mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::MultiDay => "multi-day",
        }
    }

    /// Returns all chart modes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Intraday, Self::MultiDay]
    }
}

impl std::fmt::Display for ChartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartMode {
    type Err = BucketWidthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intraday" | "hourly" => Ok(Self::Intraday),
            "multi-day" | "multiday" | "daily" => Ok(Self::MultiDay),
            _ => Err(BucketWidthParseError::Invalid(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid bucket width.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketWidthParseError {
    /// Width of zero seconds.
    #[error("bucket width must be positive")]
    Zero,

    /// Unrecognized width string.
    #[error(
        "invalid bucket width '{0}', expected intraday, multi-day, or a duration like 1h, 1d, 15m, 30s"
    )]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(BucketWidth::MINUTE.seconds(), 60);
        assert_eq!(BucketWidth::HOUR.seconds(), 3_600);
        assert_eq!(BucketWidth::DAY.seconds(), 86_400);
        assert_eq!(ChartMode::Intraday.bucket_width(), BucketWidth::HOUR);
        assert_eq!(ChartMode::MultiDay.bucket_width(), BucketWidth::DAY);
    }

    #[test]
    fn test_parse() {
        assert_eq!("intraday".parse::<BucketWidth>().unwrap(), BucketWidth::HOUR);
        assert_eq!("multi-day".parse::<BucketWidth>().unwrap(), BucketWidth::DAY);
        assert_eq!("1h".parse::<BucketWidth>().unwrap(), BucketWidth::HOUR);
        assert_eq!("H1".parse::<BucketWidth>().unwrap(), BucketWidth::HOUR);
        assert_eq!("d1".parse::<BucketWidth>().unwrap(), BucketWidth::DAY);
        assert_eq!("15m".parse::<BucketWidth>().unwrap().seconds(), 900);
        assert_eq!("4h".parse::<BucketWidth>().unwrap().seconds(), 14_400);
        assert_eq!("90".parse::<BucketWidth>().unwrap().seconds(), 90);
        assert_eq!("30s".parse::<BucketWidth>().unwrap().seconds(), 30);
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!("0".parse::<BucketWidth>(), Err(BucketWidthParseError::Zero));
        assert_eq!("0h".parse::<BucketWidth>(), Err(BucketWidthParseError::Zero));
        assert!("weekly".parse::<BucketWidth>().is_err());
        assert!("1w".parse::<BucketWidth>().is_err());
        assert!("".parse::<BucketWidth>().is_err());
        assert!("h".parse::<BucketWidth>().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(BucketWidth::HOUR.to_string(), "1h");
        assert_eq!(BucketWidth::DAY.to_string(), "1d");
        assert_eq!(BucketWidth::from_secs(900).unwrap().to_string(), "15m");
        assert_eq!(BucketWidth::from_secs(45).unwrap().to_string(), "45s");
    }

    #[test]
    fn test_serde_as_seconds() {
        assert_eq!(serde_json::to_string(&BucketWidth::HOUR).unwrap(), "3600");
        let width: BucketWidth = serde_json::from_str("86400").unwrap();
        assert_eq!(width, BucketWidth::DAY);
        assert!(serde_json::from_str::<BucketWidth>("0").is_err());
    }
}
