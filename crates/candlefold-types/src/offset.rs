//! Observer time-zone offset.

use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};

/// Fixed offset between the observer's wall clock and UTC, in seconds east of UTC.
///
/// The offset is captured once when a chart is created and stays fixed for
/// its lifetime; daylight-saving transitions mid-session are not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalOffset(i32);

impl LocalOffset {
    /// Zero offset.
    #[must_use]
    pub const fn utc() -> Self {
        Self(0)
    }

    /// Creates an offset from seconds east of UTC.
    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        Self(seconds)
    }

    /// Creates an offset from a chrono fixed offset.
    #[must_use]
    pub fn from_fixed(offset: FixedOffset) -> Self {
        Self(offset.local_minus_utc())
    }

    /// Captures the host's current local offset.
    ///
    /// Libraries never call this; binaries read it once at startup and pass
    /// the value down explicitly.
    #[must_use]
    pub fn current_local() -> Self {
        Self::from_fixed(Local::now().offset().fix())
    }

    /// Returns the offset in seconds east of UTC.
    #[must_use]
    pub const fn seconds(&self) -> i32 {
        self.0
    }

    /// Converts a millisecond timestamp into whole seconds in the bar time base.
    ///
    /// Milliseconds are floored toward negative infinity before the offset is
    /// removed.
    #[must_use]
    pub const fn bar_seconds(&self, timestamp_ms: i64) -> i64 {
        timestamp_ms.div_euclid(1000) - self.0 as i64
    }

    /// Returns the offset as a chrono fixed offset, if in range.
    #[must_use]
    pub fn to_fixed(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.0)
    }
}

impl From<FixedOffset> for LocalOffset {
    fn from(offset: FixedOffset) -> Self {
        Self::from_fixed(offset)
    }
}

impl std::fmt::Display for LocalOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return f.write_str("UTC");
        }
        match self.to_fixed() {
            Some(fixed) => write!(f, "{fixed}"),
            None => write!(f, "{}s", self.0),
        }
    }
}

impl std::str::FromStr for LocalOffset {
    type Err = std::num::ParseIntError;

    /// Parses an offset given in seconds east of UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Self)
    }
}
