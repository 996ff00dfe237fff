use std::fmt;

use crate::error::{ErrorSeverity, GameError};

/// Errors produced when constructing or combining [`TimeUnit`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimeUnitError {
    #[error("time unit {value} is outside [{min}, {max}] ms", min = TimeUnit::MIN_MS, max = TimeUnit::MAX_MS)]
    OutOfRange { value: i64 },
}

impl GameError for TimeUnitError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "TIME_UNIT_OUT_OF_RANGE",
        }
    }
}

/// Integer millisecond duration, the currency of every timing decision.
///
/// Always within `[0, 10000]`. Values outside that range are rejected at
/// construction and never clamped, and arithmetic stays in integers so that
/// two platforms replaying the same inputs agree bit for bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub struct TimeUnit(u32);

impl TimeUnit {
    pub const MIN_MS: i64 = 0;
    pub const MAX_MS: i64 = 10_000;

    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(Self::MAX_MS as u32);

    /// Validates `value` and wraps it.
    pub fn new(value: i64) -> Result<Self, TimeUnitError> {
        if (Self::MIN_MS..=Self::MAX_MS).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(TimeUnitError::OutOfRange { value })
        }
    }

    /// Milliseconds held by this unit.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Adds two units, failing if the sum leaves the valid range.
    pub fn checked_add(self, other: Self) -> Result<Self, TimeUnitError> {
        Self::new(i64::from(self.0) + i64::from(other.0))
    }
}

impl TryFrom<i64> for TimeUnit {
    type Error = TimeUnitError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeUnit> for i64 {
    fn from(unit: TimeUnit) -> Self {
        i64::from(unit.0)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inclusive_bounds() {
        assert_eq!(TimeUnit::new(0).unwrap(), TimeUnit::ZERO);
        assert_eq!(TimeUnit::new(10_000).unwrap(), TimeUnit::MAX);
    }

    #[test]
    fn rejects_values_outside_range() {
        assert_eq!(
            TimeUnit::new(10_001),
            Err(TimeUnitError::OutOfRange { value: 10_001 })
        );
        assert_eq!(TimeUnit::new(-1), Err(TimeUnitError::OutOfRange { value: -1 }));
    }

    #[test]
    fn checked_add_fails_past_maximum() {
        let a = TimeUnit::new(6_000).unwrap();
        let b = TimeUnit::new(4_000).unwrap();
        assert_eq!(a.checked_add(b).unwrap().get(), 10_000);

        let c = TimeUnit::new(4_001).unwrap();
        assert!(matches!(
            a.checked_add(c),
            Err(TimeUnitError::OutOfRange { value: 10_001 })
        ));
    }

    #[test]
    fn orders_structurally() {
        let early = TimeUnit::new(100).unwrap();
        let late = TimeUnit::new(900).unwrap();
        assert!(early < late);
        assert_eq!(early.max(late), late);
    }
}
