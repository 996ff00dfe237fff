//! Action time costs.
//!
//! Converts a base action cost into the time an actor actually spends on it,
//! taking agility (faster) and encumbrance (slower) into account.
//!
//! Formula, in percent fixed point:
//! - encumbrance_factor = 100 + 10 × encumbrance
//! - agility_factor     = 50 + agility
//! - time = (base × encumbrance_factor + agility_factor / 2) / agility_factor
//!
//! Adding half the divisor before dividing rounds half up. This is the
//! balance-relevant formula; it must stay integer-only.

use super::{TimeUnit, TimeUnitError};
use crate::error::{ErrorSeverity, GameError};

/// Highest agility score accepted by [`action_time`].
pub const MAX_AGILITY: u32 = 100;

/// Agility score that neither speeds up nor slows down an action.
pub const NEUTRAL_AGILITY: u32 = 50;

/// Highest encumbrance level accepted by [`action_time`].
pub const MAX_ENCUMBRANCE: u32 = 20;

const FIXED_POINT_SCALE: u64 = 100;
const ENCUMBRANCE_STEP: u64 = 10;

/// Errors raised by the time-cost calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimeCostError {
    #[error("agility {0} exceeds maximum of {MAX_AGILITY}")]
    AgilityOutOfRange(u32),

    #[error("encumbrance {0} exceeds maximum of {MAX_ENCUMBRANCE}")]
    EncumbranceOutOfRange(u32),

    #[error("action time does not fit in a time unit")]
    Overflow(#[source] TimeUnitError),
}

impl GameError for TimeCostError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AgilityOutOfRange(_) => "COST_AGILITY_OUT_OF_RANGE",
            Self::EncumbranceOutOfRange(_) => "COST_ENCUMBRANCE_OUT_OF_RANGE",
            Self::Overflow(_) => "COST_OVERFLOW",
        }
    }
}

/// Actor modifiers that feed into [`action_time`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorModifiers {
    pub agility: u32,
    pub encumbrance: u32,
}

impl ActorModifiers {
    pub const NEUTRAL: Self = Self {
        agility: NEUTRAL_AGILITY,
        encumbrance: 0,
    };

    pub const fn new(agility: u32, encumbrance: u32) -> Self {
        Self {
            agility,
            encumbrance,
        }
    }

    /// Time spent on an action of `base` cost by an actor with these modifiers.
    pub fn action_time(&self, base: TimeUnit) -> Result<TimeUnit, TimeCostError> {
        action_time(base, self.agility, self.encumbrance)
    }
}

impl Default for ActorModifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Calculate the time an action takes.
///
/// # Examples
/// - base 1000, agility 50, encumbrance 0: 1000 × 100 / 100 = 1000
/// - base 1000, agility 100, encumbrance 0: (100000 + 75) / 150 = 667
/// - base 1000, agility 50, encumbrance 5: (150000 + 50) / 100 = 1500
pub fn action_time(
    base: TimeUnit,
    agility: u32,
    encumbrance: u32,
) -> Result<TimeUnit, TimeCostError> {
    if agility > MAX_AGILITY {
        return Err(TimeCostError::AgilityOutOfRange(agility));
    }
    if encumbrance > MAX_ENCUMBRANCE {
        return Err(TimeCostError::EncumbranceOutOfRange(encumbrance));
    }

    let encumbrance_factor = FIXED_POINT_SCALE + ENCUMBRANCE_STEP * u64::from(encumbrance);
    let agility_factor = FIXED_POINT_SCALE / 2 + u64::from(agility);

    let scaled = u64::from(base.get()) * encumbrance_factor;
    let time = (scaled + agility_factor / 2) / agility_factor;

    // Bounded by 10000 × 300 / 50, so the conversion cannot truncate.
    TimeUnit::new(time as i64).map_err(TimeCostError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tu(ms: i64) -> TimeUnit {
        TimeUnit::new(ms).unwrap()
    }

    #[test]
    fn neutral_modifiers_keep_base_cost() {
        assert_eq!(action_time(tu(1000), NEUTRAL_AGILITY, 0).unwrap(), tu(1000));
        assert_eq!(
            ActorModifiers::default().action_time(tu(350)).unwrap(),
            tu(350)
        );
    }

    #[test]
    fn agility_speeds_up_with_half_up_rounding() {
        // 100000 / 150 = 666.67 -> 667
        assert_eq!(action_time(tu(1000), 100, 0).unwrap(), tu(667));
        // 10000 / 150 = 66.67 -> 67
        assert_eq!(action_time(tu(100), 100, 0).unwrap(), tu(67));
    }

    #[test]
    fn rounds_exact_halves_up() {
        // base 1, agility 0: 100 / 50 = 2 exactly
        assert_eq!(action_time(tu(1), 0, 0).unwrap(), tu(2));
        // 3 × 150 = 450, + 50 = 500, / 100 = 5 (4.5 rounds up)
        assert_eq!(action_time(tu(3), 50, 5).unwrap(), tu(5));
        // 1 × 100 = 100, + 75 = 175, / 150 = 1 (0.667 rounds up)
        assert_eq!(action_time(tu(1), 100, 0).unwrap(), tu(1));
    }

    #[test]
    fn encumbrance_slows_down() {
        assert_eq!(action_time(tu(1000), 50, 5).unwrap(), tu(1500));
        assert_eq!(action_time(tu(1000), 0, 0).unwrap(), tu(2000));
    }

    #[test]
    fn rejects_out_of_range_modifiers() {
        assert_eq!(
            action_time(tu(100), 101, 0),
            Err(TimeCostError::AgilityOutOfRange(101))
        );
        assert_eq!(
            action_time(tu(100), 50, 21),
            Err(TimeCostError::EncumbranceOutOfRange(21))
        );
    }

    #[test]
    fn overflowing_result_is_an_error() {
        let result = action_time(tu(10_000), 0, 20);
        assert!(matches!(result, Err(TimeCostError::Overflow(_))));
    }
}
