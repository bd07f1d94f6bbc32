use crate::consts::DAYS_PER_WEEK;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Day of the week, Monday first (ISO 8601 numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Weekday of the given day count since 1970-01-01, which was a Thursday.
    pub(crate) fn from_days_since_epoch(days: i64) -> Self {
        let offset = (days + 3).rem_euclid(DAYS_PER_WEEK);
        // rem_euclid keeps the offset in 0..7
        Self::ALL[usize::try_from(offset).unwrap_or_default()]
    }

    /// ISO weekday number, Monday = 1 through Sunday = 7
    pub const fn number_from_monday(self) -> u8 {
        self as u8 + 1
    }

    /// The following day of the week
    pub const fn succ(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }
}
