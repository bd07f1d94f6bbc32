mod consts;
mod prelude;
pub mod session;
mod types;
mod weekday;

pub use consts::*;
pub use session::{Session, SessionError, SessionOptions, Summary, summarize};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};
pub use weekday::Weekday;

use crate::prelude::*;
use std::convert::TryFrom;
use std::str::FromStr;

/// A calendar day in the proleptic Gregorian calendar.
///
/// A `Date` can only be obtained through a validating constructor, so every
/// value names a day that exists. Ordering is chronological: by year, then
/// month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{} {} {}", "day.get()", "month.name()", "year.get()")]
pub struct Date {
    // Field order drives the derived lexicographic ordering
    year:  types::Year,
    month: types::Month,
    day:   types::Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date: {day}/{month}/{year}")]
    InvalidDate { day: i32, month: i32, year: i32 },
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(i32),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { day: i32, month: u8, year: i32 },
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl Date {
    /// Creates a date from day, month and year, in that order.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDate` carrying the given values if the month
    /// is outside 1-12 or the day does not exist in that month and year.
    pub fn new(day: i32, month: i32, year: i32) -> Result<Self, DateError> {
        Self::from_parts(day, month, year).map_err(|_| DateError::InvalidDate { day, month, year })
    }

    /// Creates a date from already validated components
    pub const fn from_typed(year: types::Year, month: types::Month, day: types::Day) -> Self {
        Self { year, month, day }
    }

    fn from_parts(day: i32, month: i32, year: i32) -> Result<Self, DateError> {
        let month = types::Month::new(month)?;
        let day = types::Day::new(day, year, month)?;
        Ok(Self {
            year: types::Year::new(year),
            month,
            day,
        })
    }

    /// Returns the day of month (1-31)
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the month (1-12)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the year
    pub const fn year(&self) -> i32 {
        self.year.get()
    }

    pub const fn day_typed(&self) -> types::Day {
        self.day
    }

    pub const fn month_typed(&self) -> types::Month {
        self.month
    }

    pub const fn year_typed(&self) -> types::Year {
        self.year
    }

    /// Whether this date falls in a leap year
    pub const fn is_leap_year(&self) -> bool {
        self.year.is_leap()
    }

    /// Number of days from 1970-01-01 to this date (negative before it).
    ///
    /// Howard Hinnant's `days_from_civil`: shift the year to start in March
    /// so the leap day is the last day of the year, then count whole 400-year
    /// eras plus the day within the era.
    ///
    /// Ref: <http://howardhinnant.github.io/date_algorithms.html>
    pub fn days_since_epoch(&self) -> i64 {
        let month = i64::from(self.month.get());
        let day = i64::from(self.day.get());
        let year = i64::from(self.year.get()) - i64::from(month <= i64::from(FEBRUARY));

        let era = year.div_euclid(400);
        let year_of_era = year.rem_euclid(400);
        let month_from_march = (month + 9) % 12;
        let day_of_year = (153 * month_from_march + 2) / 5 + day - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;

        era * DAYS_PER_ERA + day_of_era - UNIX_EPOCH_SHIFT
    }

    /// Inverse of [`Date::days_since_epoch`].
    /// Returns `None` if the resulting year does not fit in an `i32`.
    pub fn from_days_since_epoch(days: i64) -> Option<Self> {
        let shifted = days.checked_add(UNIX_EPOCH_SHIFT)?;
        let era = shifted.div_euclid(DAYS_PER_ERA);
        let day_of_era = shifted.rem_euclid(DAYS_PER_ERA);
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let month_from_march = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
        let month = if month_from_march < 10 {
            month_from_march + 3
        } else {
            month_from_march - 9
        };
        let year = era * 400 + year_of_era + i64::from(month <= i64::from(FEBRUARY));

        let year = i32::try_from(year).ok()?;
        let month = i32::try_from(month).ok()?;
        let day = i32::try_from(day).ok()?;
        Self::new(day, month, year).ok()
    }

    /// The day of the week this date falls on
    pub fn day_of_week(&self) -> Weekday {
        Weekday::from_days_since_epoch(self.days_since_epoch())
    }

    /// Signed number of days from `self` to `other`; positive if `other` is later.
    pub fn difference_in_days(&self, other: &Self) -> i64 {
        other.days_since_epoch() - self.days_since_epoch()
    }

    /// The date `days` days after this one (before it if negative).
    /// Returns `None` on year overflow.
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        Self::from_days_since_epoch(self.days_since_epoch().checked_add(days)?)
    }

    /// The following calendar day
    pub fn succ(&self) -> Option<Self> {
        self.checked_add_days(1)
    }

    /// Renders the date as `YYYY-MM-DD`, with a leading `-` for negative years
    pub fn to_iso_string(&self) -> String {
        let year = self.year.get();
        let sign = if year < 0 { "-" } else { "" };
        format!(
            "{sign}{:04}{DATE_SEPARATOR}{:02}{DATE_SEPARATOR}{:02}",
            year.unsigned_abs(),
            self.month.get(),
            self.day.get()
        )
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Accepts ISO `YYYY-MM-DD` (a leading `-` marks a negative year) or
    /// day-first `D/M/YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let has_slash = trimmed.contains(DAY_FIRST_SEPARATOR);
        if has_slash {
            let parts: Vec<&str> = trimmed.split(DAY_FIRST_SEPARATOR).map(str::trim).collect();
            return match parts.as_slice() {
                [day, month, year] => {
                    Self::new(Self::parse_i32(day)?, Self::parse_i32(month)?, Self::parse_i32(year)?)
                }
                _ => Err(DateError::InvalidFormat(trimmed.to_owned())),
            };
        }

        let (negative, body) = match trimmed.strip_prefix(DATE_SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let parts: Vec<&str> = body.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [year, month, day] => {
                let year = Self::parse_year(year, negative)?;
                Self::new(Self::parse_i32(day)?, Self::parse_i32(month)?, year)
            }
            _ => Err(DateError::InvalidFormat(trimmed.to_owned())),
        }
    }
}

impl Date {
    /// Helper to parse a numeric component with a format error on failure.
    /// Signs are rejected; negative years are handled by the caller.
    fn parse_i32(s: &str) -> Result<i32, DateError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidFormat(s.to_owned()));
        }
        s.parse::<i32>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    /// Parses an unsigned year magnitude and applies the sign stripped by the
    /// caller. The magnitude is widened first since `i32::MIN` has no positive
    /// counterpart.
    fn parse_year(s: &str, negative: bool) -> Result<i32, DateError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidFormat(s.to_owned()));
        }
        let magnitude = s
            .parse::<i64>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))?;
        let year = if negative { -magnitude } else { magnitude };
        i32::try_from(year).map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }
}

impl TryFrom<(i32, i32, i32)> for Date {
    type Error = DateError;

    /// Builds a date from a `(day, month, year)` tuple
    fn try_from(value: (i32, i32, i32)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    // Roughly years -100_000..=100_000
    const DAY_SPAN: i64 = 36_500_000;

    fn any_date() -> impl Strategy<Value = Date> {
        (-DAY_SPAN..=DAY_SPAN)
            .prop_filter_map("in range", Date::from_days_since_epoch)
    }

    proptest! {
        #[test]
        fn new_succeeds_iff_components_valid(
            day in -2i32..=33,
            month in -1i32..=14,
            year in -3000i32..=3000
        ) {
            let expected = (1..=12).contains(&month)
                && day >= 1
                && day <= i32::from(days_in_month(year, Month::new(month).unwrap()));
            prop_assert_eq!(Date::new(day, month, year).is_ok(), expected);
        }

        #[test]
        fn day_count_round_trips(days in -DAY_SPAN..=DAY_SPAN) {
            let date = Date::from_days_since_epoch(days).unwrap();
            prop_assert_eq!(date.days_since_epoch(), days);
        }

        #[test]
        fn difference_is_antisymmetric(a in any_date(), b in any_date()) {
            prop_assert_eq!(a.difference_in_days(&b), -b.difference_in_days(&a));
            prop_assert_eq!(a.difference_in_days(&a), 0);
        }

        #[test]
        fn ordering_matches_day_count(a in any_date(), b in any_date()) {
            prop_assert_eq!(a.cmp(&b), a.days_since_epoch().cmp(&b.days_since_epoch()));
            prop_assert_eq!(a == b, a.difference_in_days(&b) == 0);
        }

        #[test]
        fn next_day_advances_weekday(a in any_date()) {
            let next = a.succ().unwrap();
            prop_assert_eq!(a.difference_in_days(&next), 1);
            prop_assert_eq!(next.day_of_week(), a.day_of_week().succ());
        }

        #[test]
        fn sorting_is_idempotent(mut dates in prop::collection::vec(any_date(), 0..20)) {
            dates.sort();
            let once = dates.clone();
            dates.sort();
            prop_assert_eq!(dates, once);
        }

        #[test]
        fn iso_string_parses_back(a in any_date()) {
            prop_assert_eq!(a.to_iso_string().parse::<Date>(), Ok(a));
        }
    }
}
