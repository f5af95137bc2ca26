//! Natural-key encoders for planner entries.
//!
//! Pure functions mapping calendar concepts to the integer/composite keys
//! the planner actor expects. All encodings are deterministic and operate on
//! local calendar dates (no UTC shifting): the date the user sees is the
//! date that is keyed.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ============================================================================
// CALENDAR DATE KEY (YYYYMMDD)
// ============================================================================

/// Integer calendar-date key in YYYYMMDD form.
///
/// Daily planner and journal entries are keyed by this value. The encoding
/// is positional decimal, so keys sort chronologically as plain integers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DateKey(u32);

impl DateKey {
    /// Wrap a raw YYYYMMDD value.
    ///
    /// The value is not validated here; `to_date` returns `None` for keys
    /// that do not name a real calendar date.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Encode a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year() as u32 * 10_000 + date.month() * 100 + date.day())
    }

    /// Decode back to a calendar date.
    ///
    /// Returns `None` if the key does not name a valid date (month 13,
    /// Feb 30, and similar).
    pub fn to_date(self) -> Option<NaiveDate> {
        let year = (self.0 / 10_000) as i32;
        let month = self.0 / 100 % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// The raw YYYYMMDD integer.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Key for the following calendar day.
    pub fn next_day(self) -> Option<Self> {
        self.to_date()?.succ_opt().map(Self::from_date)
    }

    /// Key for the preceding calendar day.
    pub fn prev_day(self) -> Option<Self> {
        self.to_date()?.pred_opt().map(Self::from_date)
    }
}

// ============================================================================
// ISO WEEK KEY
// ============================================================================

/// ISO-8601 week key: (ISO year, week number).
///
/// Thursday-anchored per ISO 8601: week 1 is the week containing the
/// year's first Thursday, so the ISO year of a date near a year boundary
/// can differ from its calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u32,
}

impl IsoWeek {
    /// The ISO week containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Number of ISO weeks (52 or 53) in the given ISO year.
    ///
    /// Dec 28 always falls in the year's last ISO week.
    pub fn weeks_in_year(year: i32) -> u32 {
        NaiveDate::from_ymd_opt(year, 12, 28)
            .map(|d| d.iso_week().week())
            .unwrap_or(52)
    }

    /// The following week, rolling into week 1 of the next ISO year past
    /// the 52/53 boundary.
    pub fn next(self) -> Self {
        if self.week >= Self::weeks_in_year(self.year) {
            Self {
                year: self.year + 1,
                week: 1,
            }
        } else {
            Self {
                year: self.year,
                week: self.week + 1,
            }
        }
    }

    /// The preceding week, rolling into the final (52nd or 53rd) week of
    /// the previous ISO year from week 1.
    pub fn prev(self) -> Self {
        if self.week <= 1 {
            let year = self.year - 1;
            Self {
                year,
                week: Self::weeks_in_year(year),
            }
        } else {
            Self {
                year: self.year,
                week: self.week - 1,
            }
        }
    }

    /// Monday of this week, or `None` for a week number the year does not
    /// have.
    pub fn monday(self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// Sunday of this week.
    pub fn sunday(self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Sun)
    }
}

// ============================================================================
// MONTH KEY
// ============================================================================

/// Month key: (calendar year, month 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// The month containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month, rolling December into January.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month, rolling January into December.
    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

/// 1-based ordinal day of the year, the daily-quote key.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy producing arbitrary valid calendar dates in the planner's
    /// plausible range.
    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1970i32..=9999, 1u32..=366).prop_map(|(year, ordinal)| {
            let max = if NaiveDate::from_ymd_opt(year, 12, 31)
                .expect("Dec 31 exists")
                .ordinal()
                == 366
            {
                366
            } else {
                365
            };
            NaiveDate::from_yo_opt(year, ordinal.min(max)).expect("ordinal in range")
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: date-key encode/decode preserves the local calendar date.
        #[test]
        fn prop_date_key_roundtrip(d in date_strategy()) {
            let key = DateKey::from_date(d);
            prop_assert_eq!(key.to_date(), Some(d));
        }

        /// Property: date-key encoding preserves chronological order.
        #[test]
        fn prop_date_key_order_matches_date_order(a in date_strategy(), b in date_strategy()) {
            let (ka, kb) = (DateKey::from_date(a), DateKey::from_date(b));
            prop_assert_eq!(a.cmp(&b), ka.cmp(&kb));
        }

        /// Property: stepping a date forward seven days advances its ISO
        /// week by exactly one navigation step, across any year boundary.
        #[test]
        fn prop_week_navigation_matches_calendar(d in date_strategy()) {
            let week = IsoWeek::from_date(d);
            if let Some(next_week_day) = d.checked_add_days(chrono::Days::new(7)) {
                prop_assert_eq!(IsoWeek::from_date(next_week_day), week.next());
            }
        }

        /// Property: next and prev are inverses from any starting week.
        #[test]
        fn prop_week_navigation_inverse(d in date_strategy()) {
            let week = IsoWeek::from_date(d);
            prop_assert_eq!(week.next().prev(), week);
            prop_assert_eq!(week.prev().next(), week);
        }

        /// Property: every week number produced by navigation stays within
        /// the ISO bounds of its year.
        #[test]
        fn prop_week_number_in_bounds(d in date_strategy()) {
            let week = IsoWeek::from_date(d);
            for w in [week, week.next(), week.prev()] {
                prop_assert!(w.week >= 1);
                prop_assert!(w.week <= IsoWeek::weeks_in_year(w.year));
            }
        }

        /// Property: month navigation is inverse and stays in 1..=12.
        #[test]
        fn prop_month_navigation_inverse(d in date_strategy()) {
            let month = MonthKey::from_date(d);
            prop_assert_eq!(month.next().prev(), month);
            prop_assert_eq!(month.prev().next(), month);
            prop_assert!((1..=12).contains(&month.next().month));
            prop_assert!((1..=12).contains(&month.prev().month));
        }
    }
}
