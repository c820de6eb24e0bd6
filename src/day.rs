use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, numbered the way calendar records number them
/// (Sunday = 1 through Saturday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=7 => Some(Self::ALL[usize::from(number) - 1]),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based slot used by the per-day tables.
    pub fn index(self) -> usize {
        usize::from(self.number()) - 1
    }

    /// Next day, Saturday wrapping to Sunday.
    pub fn succ(self) -> Self {
        Self::ALL[(self.index() + 1) % 7]
    }

    /// Previous day, Sunday wrapping to Saturday.
    pub fn pred(self) -> Self {
        Self::ALL[(self.index() + 6) % 7]
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Sunday => Weekday::Sun,
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Weekday::from(*self))
    }
}

/// Working state stored for one weekday.
///
/// `Default` means "use the base calendar's answer for this weekday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayFlag {
    NonWorking,
    Working,
    Default,
}

impl DayFlag {
    /// Maps the record encoding (0 = non-working, 1 = working, 2 = default).
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(DayFlag::NonWorking),
            1 => Some(DayFlag::Working),
            2 => Some(DayFlag::Default),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            DayFlag::NonWorking => 0,
            DayFlag::Working => 1,
            DayFlag::Default => 2,
        }
    }
}

impl From<bool> for DayFlag {
    fn from(working: bool) -> Self {
        if working {
            DayFlag::Working
        } else {
            DayFlag::NonWorking
        }
    }
}
