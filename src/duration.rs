//! Working-day arithmetic over a resolved calendar.
//!
//! Both operations walk one calendar day at a time through epoch-day
//! ordinals, so month, year and leap-year boundaries need no special casing.
//! Only whole working days are counted; working hours are not consulted.
//!
//! `get_date` is not an exact inverse of `get_duration`: durations are
//! truncated to whole days, and `get_duration` always anchors its walk at
//! the start date even when the end date precedes it.

use crate::config::DurationSettings;
use crate::day::Day;
use crate::error::{CalendarError, CalendarResult};
use crate::resolver::{CalendarLookup, CalendarResolver};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
            TimeUnit::Weeks => "w",
            TimeUnit::Months => "mo",
            TimeUnit::Years => "y",
        }
    }

    fn minutes(self, settings: &DurationSettings) -> f64 {
        match self {
            TimeUnit::Minutes => 1.0,
            TimeUnit::Hours => 60.0,
            TimeUnit::Days => settings.minutes_per_day,
            TimeUnit::Weeks => settings.minutes_per_week,
            TimeUnit::Months => settings.minutes_per_day * settings.days_per_month,
            TimeUnit::Years => settings.minutes_per_day * settings.days_per_month * 12.0,
        }
    }
}

/// An amount of work time in a given unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    value: f64,
    units: TimeUnit,
}

impl Duration {
    pub fn new(value: f64, units: TimeUnit) -> Self {
        Self { value, units }
    }

    pub fn days(value: f64) -> Self {
        Self::new(value, TimeUnit::Days)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> TimeUnit {
        self.units
    }

    pub fn convert_units(&self, units: TimeUnit, settings: &DurationSettings) -> Self {
        if units == self.units {
            return *self;
        }
        let minutes = self.value * self.units.minutes(settings);
        Self::new(minutes / units.minutes(settings), units)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.units.suffix())
    }
}

impl FromStr for Duration {
    type Err = CalendarError;

    /// Parses values such as `3d`, `1.5w`, `2mo` or `8h`; a bare number is in days.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let units = match suffix {
            "" | "d" => TimeUnit::Days,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "w" => TimeUnit::Weeks,
            "mo" => TimeUnit::Months,
            "y" => TimeUnit::Years,
            other => {
                return Err(CalendarError::InvalidRecord(format!(
                    "unknown duration unit '{other}'"
                )));
            }
        };
        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|e| CalendarError::InvalidRecord(format!("invalid duration '{s}': {e}")))?;
        Ok(Self::new(value, units))
    }
}

fn step(date: NaiveDate, delta: i32) -> CalendarResult<NaiveDate> {
    date.num_days_from_ce()
        .checked_add(delta)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(CalendarError::DateOutOfRange(date))
}

/// Inclusive count of calendar days between two dates, in either order.
fn days_in_range(start: NaiveDate, end: NaiveDate) -> i64 {
    let diff = i64::from(end.num_days_from_ce()) - i64::from(start.num_days_from_ce());
    diff.abs() + 1
}

impl<L: CalendarLookup + ?Sized> CalendarResolver<'_, L> {
    /// Counts working dates in the inclusive range, walking forward from
    /// `start` for as many days as the range spans.
    pub fn get_duration(&self, start: NaiveDate, end: NaiveDate) -> CalendarResult<Duration> {
        let mut remaining = days_in_range(start, end);
        let mut date = start;
        let mut day = Day::of(start);
        let mut working = 0_u32;

        loop {
            if self.is_working_date_on(date, day)? {
                working += 1;
            }
            remaining -= 1;
            if remaining == 0 {
                break;
            }
            date = step(date, 1)?;
            day = day.succ();
        }
        log::trace!("{working} working days from {start} to {end}");
        Ok(Duration::days(f64::from(working)))
    }

    /// Finds the date on which the `duration`-th working day falls, counting
    /// `start` itself. Negative durations walk backwards.
    pub fn get_date(&self, start: NaiveDate, duration: &Duration) -> CalendarResult<NaiveDate> {
        let days = duration
            .convert_units(TimeUnit::Days, &self.settings)
            .value()
            .trunc();
        // `as` saturates; NaN becomes zero.
        let mut remaining = days.abs() as i64;
        if remaining == 0 {
            return Ok(start);
        }
        let forward = days > 0.0;

        let mut date = start;
        let mut day = Day::of(start);
        let mut idle = 0_u32;
        let mut horizon: Option<Option<NaiveDate>> = None;

        loop {
            if self.is_working_date_on(date, day)? {
                remaining -= 1;
                if remaining == 0 {
                    log::trace!("{duration} from {start} lands on {date}");
                    return Ok(date);
                }
                idle = 0;
            } else {
                idle += 1;
            }

            // A week without a working date: check whether any can follow.
            if idle >= 7 {
                if horizon.is_none() {
                    horizon = Some(self.working_horizon(forward)?);
                }
                if let Some(Some(limit)) = horizon {
                    let beyond = if forward { date >= limit } else { date <= limit };
                    if beyond {
                        return Err(CalendarError::NoWorkingDays(start));
                    }
                }
            }

            if forward {
                date = step(date, 1)?;
                day = day.succ();
            } else {
                date = step(date, -1)?;
                day = day.pred();
            }
        }
    }

    /// `None` when some weekday is worked, so stepping always terminates.
    /// Otherwise the last date in the stepping direction that an exception
    /// can still make a working date.
    fn working_horizon(&self, forward: bool) -> CalendarResult<Option<NaiveDate>> {
        for day in Day::ALL {
            if self.is_working_day(day)? {
                return Ok(None);
            }
        }
        let working = self
            .calendar()
            .calendar_exceptions()
            .iter()
            .filter(|exception| exception.working_value());
        let limit = if forward {
            working
                .map(|exception| exception.to_date())
                .max()
                .unwrap_or(NaiveDate::MIN)
        } else {
            working
                .map(|exception| exception.from_date())
                .min()
                .unwrap_or(NaiveDate::MAX)
        };
        Ok(Some(limit))
    }
}
