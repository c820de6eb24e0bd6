//! Working-day resolution across base-calendar chains.
//!
//! A `Default` day flag defers to the base calendar for the same weekday,
//! which may itself defer further. The walk records every calendar name it
//! visits and stops with [`CalendarError::CalendarCycle`] as soon as a name
//! repeats, so misconfigured chains terminate.
//!
//! Date resolution consults exceptions first, in insertion order. The first
//! exception whose range covers the date decides the answer, even when a
//! later, narrower exception also covers it.

use crate::config::DurationSettings;
use crate::day::{Day, DayFlag};
use crate::definition::{CalendarDefinition, CalendarKind};
use crate::error::{CalendarError, CalendarResult};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Name-based access to base calendars, supplied by whoever owns them.
pub trait CalendarLookup {
    fn base_calendar(&self, name: &str) -> Option<&CalendarDefinition>;
}

impl CalendarLookup for HashMap<String, CalendarDefinition> {
    fn base_calendar(&self, name: &str) -> Option<&CalendarDefinition> {
        self.get(name).filter(|calendar| calendar.is_base_calendar())
    }
}

impl CalendarLookup for [CalendarDefinition] {
    fn base_calendar(&self, name: &str) -> Option<&CalendarDefinition> {
        self.iter()
            .find(|calendar| calendar.is_base_calendar() && calendar.name() == Some(name))
    }
}

pub(crate) fn resolve_working_day<'a, L>(
    calendar: &'a CalendarDefinition,
    day: Day,
    lookup: &'a L,
) -> CalendarResult<bool>
where
    L: CalendarLookup + ?Sized,
{
    let mut current = calendar;
    let mut chain: Vec<String> = Vec::new();
    if let (CalendarKind::Base, Some(name)) = (calendar.kind(), calendar.name()) {
        chain.push(name.to_string());
    }

    loop {
        match current.working_day(day) {
            DayFlag::Working => return Ok(true),
            DayFlag::NonWorking => return Ok(false),
            DayFlag::Default => {
                let name = current.base_lookup_name();
                let seen = chain.iter().any(|visited| visited == name);
                chain.push(name.to_string());
                if seen {
                    log::warn!("base calendar cycle resolving {day}: {}", chain.join(" -> "));
                    return Err(CalendarError::CalendarCycle { chain });
                }
                log::trace!("{} defers {day} to base calendar '{name}'", current.label());
                current = lookup.base_calendar(name).ok_or_else(|| {
                    log::warn!("base calendar '{name}' not found for {}", current.label());
                    CalendarError::BaseCalendarNotFound(name.to_string())
                })?;
            }
        }
    }
}

/// A calendar paired with the lookup used to reach its base calendars.
pub struct CalendarResolver<'a, L: CalendarLookup + ?Sized> {
    calendar: &'a CalendarDefinition,
    lookup: &'a L,
    pub(crate) settings: DurationSettings,
}

impl<'a, L: CalendarLookup + ?Sized> CalendarResolver<'a, L> {
    pub fn new(calendar: &'a CalendarDefinition, lookup: &'a L) -> Self {
        Self {
            calendar,
            lookup,
            settings: DurationSettings::default(),
        }
    }

    pub fn with_duration_settings(mut self, settings: DurationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn calendar(&self) -> &'a CalendarDefinition {
        self.calendar
    }

    pub fn is_working_day(&self, day: Day) -> CalendarResult<bool> {
        resolve_working_day(self.calendar, day, self.lookup)
    }

    pub fn is_working_date(&self, date: NaiveDate) -> CalendarResult<bool> {
        self.is_working_date_on(date, Day::of(date))
    }

    /// Same as [`is_working_date`](Self::is_working_date) with the weekday
    /// already known to the caller.
    pub(crate) fn is_working_date_on(&self, date: NaiveDate, day: Day) -> CalendarResult<bool> {
        match self.calendar.exception_override(date) {
            Some(working) => Ok(working),
            None => self.is_working_day(day),
        }
    }
}
