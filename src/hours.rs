use crate::config::FormatSettings;
use crate::day::Day;
use crate::error::{CalendarError, CalendarResult};
use crate::record;
use chrono::{NaiveTime, TimeDelta};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// A single working interval within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Builds a range from `HH:MM` literals.
    pub fn parse(start: &str, end: &str) -> CalendarResult<Self> {
        Ok(Self::new(parse_hm(start)?, parse_hm(end)?))
    }

    /// Length of the interval. An end at or before the start runs past midnight.
    pub fn duration(&self) -> TimeDelta {
        let span = self.end - self.start;
        if span <= TimeDelta::zero() {
            span + TimeDelta::days(1)
        } else {
            span
        }
    }
}

fn parse_hm(value: &str) -> CalendarResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| CalendarError::InvalidTimeFormat {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Working intervals configured for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHours {
    day: Day,
    ranges: Vec<TimeRange>,
}

impl CalendarHours {
    pub const MAX_RANGES: usize = 2;

    pub fn new(day: Day) -> Self {
        Self {
            day,
            ranges: Vec::new(),
        }
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn add_range(&mut self, range: TimeRange) -> CalendarResult<&mut Self> {
        if self.ranges.len() >= Self::MAX_RANGES {
            return Err(CalendarError::MaximumRecordsExceeded {
                record: "calendar hours range",
                limit: Self::MAX_RANGES,
            });
        }
        self.ranges.push(range);
        Ok(self)
    }

    /// Total working time across the day's intervals.
    pub fn working_time(&self) -> TimeDelta {
        self.ranges
            .iter()
            .fold(TimeDelta::zero(), |acc, range| acc + range.duration())
    }

    /// Builds an hours entry from its data fields: day number, then time pairs.
    pub fn from_record(fields: &StringRecord, settings: &FormatSettings) -> CalendarResult<Self> {
        let number = record::parse_i32(record::field(fields, 0))?
            .ok_or_else(|| CalendarError::InvalidRecord("calendar hours without a day".into()))?;
        let day = u8::try_from(number)
            .ok()
            .and_then(Day::from_number)
            .ok_or(CalendarError::MaximumRecordsExceeded {
                record: "calendar hours",
                limit: 7,
            })?;
        let mut hours = Self::new(day);
        for range in parse_ranges(fields, 1, settings)? {
            hours.add_range(range)?;
        }
        Ok(hours)
    }

    pub(crate) fn record_fields(&self, settings: &FormatSettings) -> CalendarResult<Vec<String>> {
        let mut fields = vec![self.day.number().to_string()];
        fields.extend(range_fields(&self.ranges, settings)?);
        Ok(fields)
    }
}

/// Reads `from, to` pairs starting at `first`, skipping fully blank pairs.
pub(crate) fn parse_ranges(
    fields: &StringRecord,
    first: usize,
    settings: &FormatSettings,
) -> CalendarResult<Vec<TimeRange>> {
    let mut ranges = Vec::new();
    let mut index = first;
    while index < fields.len() {
        let start = record::parse_time(record::field(fields, index), settings)?;
        let end = record::parse_time(record::field(fields, index + 1), settings)?;
        match (start, end) {
            (Some(start), Some(end)) => ranges.push(TimeRange::new(start, end)),
            (None, None) => {}
            _ => {
                return Err(CalendarError::InvalidRecord(format!(
                    "incomplete time range at field {index}"
                )));
            }
        }
        index += 2;
    }
    Ok(ranges)
}

pub(crate) fn range_fields(
    ranges: &[TimeRange],
    settings: &FormatSettings,
) -> CalendarResult<Vec<String>> {
    let mut fields = Vec::with_capacity(ranges.len() * 2);
    for range in ranges {
        fields.push(record::format_time(range.start, settings)?);
        fields.push(record::format_time(range.end, settings)?);
    }
    Ok(fields)
}
