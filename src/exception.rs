use crate::config::FormatSettings;
use crate::error::{CalendarError, CalendarResult};
use crate::hours::{self, CalendarHours, TimeRange};
use crate::record;
use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// A dated override of a calendar's working state.
///
/// The range is inclusive on both ends. Exceptions may also carry their own
/// working intervals; those do not take part in the working-date decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    from: NaiveDate,
    to: NaiveDate,
    working: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ranges: Vec<TimeRange>,
}

impl CalendarException {
    /// Creates an exception. Bounds are stored as given; a range whose
    /// `from` follows its `to` covers no date.
    pub fn new(from: NaiveDate, to: NaiveDate, working: bool) -> Self {
        if from > to {
            log::warn!("exception range {from}..{to} is reversed and covers no date");
        }
        Self {
            from,
            to,
            working,
            ranges: Vec::new(),
        }
    }

    /// A single-day exception.
    pub fn on(date: NaiveDate, working: bool) -> Self {
        Self::new(date, date, working)
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn working_value(&self) -> bool {
        self.working
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn add_range(&mut self, range: TimeRange) -> CalendarResult<&mut Self> {
        if self.ranges.len() >= CalendarHours::MAX_RANGES {
            return Err(CalendarError::MaximumRecordsExceeded {
                record: "calendar exception range",
                limit: CalendarHours::MAX_RANGES,
            });
        }
        self.ranges.push(range);
        Ok(self)
    }

    /// Builds an exception from its data fields: from date, to date, working
    /// flag, then optional time pairs. A missing to date means a single day.
    pub fn from_record(fields: &StringRecord, settings: &FormatSettings) -> CalendarResult<Self> {
        let from = record::parse_date(record::field(fields, 0), settings)?
            .ok_or_else(|| CalendarError::InvalidRecord("exception without a from date".into()))?;
        let to = record::parse_date(record::field(fields, 1), settings)?.unwrap_or(from);
        let working = match record::parse_i32(record::field(fields, 2))? {
            None | Some(0) => false,
            Some(1) => true,
            Some(other) => {
                return Err(CalendarError::InvalidRecord(format!(
                    "invalid exception working flag {other}"
                )));
            }
        };
        let mut exception = Self::new(from, to, working);
        for range in hours::parse_ranges(fields, 3, settings)? {
            exception.add_range(range)?;
        }
        Ok(exception)
    }

    pub(crate) fn record_fields(&self, settings: &FormatSettings) -> CalendarResult<Vec<String>> {
        let mut fields = vec![
            record::format_date(self.from, settings)?,
            record::format_date(self.to, settings)?,
            u8::from(self.working).to_string(),
        ];
        fields.extend(hours::range_fields(&self.ranges, settings)?);
        Ok(fields)
    }
}
