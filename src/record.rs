//! Field-level codec for the calendar's own record lines.
//!
//! Lines are delimited with the file's configured delimiter and terminated by
//! CR LF. Tokenizing the rest of the file is left to the caller; this module
//! only writes and reads the calendar definition, hours and exception lines.

use crate::config::FormatSettings;
use crate::definition::{CalendarDefinition, CalendarKind};
use crate::error::{CalendarError, CalendarResult};
use chrono::{NaiveDate, NaiveTime};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use std::fmt::Write;

pub const BASE_CALENDAR: i32 = 20;
pub const BASE_CALENDAR_HOURS: i32 = 25;
pub const BASE_CALENDAR_EXCEPTION: i32 = 26;
pub const RESOURCE_CALENDAR: i32 = 55;
pub const RESOURCE_CALENDAR_HOURS: i32 = 56;
pub const RESOURCE_CALENDAR_EXCEPTION: i32 = 57;

/// Renders one record line, including its trailing end-of-line marker.
pub fn write_record<I, S>(fields: I, settings: &FormatSettings) -> CalendarResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(settings.delimiter_byte()?)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields).map_err(codec_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| CalendarError::InvalidRecord(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| CalendarError::InvalidRecord(err.to_string()))
}

/// Splits a block of record lines into field records.
pub fn read_records(text: &str, settings: &FormatSettings) -> CalendarResult<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(settings.delimiter_byte()?)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    reader
        .records()
        .map(|record| record.map_err(codec_error))
        .collect()
}

/// Parses a calendar definition line followed by its hours and exception lines.
pub fn read_calendar_block(
    text: &str,
    settings: &FormatSettings,
) -> CalendarResult<CalendarDefinition> {
    let records = read_records(text, settings)?;
    calendar_from_records(&records, settings)
}

/// Parses a run of calendar blocks, each starting at a definition line.
pub fn read_calendar_blocks(
    text: &str,
    settings: &FormatSettings,
) -> CalendarResult<Vec<CalendarDefinition>> {
    let records = read_records(text, settings)?;
    let mut starts = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if matches!(record_number(record)?, BASE_CALENDAR | RESOURCE_CALENDAR) {
            starts.push(index);
        }
    }
    if !records.is_empty() && starts.first() != Some(&0) {
        return Err(CalendarError::InvalidRecord(
            "calendar lines precede the first definition".into(),
        ));
    }
    starts.push(records.len());
    starts
        .windows(2)
        .map(|bounds| calendar_from_records(&records[bounds[0]..bounds[1]], settings))
        .collect()
}

fn calendar_from_records(
    records: &[StringRecord],
    settings: &FormatSettings,
) -> CalendarResult<CalendarDefinition> {
    let (head, rest) = records
        .split_first()
        .ok_or_else(|| CalendarError::InvalidRecord("empty calendar block".into()))?;

    let kind = match record_number(head)? {
        BASE_CALENDAR => CalendarKind::Base,
        RESOURCE_CALENDAR => CalendarKind::Derived,
        other => {
            return Err(CalendarError::InvalidRecord(format!(
                "record {other} is not a calendar definition"
            )));
        }
    };
    let mut calendar = CalendarDefinition::from_record(kind, &tail(head))?;

    for record in rest {
        let number = record_number(record)?;
        if number == kind.hours_record() {
            calendar.add_calendar_hours_record(&tail(record), settings)?;
        } else if number == kind.exception_record() {
            calendar.add_calendar_exception_record(&tail(record), settings)?;
        } else {
            return Err(CalendarError::InvalidRecord(format!(
                "unexpected record {number} inside {kind:?} calendar block"
            )));
        }
    }
    log::debug!(
        "read calendar {} with {} exceptions",
        calendar.label(),
        calendar.calendar_exceptions().len()
    );
    Ok(calendar)
}

fn record_number(record: &StringRecord) -> CalendarResult<i32> {
    parse_i32(record.get(0).unwrap_or_default())?
        .ok_or_else(|| CalendarError::InvalidRecord("missing record number".into()))
}

/// The record's data fields, without the leading record number.
fn tail(record: &StringRecord) -> StringRecord {
    record.iter().skip(1).collect()
}

pub(crate) fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

pub(crate) fn parse_i32(input: &str) -> CalendarResult<Option<i32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|e| CalendarError::InvalidRecord(format!("invalid integer '{input}': {e}")))
}

pub(crate) fn parse_date(input: &str, settings: &FormatSettings) -> CalendarResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), &settings.date_format)
        .map(Some)
        .map_err(|e| CalendarError::InvalidRecord(format!("invalid date '{input}': {e}")))
}

pub(crate) fn parse_time(input: &str, settings: &FormatSettings) -> CalendarResult<Option<NaiveTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(input.trim(), &settings.time_format)
        .map(Some)
        .map_err(|e| CalendarError::InvalidTimeFormat {
            value: input.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn format_date(date: NaiveDate, settings: &FormatSettings) -> CalendarResult<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(&settings.date_format)).map_err(|_| {
        CalendarError::InvalidRecord(format!("invalid date format '{}'", settings.date_format))
    })?;
    Ok(out)
}

pub(crate) fn format_time(time: NaiveTime, settings: &FormatSettings) -> CalendarResult<String> {
    let mut out = String::new();
    write!(out, "{}", time.format(&settings.time_format)).map_err(|_| {
        CalendarError::InvalidTimeFormat {
            value: settings.time_format.clone(),
            reason: "unsupported format specifier".into(),
        }
    })?;
    Ok(out)
}

fn codec_error(err: csv::Error) -> CalendarError {
    CalendarError::InvalidRecord(err.to_string())
}
