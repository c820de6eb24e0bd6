use crate::error::{CalendarError, CalendarResult};
use crate::persistence::PersistenceResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// File-level settings that control how calendar records are written and read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Field delimiter shared by every record in the file.
    pub delimiter: char,
    /// `chrono` format string for exception dates.
    pub date_format: String,
    /// `chrono` format string for working-hour boundaries.
    pub time_format: String,
    /// Whether the registry hands out calendar unique ids on insertion.
    pub auto_calendar_unique_id: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%H:%M".to_string(),
            auto_calendar_unique_id: true,
        }
    }
}

impl FormatSettings {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    /// Loads settings from a JSON file; absent keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        let settings: FormatSettings = serde_json::from_reader(file)?;
        log::debug!("loaded format settings: {settings:?}");
        Ok(settings)
    }

    /// The delimiter as the single byte the record codec works with.
    pub(crate) fn delimiter_byte(&self) -> CalendarResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(CalendarError::InvalidRecord(format!(
                "delimiter '{}' is not a single-byte character",
                self.delimiter
            )))
        }
    }
}

/// Conversion factors used when a duration is expressed in units other than days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationSettings {
    pub minutes_per_day: f64,
    pub minutes_per_week: f64,
    pub days_per_month: f64,
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            minutes_per_day: 480.0,
            minutes_per_week: 2400.0,
            days_per_month: 20.0,
        }
    }
}
