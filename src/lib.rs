pub mod config;
pub mod day;
pub mod definition;
pub mod duration;
pub mod error;
pub mod exception;
pub mod hours;
pub mod persistence;
pub mod record;
pub mod registry;
pub mod resolver;

pub use config::{DurationSettings, FormatSettings};
pub use day::{Day, DayFlag};
pub use definition::{CalendarDefinition, CalendarKind, DEFAULT_BASE_CALENDAR_NAME, MAX_EXCEPTIONS};
pub use duration::{Duration, TimeUnit};
pub use error::{CalendarError, CalendarResult};
pub use exception::CalendarException;
pub use hours::{CalendarHours, TimeRange};
pub use persistence::{
    PersistenceError, load_calendars_from_json, load_calendars_from_records,
    save_calendars_to_json, save_calendars_to_records,
};
pub use record::{read_calendar_block, read_calendar_blocks};
pub use registry::CalendarRegistry;
pub use resolver::{CalendarLookup, CalendarResolver};
