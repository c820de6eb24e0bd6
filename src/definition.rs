use crate::config::FormatSettings;
use crate::day::{Day, DayFlag};
use crate::error::{CalendarError, CalendarResult};
use crate::exception::CalendarException;
use crate::hours::{CalendarHours, TimeRange};
use crate::record;
use crate::resolver::{self, CalendarLookup, CalendarResolver};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Base calendar consulted when a calendar names none.
pub const DEFAULT_BASE_CALENDAR_NAME: &str = "Standard";

/// Exceptions a single calendar may hold.
pub const MAX_EXCEPTIONS: usize = 250;

/// Whether a calendar stands alone or inherits unset days from a base calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarKind {
    Base,
    Derived,
}

impl CalendarKind {
    pub fn definition_record(self) -> i32 {
        match self {
            CalendarKind::Base => record::BASE_CALENDAR,
            CalendarKind::Derived => record::RESOURCE_CALENDAR,
        }
    }

    pub fn hours_record(self) -> i32 {
        match self {
            CalendarKind::Base => record::BASE_CALENDAR_HOURS,
            CalendarKind::Derived => record::RESOURCE_CALENDAR_HOURS,
        }
    }

    pub fn exception_record(self) -> i32 {
        match self {
            CalendarKind::Base => record::BASE_CALENDAR_EXCEPTION,
            CalendarKind::Derived => record::RESOURCE_CALENDAR_EXCEPTION,
        }
    }

    /// Flag stored for a day whose value was left out.
    ///
    /// A base calendar must answer on its own, so it assumes a working day;
    /// a derived calendar defers to its base.
    pub fn unset_day_flag(self) -> DayFlag {
        match self {
            CalendarKind::Base => DayFlag::Working,
            CalendarKind::Derived => DayFlag::Default,
        }
    }
}

/// A calendar definition record: day flags, working hours and exceptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDefinition {
    kind: CalendarKind,
    #[serde(default)]
    unique_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_calendar_name: Option<String>,
    days: [DayFlag; 7],
    #[serde(default)]
    hours: [Option<CalendarHours>; 7],
    #[serde(default)]
    exceptions: Vec<CalendarException>,
}

impl CalendarDefinition {
    /// An empty calendar with every day left unset.
    pub fn new(kind: CalendarKind) -> Self {
        Self {
            kind,
            unique_id: 0,
            name: None,
            base_calendar_name: None,
            days: [kind.unset_day_flag(); 7],
            hours: Default::default(),
            exceptions: Vec::new(),
        }
    }

    pub fn base(name: impl Into<String>) -> Self {
        let mut calendar = Self::new(CalendarKind::Base);
        calendar.name = Some(name.into());
        calendar
    }

    pub fn derived(base_calendar_name: impl Into<String>) -> Self {
        let mut calendar = Self::new(CalendarKind::Derived);
        calendar.base_calendar_name = Some(base_calendar_name.into());
        calendar
    }

    /// The conventional "Standard" base calendar: Monday to Friday working,
    /// weekends off, default working hours.
    pub fn standard() -> CalendarResult<Self> {
        let mut calendar = Self::base(DEFAULT_BASE_CALENDAR_NAME);
        for day in Day::ALL {
            calendar.set_working(day, !matches!(day, Day::Saturday | Day::Sunday));
        }
        calendar.add_default_calendar_hours()?;
        Ok(calendar)
    }

    /// Builds a calendar from the data fields of a definition record: the
    /// name (or base name) followed by seven day flags, Sunday first.
    pub fn from_record(kind: CalendarKind, fields: &StringRecord) -> CalendarResult<Self> {
        let mut calendar = Self::new(kind);
        let name = record::field(fields, 0).to_string();
        match kind {
            CalendarKind::Base => calendar.name = Some(name),
            CalendarKind::Derived => calendar.base_calendar_name = Some(name),
        }
        for day in Day::ALL {
            let flag = match record::parse_i32(record::field(fields, usize::from(day.number())))? {
                Some(raw) => Some(DayFlag::from_raw(raw).ok_or_else(|| {
                    CalendarError::InvalidRecord(format!("invalid day flag {raw} for {day}"))
                })?),
                None => None,
            };
            calendar.set_working_day_opt(day, flag);
        }
        Ok(calendar)
    }

    pub fn kind(&self) -> CalendarKind {
        self.kind
    }

    pub fn is_base_calendar(&self) -> bool {
        self.kind == CalendarKind::Base
    }

    pub fn unique_id(&self) -> i32 {
        self.unique_id
    }

    pub fn set_unique_id(&mut self, unique_id: i32) {
        self.unique_id = unique_id;
    }

    /// Calendar name; only populated on base calendars.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Name of the calendar this one derives from.
    pub fn base_calendar_name(&self) -> Option<&str> {
        self.base_calendar_name.as_deref()
    }

    pub fn set_base_calendar_name(&mut self, name: impl Into<String>) {
        self.base_calendar_name = Some(name.into());
    }

    /// Name used to find the base calendar, falling back to "Standard".
    pub(crate) fn base_lookup_name(&self) -> &str {
        match self.base_calendar_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_BASE_CALENDAR_NAME,
        }
    }

    /// Label for log lines and cycle reports.
    pub(crate) fn label(&self) -> String {
        match (self.kind, self.name()) {
            (CalendarKind::Base, Some(name)) => name.to_string(),
            _ => format!("#{} (derived from {})", self.unique_id, self.base_lookup_name()),
        }
    }

    pub fn set_working_day(&mut self, day: Day, flag: DayFlag) {
        self.days[day.index()] = flag;
    }

    pub fn set_working(&mut self, day: Day, working: bool) {
        self.set_working_day(day, DayFlag::from(working));
    }

    /// Stores `flag`, or the calendar kind's substitute when it is absent.
    pub fn set_working_day_opt(&mut self, day: Day, flag: Option<DayFlag>) {
        let flag = flag.unwrap_or_else(|| self.kind.unset_day_flag());
        self.set_working_day(day, flag);
    }

    /// The stored flag, without consulting any base calendar.
    pub fn working_day(&self, day: Day) -> DayFlag {
        self.days[day.index()]
    }

    pub fn has_default_days(&self) -> bool {
        self.days.contains(&DayFlag::Default)
    }

    /// Resolves `day` to working or not, following `Default` flags through
    /// the chain of base calendars.
    pub fn is_working_day<L>(&self, day: Day, lookup: &L) -> CalendarResult<bool>
    where
        L: CalendarLookup + ?Sized,
    {
        resolver::resolve_working_day(self, day, lookup)
    }

    /// Whether `date` is worked, taking exceptions into account.
    pub fn is_working_date<L>(&self, date: NaiveDate, lookup: &L) -> CalendarResult<bool>
    where
        L: CalendarLookup + ?Sized,
    {
        self.resolver(lookup).is_working_date(date)
    }

    pub fn resolver<'a, L>(&'a self, lookup: &'a L) -> CalendarResolver<'a, L>
    where
        L: CalendarLookup + ?Sized,
    {
        CalendarResolver::new(self, lookup)
    }

    /// The calendar this one inherits from.
    pub fn base_calendar<'a, L>(&self, lookup: &'a L) -> CalendarResult<&'a CalendarDefinition>
    where
        L: CalendarLookup + ?Sized,
    {
        let name = self.base_lookup_name();
        lookup
            .base_calendar(name)
            .ok_or_else(|| CalendarError::BaseCalendarNotFound(name.to_string()))
    }

    /// Adds an empty hours entry for day number `day` (1 = Sunday).
    ///
    /// Each weekday has one slot; adding a second entry for the same day
    /// replaces the first.
    pub fn add_calendar_hours(&mut self, day: u8) -> CalendarResult<&mut CalendarHours> {
        let day = Day::from_number(day).ok_or(CalendarError::MaximumRecordsExceeded {
            record: "calendar hours",
            limit: 7,
        })?;
        Ok(self.insert_hours(CalendarHours::new(day)))
    }

    pub fn add_calendar_hours_record(
        &mut self,
        fields: &StringRecord,
        settings: &FormatSettings,
    ) -> CalendarResult<&mut CalendarHours> {
        let hours = CalendarHours::from_record(fields, settings)?;
        Ok(self.insert_hours(hours))
    }

    fn insert_hours(&mut self, hours: CalendarHours) -> &mut CalendarHours {
        let slot = &mut self.hours[hours.day().index()];
        if slot.is_some() {
            log::warn!("replacing calendar hours for {}", hours.day());
        }
        slot.insert(hours)
    }

    pub fn calendar_hours(&self, day: Day) -> Option<&CalendarHours> {
        self.hours[day.index()].as_ref()
    }

    pub fn calendar_hours_mut(&mut self, day: Day) -> Option<&mut CalendarHours> {
        self.hours[day.index()].as_mut()
    }

    /// Appends an exception. Earlier exceptions take precedence when ranges overlap.
    pub fn add_calendar_exception(
        &mut self,
        exception: CalendarException,
    ) -> CalendarResult<&mut CalendarException> {
        if self.exceptions.len() >= MAX_EXCEPTIONS {
            log::warn!(
                "calendar {} already holds {MAX_EXCEPTIONS} exceptions",
                self.label()
            );
            return Err(CalendarError::MaximumRecordsExceeded {
                record: "calendar exception",
                limit: MAX_EXCEPTIONS,
            });
        }
        self.exceptions.push(exception);
        let index = self.exceptions.len() - 1;
        Ok(&mut self.exceptions[index])
    }

    pub fn add_calendar_exception_record(
        &mut self,
        fields: &StringRecord,
        settings: &FormatSettings,
    ) -> CalendarResult<&mut CalendarException> {
        let exception = CalendarException::from_record(fields, settings)?;
        self.add_calendar_exception(exception)
    }

    pub fn calendar_exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }

    /// Working value of the first exception covering `date`, if any.
    pub(crate) fn exception_override(&self, date: NaiveDate) -> Option<bool> {
        self.exceptions
            .iter()
            .find(|exception| exception.contains(date))
            .map(CalendarException::working_value)
    }

    /// Seeds 08:00-12:00 and 13:00-17:00 on Monday to Friday and empty
    /// entries for the weekend. Day flags are left untouched.
    pub fn add_default_calendar_hours(&mut self) -> CalendarResult<()> {
        let morning = TimeRange::parse("08:00", "12:00")?;
        let afternoon = TimeRange::parse("13:00", "17:00")?;
        for day in Day::ALL {
            let hours = self.insert_hours(CalendarHours::new(day));
            if !matches!(day, Day::Saturday | Day::Sunday) {
                hours.add_range(morning)?.add_range(afternoon)?;
            }
        }
        Ok(())
    }

    /// Renders the definition line followed by its hours and exception lines.
    pub fn to_record_string(&self, settings: &FormatSettings) -> CalendarResult<String> {
        let reference = match self.kind {
            CalendarKind::Base => self.name(),
            CalendarKind::Derived => self.base_calendar_name(),
        };
        let mut fields = vec![
            self.kind.definition_record().to_string(),
            reference.unwrap_or_default().to_string(),
        ];
        fields.extend(self.days.iter().map(|flag| flag.as_raw().to_string()));
        let mut out = record::write_record(&fields, settings)?;

        for hours in self.hours.iter().flatten() {
            let mut fields = vec![self.kind.hours_record().to_string()];
            fields.extend(hours.record_fields(settings)?);
            out.push_str(&record::write_record(&fields, settings)?);
        }

        for exception in &self.exceptions {
            let mut fields = vec![self.kind.exception_record().to_string()];
            fields.extend(exception.record_fields(settings)?);
            out.push_str(&record::write_record(&fields, settings)?);
        }
        Ok(out)
    }
}
