use super::PersistenceResult;
use crate::config::FormatSettings;
use crate::definition::CalendarDefinition;
use crate::record;
use crate::registry::CalendarRegistry;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct CalendarSnapshot {
    #[serde(default)]
    settings: FormatSettings,
    calendars: Vec<CalendarDefinition>,
}

impl CalendarSnapshot {
    fn from_registry(registry: &CalendarRegistry) -> Self {
        Self {
            settings: registry.settings().clone(),
            calendars: registry.calendars().to_vec(),
        }
    }

    /// Rebuilds the registry and checks its base references.
    fn into_registry(self) -> PersistenceResult<CalendarRegistry> {
        let mut settings = self.settings;
        // Stored ids are kept as written.
        let auto_ids = settings.auto_calendar_unique_id;
        settings.auto_calendar_unique_id = false;
        let mut registry = CalendarRegistry::with_settings(settings);
        for calendar in self.calendars {
            registry.add_calendar(calendar);
        }
        registry.set_auto_calendar_unique_id(auto_ids);
        registry.validate()?;
        Ok(registry)
    }
}

pub fn save_calendars_to_json<P: AsRef<Path>>(
    registry: &CalendarRegistry,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = CalendarSnapshot::from_registry(registry);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_calendars_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<CalendarRegistry> {
    let file = File::open(path)?;
    let snapshot: CalendarSnapshot = serde_json::from_reader(file)?;
    snapshot.into_registry()
}

/// Writes every calendar as record lines, in registration order.
pub fn save_calendars_to_records<P: AsRef<Path>>(
    registry: &CalendarRegistry,
    path: P,
) -> PersistenceResult<()> {
    let mut out = String::new();
    for calendar in registry.calendars() {
        out.push_str(&calendar.to_record_string(registry.settings())?);
    }
    fs::write(path, out)?;
    Ok(())
}

/// Reads calendar record lines into a new registry using `settings`.
pub fn load_calendars_from_records<P: AsRef<Path>>(
    path: P,
    settings: FormatSettings,
) -> PersistenceResult<CalendarRegistry> {
    let text = fs::read_to_string(path)?;
    let calendars = record::read_calendar_blocks(&text, &settings)?;
    let mut registry = CalendarRegistry::with_settings(settings);
    for calendar in calendars {
        registry.add_calendar(calendar);
    }
    registry.validate()?;
    Ok(registry)
}
