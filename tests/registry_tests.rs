use mpx_calendar::{
    CalendarDefinition, CalendarError, CalendarLookup, CalendarRegistry, Day, DayFlag,
    FormatSettings,
};

#[test]
fn unique_ids_are_assigned_in_order() {
    let mut registry = CalendarRegistry::new();
    let standard = registry.add_default_base_calendar().unwrap().unique_id();
    let night = registry.add_base_calendar("Night").unique_id();
    let derived = registry.add_derived_calendar("Night").unique_id();
    assert_eq!((standard, night, derived), (1, 2, 3));
    assert_eq!(
        registry.calendar_by_unique_id(2).unwrap().name(),
        Some("Night")
    );
}

#[test]
fn manual_unique_ids_are_kept() {
    let settings = FormatSettings {
        auto_calendar_unique_id: false,
        ..FormatSettings::default()
    };
    let mut registry = CalendarRegistry::with_settings(settings);
    let mut calendar = CalendarDefinition::base("Standard");
    calendar.set_unique_id(42);
    registry.add_calendar(calendar);
    assert!(registry.calendar_by_unique_id(42).is_some());
    assert!(registry.calendar_by_unique_id(1).is_none());
}

#[test]
fn lookup_only_returns_base_calendars() {
    let mut registry = CalendarRegistry::new();
    registry.add_base_calendar("Standard");
    registry.add_derived_calendar("Standard");
    assert!(registry.base_calendar("Standard").unwrap().is_base_calendar());
    assert!(registry.base_calendar("Missing").is_none());
}

#[test]
fn duplicate_base_names_resolve_to_the_first() {
    let mut registry = CalendarRegistry::new();
    registry
        .add_base_calendar("Standard")
        .set_working(Day::Sunday, false);
    registry.add_base_calendar("Standard");
    let found = registry.base_calendar("Standard").unwrap();
    assert_eq!(found.unique_id(), 1);
    assert_eq!(found.working_day(Day::Sunday), DayFlag::NonWorking);
}

#[test]
fn validate_accepts_a_consistent_registry() {
    let mut registry = CalendarRegistry::new();
    registry.add_default_base_calendar().unwrap();
    registry.add_derived_calendar("Standard");
    // Derived calendars with only explicit flags never consult a base.
    let orphan = registry.add_derived_calendar("Gone");
    for day in Day::ALL {
        orphan.set_working(day, true);
    }
    assert_eq!(registry.validate(), Ok(()));
}

#[test]
fn validate_reports_missing_base_calendar() {
    let mut registry = CalendarRegistry::new();
    registry.add_derived_calendar("Night");
    assert_eq!(
        registry.validate(),
        Err(CalendarError::BaseCalendarNotFound("Night".into()))
    );
}

#[test]
fn validate_reports_cycles() {
    let mut registry = CalendarRegistry::new();
    let a = registry.add_base_calendar("A");
    a.set_base_calendar_name("B");
    a.set_working_day(Day::Monday, DayFlag::Default);
    let b = registry.add_base_calendar("B");
    b.set_base_calendar_name("A");
    b.set_working_day(Day::Tuesday, DayFlag::Default);

    match registry.validate() {
        Err(CalendarError::CalendarCycle { chain }) => {
            assert_eq!(chain.len(), 3);
            assert_eq!(chain.first(), chain.last());
            assert!(chain.contains(&"A".to_string()));
            assert!(chain.contains(&"B".to_string()));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn resolver_by_unique_id() {
    let mut registry = CalendarRegistry::new();
    registry.add_default_base_calendar().unwrap();
    let resolver = registry.resolver(1).unwrap();
    assert!(resolver.is_working_day(Day::Monday).unwrap());
    assert!(registry.resolver(99).is_none());
}
