use chrono::NaiveDate;
use mpx_calendar::{
    CalendarDefinition, CalendarError, CalendarException, CalendarKind, Day, DayFlag,
    FormatSettings, TimeRange, read_calendar_block, read_calendar_blocks,
};
use std::collections::HashMap;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const WEEKDAY_HOURS: &str = "08:00,12:00,13:00,17:00";

#[test]
fn standard_calendar_renders_definition_then_hours() {
    let cal = CalendarDefinition::standard().unwrap();
    let text = cal.to_record_string(&FormatSettings::default()).unwrap();
    let mut expected = String::from("20,Standard,0,1,1,1,1,1,0\r\n25,1\r\n");
    for day in 2..=6 {
        expected.push_str(&format!("25,{day},{WEEKDAY_HOURS}\r\n"));
    }
    expected.push_str("25,7\r\n");
    assert_eq!(text, expected);
}

#[test]
fn derived_calendar_uses_resource_record_numbers() {
    let mut cal = CalendarDefinition::derived("Standard");
    cal.set_working(Day::Saturday, true);
    cal.add_calendar_hours(7)
        .unwrap()
        .add_range(TimeRange::parse("09:00", "13:00").unwrap())
        .unwrap();
    cal.add_calendar_exception(CalendarException::new(d(2025, 12, 24), d(2025, 12, 26), false))
        .unwrap();

    let text = cal.to_record_string(&FormatSettings::default()).unwrap();
    assert_eq!(
        text,
        "55,Standard,2,2,2,2,2,2,1\r\n56,7,09:00,13:00\r\n57,24/12/2025,26/12/2025,0\r\n"
    );
}

#[test]
fn exceptions_render_in_insertion_order_with_hours() {
    let mut cal = CalendarDefinition::base("Site");
    let mut overtime = CalendarException::on(d(2025, 3, 8), true);
    overtime
        .add_range(TimeRange::parse("10:00", "14:00").unwrap())
        .unwrap();
    cal.add_calendar_exception(CalendarException::on(d(2025, 3, 10), false))
        .unwrap();
    cal.add_calendar_exception(overtime).unwrap();

    let text = cal.to_record_string(&FormatSettings::default()).unwrap();
    let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines,
        vec![
            "20,Site,1,1,1,1,1,1,1",
            "26,10/03/2025,10/03/2025,0",
            "26,08/03/2025,08/03/2025,1,10:00,14:00",
        ]
    );
}

#[test]
fn delimiter_comes_from_the_file_settings() {
    let cal = CalendarDefinition::base("Night, Late");
    let comma = cal.to_record_string(&FormatSettings::default()).unwrap();
    assert_eq!(comma, "20,\"Night, Late\",1,1,1,1,1,1,1\r\n");

    let semicolon = cal
        .to_record_string(&FormatSettings::with_delimiter(';'))
        .unwrap();
    assert_eq!(semicolon, "20;Night, Late;1;1;1;1;1;1;1\r\n");
}

#[test]
fn multibyte_delimiter_is_rejected() {
    let cal = CalendarDefinition::base("Standard");
    let err = cal
        .to_record_string(&FormatSettings::with_delimiter('§'))
        .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidRecord(_)));
}

#[test]
fn block_reads_back_what_was_written() {
    let settings = FormatSettings::default();
    let mut cal = CalendarDefinition::standard().unwrap();
    cal.add_calendar_exception(CalendarException::on(d(2025, 12, 25), false))
        .unwrap();
    let text = cal.to_record_string(&settings).unwrap();

    let parsed = read_calendar_block(&text, &settings).unwrap();
    assert_eq!(parsed, cal);
}

#[test]
fn blank_day_fields_take_the_kind_substitute() {
    let settings = FormatSettings::default();
    let base = read_calendar_block("20,Standard,0,,1,1,1,1,0\r\n", &settings).unwrap();
    assert_eq!(base.kind(), CalendarKind::Base);
    assert_eq!(base.working_day(Day::Monday), DayFlag::Working);

    let derived = read_calendar_block("55,Standard,,,,,,,1\r\n", &settings).unwrap();
    assert_eq!(derived.kind(), CalendarKind::Derived);
    assert_eq!(derived.base_calendar_name(), Some("Standard"));
    assert_eq!(derived.working_day(Day::Sunday), DayFlag::Default);
    assert_eq!(derived.working_day(Day::Saturday), DayFlag::Working);
}

#[test]
fn reversed_exception_record_is_kept_as_written() {
    let settings = FormatSettings::default();
    let text = "20,Standard,0,1,1,1,1,1,0\r\n26,10/03/2025,03/03/2025,0\r\n";
    let cal = read_calendar_block(text, &settings).unwrap();

    let exception = &cal.calendar_exceptions()[0];
    assert!(!exception.contains(d(2025, 3, 5)));
    let lookup: HashMap<String, CalendarDefinition> = HashMap::new();
    assert!(cal.is_working_date(d(2025, 3, 5), &lookup).unwrap());

    assert_eq!(cal.to_record_string(&settings).unwrap(), text);
}

#[test]
fn exception_without_to_date_covers_one_day() {
    let settings = FormatSettings::default();
    let cal = read_calendar_block("20,Standard,0,1,1,1,1,1,0\n26,01/05/2025,,0\n", &settings)
        .unwrap();
    let exception = &cal.calendar_exceptions()[0];
    assert_eq!(exception.from_date(), d(2025, 5, 1));
    assert_eq!(exception.to_date(), d(2025, 5, 1));
}

#[test]
fn hours_record_for_unknown_day_is_rejected() {
    let settings = FormatSettings::default();
    let err = read_calendar_block("20,Standard,0,1,1,1,1,1,0\r\n25,8\r\n", &settings).unwrap_err();
    assert!(matches!(err, CalendarError::MaximumRecordsExceeded { .. }));
}

#[test]
fn malformed_blocks_are_reported() {
    let settings = FormatSettings::default();
    for text in [
        "",
        "30,Task\r\n",
        "20,Standard,0,1,5,1,1,1,0\r\n",
        "20,Standard,0,1,1,1,1,1,0\r\n56,2\r\n",
        "20,Standard,0,1,1,1,1,1,0\r\n25,2,08:00\r\n",
        "20,Standard,0,1,1,1,1,1,0\r\n26,31/02/2025,,0\r\n",
    ] {
        assert!(
            read_calendar_block(text, &settings).is_err(),
            "expected an error for {text:?}"
        );
    }
}

#[test]
fn bad_time_in_hours_record_is_a_time_format_error() {
    let settings = FormatSettings::default();
    let err = read_calendar_block("20,Standard,0,1,1,1,1,1,0\r\n25,2,8am,12:00\r\n", &settings)
        .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidTimeFormat { .. }));
}

#[test]
fn several_blocks_split_at_definition_lines() {
    let settings = FormatSettings::default();
    let text = "20,Standard,0,1,1,1,1,1,0\r\n25,2,08:00,12:00\r\n55,Standard,2,2,2,2,2,2,1\r\n57,01/01/2025,01/01/2025,0\r\n";
    let calendars = read_calendar_blocks(text, &settings).unwrap();
    assert_eq!(calendars.len(), 2);
    assert!(calendars[0].calendar_hours(Day::Monday).is_some());
    assert_eq!(calendars[1].calendar_exceptions().len(), 1);

    assert!(read_calendar_blocks("25,2\r\n", &settings).is_err());
    assert!(read_calendar_blocks("", &settings).unwrap().is_empty());
}
