use chrono::NaiveDate;
use mpx_calendar::{
    CalendarDefinition, CalendarException, CalendarRegistry, Day, DayFlag, Duration,
    load_calendars_from_json, save_calendars_to_json,
};
use std::io::{self, Write};

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  list                               List calendars\n  standard                           Add the Standard base calendar\n  base <name>                        Add an empty base calendar\n  derived <base_name>                Add a calendar derived from <base_name>\n  day <id> <1-7> <0|1|2>             Set a day flag (0=non-working, 1=working, 2=default)\n  hours <id> default                 Seed default working hours\n  except <id> <from> <to> <0|1>      Add an exception (dates YYYY-MM-DD)\n  working <id> <YYYY-MM-DD>          Is the date a working date?\n  duration <id> <start> <end>        Working days between two dates\n  date <id> <start> <duration>       Date <duration> working days from start (e.g. 3d)\n  show <id>                          Render calendar records\n  validate                           Check base calendar references\n  save json <path>                   Persist calendars to disk\n  load json <path>                   Load calendars from disk\n  quit|exit                          Exit"
    );
}

fn print_calendars(registry: &CalendarRegistry) {
    if registry.calendars().is_empty() {
        println!("No calendars.");
        return;
    }
    for calendar in registry.calendars() {
        let flags = Day::ALL
            .iter()
            .map(|day| calendar.working_day(*day).as_raw().to_string())
            .collect::<Vec<_>>()
            .join("");
        match calendar.name() {
            Some(name) if calendar.is_base_calendar() => {
                println!("  #{:<4} base     {:<16} {}", calendar.unique_id(), name, flags)
            }
            _ => println!(
                "  #{:<4} derived  {:<16} {}",
                calendar.unique_id(),
                calendar.base_calendar_name().unwrap_or_default(),
                flags
            ),
        }
    }
}

fn parse_id(s: Option<&str>) -> Option<i32> {
    s.and_then(|s| s.trim_start_matches('#').parse().ok())
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn calendar_mut(registry: &mut CalendarRegistry, id: i32) -> Option<&mut CalendarDefinition> {
    let calendar = registry.calendar_by_unique_id_mut(id);
    if calendar.is_none() {
        println!("Calendar #{id} not found.");
    }
    calendar
}

fn main() {
    env_logger::init();

    let mut registry = CalendarRegistry::new();
    println!("Calendar Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        log::debug!("command: {input}");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => print_calendars(&registry),
            "standard" => match registry.add_default_base_calendar() {
                Ok(calendar) => println!("Added Standard calendar #{}.", calendar.unique_id()),
                Err(e) => println!("Error: {e}"),
            },
            "base" => match parts.next() {
                Some(name) => {
                    let calendar = registry.add_base_calendar(name);
                    println!("Added base calendar '{name}' #{}.", calendar.unique_id());
                }
                None => println!("Usage: base <name>"),
            },
            "derived" => match parts.next() {
                Some(base) => {
                    let calendar = registry.add_derived_calendar(base);
                    println!(
                        "Added calendar #{} derived from '{base}'.",
                        calendar.unique_id()
                    );
                }
                None => println!("Usage: derived <base_name>"),
            },
            "day" => {
                let id = parse_id(parts.next());
                let day = parts
                    .next()
                    .and_then(|s| s.parse::<u8>().ok())
                    .and_then(Day::from_number);
                let flag = parts
                    .next()
                    .and_then(|s| s.parse::<i32>().ok())
                    .and_then(DayFlag::from_raw);
                match (id, day, flag) {
                    (Some(id), Some(day), Some(flag)) => {
                        if let Some(calendar) = calendar_mut(&mut registry, id) {
                            calendar.set_working_day(day, flag);
                            println!("{day} set to {flag:?}.");
                        }
                    }
                    _ => println!("Usage: day <id> <1-7> <0|1|2>"),
                }
            }
            "hours" => match (parse_id(parts.next()), parts.next()) {
                (Some(id), Some("default")) => {
                    if let Some(calendar) = calendar_mut(&mut registry, id) {
                        match calendar.add_default_calendar_hours() {
                            Ok(()) => println!("Default hours added."),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                }
                _ => println!("Usage: hours <id> default"),
            },
            "except" => {
                let id = parse_id(parts.next());
                let from = parse_date(parts.next());
                let to = parse_date(parts.next());
                let working = match parts.next() {
                    Some("1") => Some(true),
                    Some("0") => Some(false),
                    _ => None,
                };
                match (id, from, to, working) {
                    (Some(id), Some(from), Some(to), Some(working)) => {
                        if let Some(calendar) = calendar_mut(&mut registry, id) {
                            let exception = CalendarException::new(from, to, working);
                            match calendar.add_calendar_exception(exception) {
                                Ok(_) => println!("Exception added."),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                    }
                    _ => println!("Usage: except <id> <from> <to> <0|1>"),
                }
            }
            "working" => match (parse_id(parts.next()), parse_date(parts.next())) {
                (Some(id), Some(date)) => match registry.resolver(id) {
                    Some(resolver) => match resolver.is_working_date(date) {
                        Ok(true) => println!("{date} is a working date."),
                        Ok(false) => println!("{date} is not a working date."),
                        Err(e) => println!("Error: {e}"),
                    },
                    None => println!("Calendar #{id} not found."),
                },
                _ => println!("Usage: working <id> <YYYY-MM-DD>"),
            },
            "duration" => {
                let id = parse_id(parts.next());
                let start = parse_date(parts.next());
                let end = parse_date(parts.next());
                match (id, start, end) {
                    (Some(id), Some(start), Some(end)) => match registry.resolver(id) {
                        Some(resolver) => match resolver.get_duration(start, end) {
                            Ok(duration) => println!("Duration: {duration}"),
                            Err(e) => println!("Error: {e}"),
                        },
                        None => println!("Calendar #{id} not found."),
                    },
                    _ => println!("Usage: duration <id> <start> <end>"),
                }
            }
            "date" => {
                let id = parse_id(parts.next());
                let start = parse_date(parts.next());
                let duration = parts.next().and_then(|s| s.parse::<Duration>().ok());
                match (id, start, duration) {
                    (Some(id), Some(start), Some(duration)) => match registry.resolver(id) {
                        Some(resolver) => match resolver.get_date(start, &duration) {
                            Ok(date) => println!("Date: {date}"),
                            Err(e) => println!("Error: {e}"),
                        },
                        None => println!("Calendar #{id} not found."),
                    },
                    _ => println!("Usage: date <id> <start> <duration>"),
                }
            }
            "show" => match parse_id(parts.next()) {
                Some(id) => match registry.calendar_by_unique_id(id) {
                    Some(calendar) => match calendar.to_record_string(registry.settings()) {
                        Ok(text) => print!("{}", text.replace("\r\n", "\n")),
                        Err(e) => println!("Error: {e}"),
                    },
                    None => println!("Calendar #{id} not found."),
                },
                None => println!("Usage: show <id>"),
            },
            "validate" => match registry.validate() {
                Ok(()) => println!("Calendars are consistent."),
                Err(e) => println!("Error: {e}"),
            },
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match save_calendars_to_json(&registry, path) {
                    Ok(()) => println!("Calendars saved to {path}."),
                    Err(e) => println!("Error saving calendars: {e}"),
                },
                _ => println!("Usage: save json <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_calendars_from_json(path) {
                    Ok(loaded) => {
                        registry = loaded;
                        println!("Calendars loaded from {path}.");
                        print_calendars(&registry);
                    }
                    Err(e) => println!("Error loading calendars: {e}"),
                },
                _ => println!("Usage: load json <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
