//! iCalendar (RFC 5545) generation.
//!
//! Output is a single VCALENDAR with one fixed-offset VTIMEZONE. Event times
//! are written as local times qualified with that zone, since the period table
//! is already in campus time.

use icalendar::{Calendar, Component, EventLike, Property};
use indoc::formatdoc;

use crate::event_mapper::{CalendarEvent, CompactTimestamp};

pub const PRODUCT_ID: &str = "-//tmu-schedule-export//EN";
pub const TIME_ZONE_ID: &str = "Asia/Ho_Chi_Minh";
pub const CALENDAR_MIME: &str = "text/calendar; charset=utf-8";
pub const EXPORT_FILE_NAME: &str = "tmu-schedule.ics";

fn time_zone_block() -> String {
    formatdoc! {"
        BEGIN:VTIMEZONE
        TZID:{time_zone_id}
        BEGIN:STANDARD
        DTSTART:19700101T000000
        TZOFFSETFROM:+0700
        TZOFFSETTO:+0700
        TZNAME:ICT
        END:STANDARD
        END:VTIMEZONE
    ",
        time_zone_id = TIME_ZONE_ID,
    }
}

/// Renders `events` as one calendar document with CRLF line endings.
pub fn generate_ics(events: &[CalendarEvent]) -> String {
    let mut cal = Calendar::new();
    for event in events {
        cal.push(to_ics_event(event));
    }
    let cal = cal.done();

    finish_ics(&cal.to_string())
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&normalize_text(&event.title));
    ics_event.location(&normalize_text(&event.location));
    ics_event.description(&normalize_text(&event.description));

    // Stamp mirrors the start so re-exports stay stable apart from UIDs.
    ics_event.add_property("DTSTAMP", event.start.to_string());
    add_zoned_property(&mut ics_event, "DTSTART", &event.start);
    add_zoned_property(&mut ics_event, "DTEND", &event.end);

    ics_event.done()
}

fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, time: &CompactTimestamp) {
    let mut prop = Property::new(name, time.to_string());
    prop.add_parameter("TZID", TIME_ZONE_ID);
    ics_event.append_property(prop);
}

/// TEXT values may not carry control characters other than the newline the
/// crate escapes, so CRLF and lone CR collapse to `\n`.
fn normalize_text(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Rewrites the crate's calendar header:
/// - PRODID is replaced with ours
/// - the fixed VTIMEZONE goes in ahead of the first event
fn finish_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len() + 256);
    let mut zone_written = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODUCT_ID);
            result.push_str("\r\n");
            continue;
        }

        if !zone_written && (line == "BEGIN:VEVENT" || line == "END:VCALENDAR") {
            for zone_line in time_zone_block().lines() {
                result.push_str(zone_line);
                result.push_str("\r\n");
            }
            zone_written = true;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn event_titled(uid: &str, title: &str, description: &str) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2026, 2, 25).unwrap();
        CalendarEvent {
            uid: uid.to_string(),
            title: title.to_string(),
            location: "P101".to_string(),
            description: description.to_string(),
            start: CompactTimestamp::new(date, NaiveTime::from_hms_opt(6, 30, 0).unwrap()),
            end: CompactTimestamp::new(date, NaiveTime::from_hms_opt(9, 10, 0).unwrap()),
        }
    }

    fn event(uid: &str, description: &str) -> CalendarEvent {
        event_titled(uid, "English 1 - P101", description)
    }

    fn unescape(value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') | Some('N') => result.push('\n'),
                    Some(other) => result.push(other),
                    None => result.push(c),
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn unfold(ics: &str) -> String {
        ics.replace("\r\n ", "")
    }

    /// Unfolded raw value of the first `name` property.
    fn property(ics: &str, name: &str) -> String {
        let unfolded = unfold(ics);
        let prefix = format!("{name}:");
        unfolded
            .split("\r\n")
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .unwrap_or_else(|| panic!("no {name} in:\n{ics}"))
            .to_string()
    }

    #[test]
    fn text_fields_escape_in_order() {
        let ics = generate_ics(&[event_titled("u", r"a\b", "a,b;c\nd")]);
        assert_eq!(property(&ics, "SUMMARY"), r"a\\b");
        assert_eq!(property(&ics, "DESCRIPTION"), r"a\,b\;c\nd");
    }

    #[test]
    fn text_fields_round_trip() {
        for original in ["plain", r"C:\path\n", "x,y;z\nw", "\\,\\;\n\n", "Tiếng Việt, 1; 2"] {
            let ics = generate_ics(&[event("u", original)]);
            assert_eq!(unescape(&property(&ics, "DESCRIPTION")), original);
        }
    }

    #[test]
    fn carriage_returns_do_not_reach_the_output() {
        let ics = generate_ics(&[event_titled("u", "English\r\n1", "line\rbreak")]);
        assert!(!ics.replace("\r\n", "").contains('\r'));
        assert_eq!(property(&ics, "SUMMARY"), r"English\n1");
        assert_eq!(property(&ics, "DESCRIPTION"), r"line\nbreak");
    }

    #[test]
    fn document_has_header_timezone_and_events() {
        let ics = generate_ics(&[event("uid-1", "d")]);
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(ics.contains("CALSCALE:GREGORIAN\r\n"));
        assert_eq!(property(&ics, "PRODID"), PRODUCT_ID);
        assert_eq!(ics.matches("PRODID:").count(), 1);
        assert!(ics.contains("BEGIN:VTIMEZONE\r\nTZID:Asia/Ho_Chi_Minh\r\n"));
        assert!(ics.contains("TZOFFSETFROM:+0700\r\nTZOFFSETTO:+0700\r\n"));
        assert!(!ics.contains("DAYLIGHT"));
        assert!(ics.find("END:VTIMEZONE").unwrap() < ics.find("BEGIN:VEVENT").unwrap());
        assert_eq!(property(&ics, "UID"), "uid-1");
        assert_eq!(property(&ics, "DTSTAMP"), "20260225T063000");
        assert_eq!(ics.matches("DTSTAMP").count(), 1);
        assert!(ics.contains("DTSTART;TZID=Asia/Ho_Chi_Minh:20260225T063000\r\n"));
        assert!(ics.contains("DTEND;TZID=Asia/Ho_Chi_Minh:20260225T091000\r\n"));
        assert_eq!(property(&ics, "LOCATION"), "P101");
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
        assert!(!ics.lines().any(|line| line.trim_end_matches('\r').is_empty()));
    }

    #[test]
    fn empty_event_list_is_still_a_calendar() {
        let ics = generate_ics(&[]);
        assert_eq!(ics.matches("BEGIN:VTIMEZONE").count(), 1);
        assert!(ics.contains("END:VTIMEZONE\r\nEND:VCALENDAR\r\n"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn description_escapes_without_doubling() {
        let ics = generate_ics(&[event("u", "a, b; c\nd")]);
        assert_eq!(property(&ics, "DESCRIPTION"), r"a\, b\; c\nd");
        assert!(!ics.contains(r"\\n"));
    }

    #[test]
    fn same_events_serialize_identically() {
        let events = vec![event("a", "x"), event("b", "y")];
        assert_eq!(generate_ics(&events), generate_ics(&events));
    }

    #[test]
    fn long_lines_are_folded() {
        let description = "Giảng viên: ".repeat(20);
        let ics = generate_ics(&[event("u", &description)]);

        let physical: Vec<&str> = ics.split("\r\n").collect();
        let first = physical
            .iter()
            .position(|line| line.starts_with("DESCRIPTION:"))
            .unwrap();
        assert!(physical[first].len() <= 75);
        assert!(physical[first + 1].starts_with(' '));

        assert_eq!(unescape(&property(&ics, "DESCRIPTION")), description);
    }
}
