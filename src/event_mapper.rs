use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::{
    periods::{self, Period},
    text_manipulators::TextExtractors,
    timetable_api::RawScheduleRecord,
};

/// Zone-less local date-time, rendered as `YYYYMMDDTHHMMSS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompactTimestamp(pub NaiveDateTime);

impl CompactTimestamp {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self(date.and_time(time))
    }
}

impl fmt::Display for CompactTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%dT%H%M%S"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub start: CompactTimestamp,
    pub end: CompactTimestamp,
}

pub struct EventMapper {
    extractors: TextExtractors,
}

impl EventMapper {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            extractors: TextExtractors::new()?,
        })
    }

    /// Maps every record it can; the rest are dropped without notice.
    pub fn map_records(&self, records: &[RawScheduleRecord]) -> Vec<CalendarEvent> {
        records.iter().filter_map(|record| self.map_record(record)).collect()
    }

    pub fn map_record(&self, record: &RawScheduleRecord) -> Option<CalendarEvent> {
        let date = parse_date(&record.date)?;
        let (first, last) = parse_period_range(&record.periods)?;
        let start_time = periods::lookup(first)?.start_time()?;
        let end_time = periods::lookup(last)?.end_time()?;

        let room = self.extractors.extract_room(&record.room);
        let display_time = self.extractors.extract_display_time(&record.session);

        let description = [
            format!("Section: {}", record.section),
            format!("Periods: {} ({})", record.period_count, record.periods.trim()),
            format!("Starts at: {}", display_time),
            format!("Instructor: {}", record.instructor),
        ]
        .join("\n");

        let title = if room.is_empty() {
            record.course_title.clone()
        } else {
            format!("{} - {}", record.course_title, room)
        };

        Some(CalendarEvent {
            uid: Uuid::new_v4().to_string(),
            title,
            location: room,
            description,
            start: CompactTimestamp::new(date, start_time),
            end: CompactTimestamp::new(date, end_time),
        })
    }
}

/// `dd/mm/yyyy`; zero or unparsable components reject the date.
fn parse_date(field: &str) -> Option<NaiveDate> {
    let mut parts = field.trim().split('/').map(|part| part.trim().parse::<u32>().ok());
    let day = parts.next()??;
    let month = parts.next()??;
    let year = parts.next()??;
    if day == 0 || month == 0 || year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_period_range(field: &str) -> Option<(Period, Period)> {
    let (first, last) = field.split_once('-')?;
    Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
}
