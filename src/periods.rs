use chrono::NaiveTime;

/// Index of a teaching period in the daily timetable, starting at 1.
pub type Period = u32;

/// Local wall-clock bounds of one teaching period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTime {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl PeriodTime {
    pub fn start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.start.0, self.start.1, 0)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.end.0, self.end.1, 0)
    }
}

// Times are already local to the campus (UTC+07:00).
const PERIOD_TABLE: [PeriodTime; 15] = [
    PeriodTime { start: (6, 30), end: (7, 20) },
    PeriodTime { start: (7, 25), end: (8, 15) },
    PeriodTime { start: (8, 20), end: (9, 10) },
    PeriodTime { start: (9, 20), end: (10, 10) },
    PeriodTime { start: (10, 15), end: (11, 5) },
    PeriodTime { start: (11, 10), end: (12, 0) },
    PeriodTime { start: (12, 30), end: (13, 20) },
    PeriodTime { start: (13, 25), end: (14, 15) },
    PeriodTime { start: (14, 20), end: (15, 10) },
    PeriodTime { start: (15, 20), end: (16, 10) },
    PeriodTime { start: (16, 15), end: (17, 5) },
    PeriodTime { start: (17, 10), end: (18, 0) },
    PeriodTime { start: (18, 15), end: (19, 5) },
    PeriodTime { start: (19, 10), end: (20, 0) },
    PeriodTime { start: (20, 5), end: (20, 55) },
];

pub fn lookup(period: Period) -> Option<PeriodTime> {
    let index = period.checked_sub(1)?;
    PERIOD_TABLE.get(index as usize).copied()
}
