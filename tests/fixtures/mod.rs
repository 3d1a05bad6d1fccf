// Test fixtures - reusable event and date builders
// Provides consistent test data across all test files

use calendar_recurrence::models::event::{Event, RepeatRule};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

/// An event running noon to 1pm on its start day (through noon on its end
/// day for chunks), with the given repeat rule.
pub fn event(
    id: i64,
    title: &str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    repeat: RepeatRule,
) -> Event {
    let end_hour = if start == end { 13 } else { 12 };
    let mut event = Event::new(
        title,
        at(start.0, start.1, start.2, 12, 0),
        at(end.0, end.1, end.2, end_hour, 0),
    )
    .unwrap();
    event.id = id;
    event.repeat = repeat;
    event
}

/// Same as [`event`], bounded by an end-repeat date.
pub fn bounded_event(
    id: i64,
    title: &str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    repeat: RepeatRule,
    end_repeat: (i32, u32, u32),
) -> Event {
    let mut event = event(id, title, start, end, repeat);
    event.end_repeat = Some(date(end_repeat.0, end_repeat.1, end_repeat.2));
    event
}
