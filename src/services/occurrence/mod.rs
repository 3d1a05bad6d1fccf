//! Occurrence expansion for calendar events.
//! Builds the day -> entries map behind a month view, plus the
//! next-occurrence and upcoming-occurrence lookups, organized across
//! focused per-rule submodules.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::event::{Event, RepeatRule};
use crate::utils::date::{days_in_month, is_weekend};

mod daily;
mod monthly;
pub mod next;
pub mod upcoming;
mod walker;
mod weekly;
mod yearly;

use walker::{record_day, repeat_until, Walker};

/// Day of month -> entries occurring on that day, in event-processing order.
/// Each entry is the event's `(title, id)`.
pub type OccurrenceMap = BTreeMap<u32, Vec<(String, i64)>>;

/// Every day of the given month on which any of `events` occurs.
///
/// Events are processed in order; callers that need a particular ordering
/// within a day (say, by start time) sort afterwards.
pub fn month_occurrences(year: i32, month: u32, events: &[Event]) -> OccurrenceMap {
    let mut count = OccurrenceMap::new();
    for event in events {
        count_event(&mut count, year, month, event);
    }
    log::debug!(
        "expanded {} events into {} occurrence days for {year}-{month:02}",
        events.len(),
        count.len()
    );
    count
}

/// Days of the month each event occurs on, keyed by event id. Events without
/// occurrences in the month are absent.
pub fn event_day_index(year: i32, month: u32, events: &[Event]) -> BTreeMap<i64, Vec<u32>> {
    let mut index = BTreeMap::new();
    for event in events {
        let mut count = OccurrenceMap::new();
        count_event(&mut count, year, month, event);
        if !count.is_empty() {
            index.insert(event.id, count.into_keys().collect());
        }
    }
    index
}

fn count_event(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if !may_occur_in_month(event, year, month) {
        return;
    }
    if event.starts_or_ends_in_year_month(year, month) {
        count_month_event(count, year, month, event);
    }
    match event.repeat {
        RepeatRule::Weekly | RepeatRule::Biweekly => weekly::count(count, year, month, event),
        RepeatRule::Monthly => monthly::count(count, year, month, event),
        RepeatRule::Daily | RepeatRule::Weekday => daily::count(count, year, month, event),
        RepeatRule::Yearly => yearly::count(count, year, month, event),
        RepeatRule::Never => {}
    }
}

/// Mirror of the event store's month-query contract, applied here so the
/// result is correct for an unfiltered event list: nothing can occur in a
/// month that ends before the event starts or begins after its repetition
/// ended. This is also what keeps every walk finite.
fn may_occur_in_month(event: &Event, year: i32, month: u32) -> bool {
    let last_day = days_in_month(year, month);
    let Some(month_last) = NaiveDate::from_ymd_opt(year, month, last_day) else {
        return false;
    };
    if event.start.date_naive() > month_last {
        return false;
    }
    if let Some(end_repeat) = event.end_repeat {
        // month_last is a valid date, so the 1st is too
        if let Some(month_first) = NaiveDate::from_ymd_opt(year, month, 1) {
            if end_repeat < month_first {
                return false;
            }
        }
    }
    true
}

/// Count the event whose start or end lands in this month: the start day for
/// a plain event (weekday-repeating events only when it isn't a weekend), or
/// the in-month part of a chunk's span.
fn count_month_event(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if event.is_chunk() {
        count_single_chunk(count, year, month, event);
    } else if event.repeats(RepeatRule::Weekday) {
        if !is_weekend(event.start.date_naive()) {
            record_day(
                count,
                year,
                month,
                event.start.day(),
                repeat_until(event),
                event,
            );
        }
    } else {
        record_day(
            count,
            year,
            month,
            event.start.day(),
            repeat_until(event),
            event,
        );
    }
}

/// A non-repeating chunk, or the first month of a repeating one: walk the
/// span day by day. A chunk that didn't start this month must end in it
/// (spans are at most seven days), so the walk starts from the 1st then.
fn count_single_chunk(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if !event.starts_in_month(month) && !event.repeats(RepeatRule::Never) {
        // later months of a repeating chunk belong to its rule's counter
        return;
    }
    let mut walker = Walker::new(count, year, month, event);
    walker.step = 1;
    walker.count_first = true;
    walker.end_on = Some(event.end.day());
    if event.starts_in_month(month) {
        if !event.ends_in_month(month) {
            // runs past month end; the walk stops at the boundary on its own
            walker.end_on = None;
        }
    } else {
        walker.day = 1;
    }
    walker.walk();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn event(
        id: i64,
        title: &str,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
        repeat: RepeatRule,
    ) -> Event {
        let mut event = Event::new(
            title,
            Local
                .with_ymd_and_hms(start.0, start.1, start.2, 12, 0, 0)
                .unwrap(),
            Local.with_ymd_and_hms(end.0, end.1, end.2, 12, 0, 0).unwrap(),
        )
        .unwrap();
        event.id = id;
        event.repeat = repeat;
        event
    }

    #[test]
    fn test_single_event_counts_once() {
        let events = vec![event(1, "party", (2014, 5, 28), (2014, 5, 28), RepeatRule::Never)];
        let count = month_occurrences(2014, 5, &events);
        assert_eq!(count.len(), 1);
        assert_eq!(count[&28], vec![("party".to_string(), 1)]);
    }

    #[test]
    fn test_single_event_absent_from_other_months() {
        let events = vec![event(1, "party", (2014, 5, 28), (2014, 5, 28), RepeatRule::Never)];
        assert!(month_occurrences(2014, 4, &events).is_empty());
        assert!(month_occurrences(2014, 6, &events).is_empty());
        assert!(month_occurrences(2015, 5, &events).is_empty());
    }

    #[test]
    fn test_never_chunk_spans_month_boundary() {
        let events = vec![event(1, "fair", (2014, 5, 30), (2014, 6, 2), RepeatRule::Never)];
        let may = month_occurrences(2014, 5, &events);
        assert_eq!(may.keys().copied().collect::<Vec<_>>(), vec![30, 31]);
        let june = month_occurrences(2014, 6, &events);
        assert_eq!(june.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_events_starting_after_month_are_skipped() {
        let events = vec![event(1, "later", (2014, 7, 3), (2014, 7, 3), RepeatRule::Daily)];
        assert!(month_occurrences(2014, 6, &events).is_empty());
    }

    #[test]
    fn test_expired_repeats_are_skipped() {
        let mut expired = event(1, "old", (2014, 1, 6), (2014, 1, 6), RepeatRule::Monthly);
        expired.end_repeat = NaiveDate::from_ymd_opt(2014, 3, 1);
        assert!(month_occurrences(2014, 5, &[expired]).is_empty());
    }

    #[test]
    fn test_entries_follow_event_order() {
        let events = vec![
            event(1, "first", (2014, 5, 10), (2014, 5, 10), RepeatRule::Never),
            event(2, "second", (2014, 5, 10), (2014, 5, 10), RepeatRule::Never),
        ];
        let count = month_occurrences(2014, 5, &events);
        assert_eq!(
            count[&10],
            vec![("first".to_string(), 1), ("second".to_string(), 2)]
        );
    }

    #[test]
    fn test_event_day_index() {
        let events = vec![
            event(1, "weekly", (2014, 5, 7), (2014, 5, 7), RepeatRule::Weekly),
            event(2, "later", (2014, 7, 1), (2014, 7, 1), RepeatRule::Never),
        ];
        let index = event_day_index(2014, 5, &events);
        assert_eq!(index[&1], vec![7, 14, 21, 28]);
        assert!(!index.contains_key(&2));
    }

    #[test]
    fn test_occurrence_map_serializes_by_day() {
        let events = vec![event(1, "party", (2014, 5, 28), (2014, 5, 28), RepeatRule::Never)];
        let count = month_occurrences(2014, 5, &events);
        assert_eq!(
            serde_json::to_string(&count).unwrap(),
            r#"{"28":[["party",1]]}"#
        );
    }
}
