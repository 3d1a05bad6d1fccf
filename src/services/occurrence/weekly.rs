// Weekly and biweekly counting, including the first-week fill-out for
// chunk events whose span crosses into the month from the previous cycle

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::walker::{record_day, repeat_forever, Walker};
use super::OccurrenceMap;
use crate::models::event::{Event, RepeatRule};

pub(super) fn count(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if event.starts_in_year_month(year, month) {
        count_start_month(count, year, month, event);
    } else {
        count_later_month(count, year, month, event);
    }
}

/// The event starts this month. It may or may not stop repeating this month;
/// either way the start day itself was already counted by the month-event
/// pass, so the walk only adds the stepped days (and the chunk days after
/// each of them).
fn count_start_month(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    let step = event.repeat.step_days().unwrap_or(7);
    let span = event.span_days();
    let mut walker = Walker::new(count, year, month, event);
    walker.step = step;
    walker.walk();
    if event.is_chunk() {
        walker.walk_chunk(span);
    }
}

/// The event started in an earlier month. The first stepped day of this
/// month has not been counted yet, so the walks count their first day too.
fn count_later_month(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };
    let start_day = first_weekday_on_or_after(event.start.weekday(), first).day();

    if event.repeats(RepeatRule::Biweekly) {
        let mut aligned = biweekly_occurrences(year, month, event);
        let needs_fill = event.is_chunk()
            && aligned.keys().next().is_some_and(|&earliest| earliest > 7);
        if needs_fill {
            fill_out_first_week(&mut aligned, year, month, event, event.span_days());
        }
        for (day, entries) in aligned {
            count.entry(day).or_default().extend(entries);
        }
        return;
    }

    let span = event.span_days();
    {
        let mut walker = Walker::new(count, year, month, event);
        walker.day = start_day;
        walker.count_first = true;
        walker.walk();
    }
    if event.is_chunk() {
        fill_out_first_week(count, year, month, event, span);
        let mut walker = Walker::new(count, year, month, event);
        walker.day = start_day;
        walker.count_first = true;
        walker.walk_chunk(span);
    }
}

/// Biweekly steps only line up with a given month every other week, so the
/// walk can't simply start from the first weekday match: the start date is
/// advanced two weeks at a time until it lands inside the target month, and
/// that phase-aligned day anchors the walk. Collected into its own map so
/// the fill-out can inspect what this event alone produced.
fn biweekly_occurrences(year: i32, month: u32, event: &Event) -> OccurrenceMap {
    let mut occurrences = OccurrenceMap::new();
    let mut d = event.start.date_naive();
    while d.year() != year || d.month() != month {
        d += Duration::days(14);
        if d.year() > year || (d.year() == year && d.month() > month) {
            // phase never lands in the target month
            return occurrences;
        }
    }

    let aligned_day = d.day();
    {
        let mut walker = Walker::new(&mut occurrences, year, month, event);
        walker.day = aligned_day;
        walker.step = 14;
        walker.count_first = true;
        walker.walk();
    }
    if event.is_chunk() {
        if let Some(&earliest) = occurrences.keys().next() {
            let span = event.span_days();
            let mut walker = Walker::new(&mut occurrences, year, month, event);
            walker.day = earliest;
            walker.step = 14;
            walker.count_first = true;
            walker.walk_chunk(span);
        }
    }
    occurrences
}

/// Given a weekday and a date, step the date forward until its weekday
/// matches.
fn first_weekday_on_or_after(weekday: Weekday, mut d: NaiveDate) -> NaiveDate {
    while d.weekday() != weekday {
        d += Duration::days(1);
    }
    d
}

/// Back-fill the leading days of the month still covered by a chunk cycle
/// that began in the previous month.
///
/// The stepped walks only cover days from the first in-month cycle onward,
/// which leaves the head of the month under-populated exactly when the
/// previous cycle's span runs through the 1st. Cases, by the chunk's start
/// weekday relative to the 1st's weekday:
///   1. same weekday: the cycle begins on the 1st, nothing to fill;
///   2. the whole span sits inside the month (the weekday gap between start
///      and end equals the span), nothing to fill;
///   3. start weekday after the 1st's: the open cycle runs through the 1st,
///      fill up to its end weekday;
///   4./5. start weekday before the 1st's: fill up to the first day whose
///      weekday matches the chunk's end (covers both "ends before the 1st's
///      weekday recurs" and "ends exactly on it").
fn fill_out_first_week(
    count: &mut OccurrenceMap,
    year: i32,
    month: u32,
    event: &Event,
    span: u32,
) {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };
    let first_end_day = first_weekday_on_or_after(event.end.weekday(), first);
    let first_start_day = first_weekday_on_or_after(event.start.weekday(), first);
    let weekday_gap = i64::from(first_end_day.day()) - i64::from(first_start_day.day());

    let start_weekday = i64::from(event.start.weekday().num_days_from_monday());
    let first_weekday = i64::from(first.weekday().num_days_from_monday());
    let end_weekday = i64::from(event.end.weekday().num_days_from_monday());

    let fill = if start_weekday == first_weekday || weekday_gap == i64::from(span) {
        return;
    } else if start_weekday > first_weekday {
        end_weekday - first_weekday + 1
    } else {
        i64::from(first_end_day.day())
    };

    let mut day = 1u32;
    for _ in 0..fill {
        if let Some(end_repeat) = event.end_repeat {
            let past_end = NaiveDate::from_ymd_opt(year, month, day)
                .is_some_and(|d| d >= end_repeat);
            if past_end {
                break;
            }
        }
        record_day(count, year, month, day, repeat_forever(), event);
        day += 1;
    }
}
